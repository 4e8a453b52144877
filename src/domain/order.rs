// ==========================================
// 电商订单导入 - 订单领域模型
// ==========================================
// 流转: RawOrderRow → (商品匹配) → EnrichedOrder → NetProfitResult
// ==========================================

use crate::domain::fee::FeeKind;
use crate::domain::types::{OrderStatus, Platform, ProductType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ==========================================
// RawOrderRow - 解析出的原始订单行
// ==========================================
// 用途: 导入管道中间产物（表格行 / PDF 行 → 此结构）
// 生命周期: 仅在导入流程内,不直接落库
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOrderRow {
    pub order_id: String,
    pub sku_id: Option<String>,
    pub seller_sku: Option<String>,
    pub sku: String, // 派生: seller_sku 优先, 否则 sku_id
    pub product_name: String,
    pub quantity: f64,
    pub sku_subtotal_after_discount: Option<f64>, // 仅 Excel
    pub row_number: usize,                        // 原始文件行号（1 起）
}

impl RawOrderRow {
    pub fn new(
        order_id: impl Into<String>,
        sku_id: Option<String>,
        seller_sku: Option<String>,
        product_name: impl Into<String>,
        quantity: f64,
    ) -> Self {
        let sku = seller_sku
            .clone()
            .or_else(|| sku_id.clone())
            .unwrap_or_default();

        Self {
            order_id: order_id.into(),
            sku_id,
            seller_sku,
            sku,
            product_name: product_name.into(),
            quantity,
            sku_subtotal_after_discount: None,
            row_number: 0,
        }
    }

    pub fn with_subtotal(mut self, subtotal: f64) -> Self {
        self.sku_subtotal_after_discount = Some(subtotal);
        self
    }

    pub fn with_row_number(mut self, row_number: usize) -> Self {
        self.row_number = row_number;
        self
    }
}

// ==========================================
// SkipReason - 静默跳过原因
// ==========================================
// 仅用于诊断日志与统计,不作为错误上报
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkipReason {
    MissingOrderId,
    MissingSku,
    MissingProductName,
    NonPositiveQuantity,
    NoCatalogMatch,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::MissingOrderId => "订单号为空",
            SkipReason::MissingSku => "SKU 与 Seller SKU 均为空",
            SkipReason::MissingProductName => "商品名称为空",
            SkipReason::NonPositiveQuantity => "数量 <= 0",
            SkipReason::NoCatalogMatch => "未匹配到目录商品",
        };
        write!(f, "{}", text)
    }
}

// ==========================================
// EnrichedOrder - 匹配并核算后的订单
// ==========================================
// 红线: total_amount / total_profit 始终由 selling_price * quantity 重算
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedOrder {
    // ===== 原始行字段 =====
    pub order_id: String,
    pub sku_id: Option<String>,
    pub seller_sku: Option<String>,
    pub sku: String,
    pub quantity: f64,
    pub sku_subtotal_after_discount: Option<f64>,
    pub row_number: usize,

    // ===== 目录字段（以目录为准）=====
    pub product_id: String,
    pub matched_product_name: String,
    pub product_type: Option<ProductType>,
    pub weight: Option<f64>,

    // ===== 价格与利润 =====
    pub selling_price: f64,
    pub import_price: f64,
    pub profit_per_unit: f64,
    pub total_profit: f64,
    pub total_amount: f64,

    pub platform: Platform,
    pub status: OrderStatus,
}

impl EnrichedOrder {
    /// 订单行总重量（kg）,用于包装成本
    pub fn total_weight_kg(&self) -> f64 {
        self.weight.unwrap_or(0.0) * self.quantity
    }

    /// 订单行营业额
    pub fn total_revenue(&self) -> f64 {
        self.selling_price * self.quantity
    }
}

// ==========================================
// NetProfitResult - 扣费后净利润
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetProfitResult {
    pub base_profit: f64,
    pub total_fees: f64,
    pub packaging_cost: f64,
    pub final_profit: f64,
    pub fee_breakdown: BTreeMap<FeeKind, f64>,
}

// ==========================================
// ImportedOrder - 导入输出单元
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportedOrder {
    pub order: EnrichedOrder,
    pub net_profit: NetProfitResult,
}
