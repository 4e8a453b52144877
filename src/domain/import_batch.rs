// ==========================================
// 电商订单导入 - 导入批次模型
// ==========================================

use crate::domain::order::{ImportedOrder, SkipReason};
use crate::domain::types::Platform;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

// ==========================================
// ImportSummary - 单文件导入统计
// ==========================================
// 说明: 跳过行不计入 error_count（界面只提示致命错误）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub total_rows: usize,                          // 数据行数（不含表头与空行）
    pub valid_count: usize,                         // 成功匹配输出的订单行
    pub error_count: usize,                         // 界面错误计数（跳过行不计）
    pub skipped_count: usize,                       // 静默跳过行数（诊断用）
    pub skip_reasons: BTreeMap<SkipReason, usize>,  // 跳过原因分布
    pub degraded_price_count: usize,                // 售价无法确定（=0）但仍输出的行
}

impl ImportSummary {
    pub fn record_skip(&mut self, reason: SkipReason) {
        self.skipped_count += 1;
        *self.skip_reasons.entry(reason).or_insert(0) += 1;
    }
}

// ==========================================
// ImportBatch - 导入批次
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportBatch {
    pub batch_id: String,                   // 批次 ID（UUID）
    pub file_name: Option<String>,          // 源文件名
    pub file_path: Option<String>,          // 源文件路径
    pub platform: Platform,
    pub store_id: String,
    pub total_rows: i64,
    pub valid_rows: i64,
    pub skipped_rows: i64,
    pub imported_at: DateTime<Utc>,
    pub elapsed_ms: i64,
}

// ==========================================
// ImportOutcome - 导入结果
// ==========================================
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    pub batch: ImportBatch,
    pub summary: ImportSummary,
    pub orders: Vec<ImportedOrder>,
    pub elapsed_time: Duration,
}
