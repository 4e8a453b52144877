// ==========================================
// 电商订单导入 - TikTok PDF 文本提取器
// ==========================================
// 启发式规则（保持原有行为,不做"增强"）:
// - 锚点行: 同时包含 "product name" / "sku" / "qty",缺失则视为无商品
// - 商品行: 长度 > 10 且以数字结尾（数字 = 数量）
// - 订单号: Order ID\s*:?\s*([A-Z0-9]+),缺失时生成 TIKTOK_<毫秒>
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use chrono::Utc;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

/// 无 SKU 时的默认值（TikTok 面单的"默认规格"）
pub const DEFAULT_PDF_SKU: &str = "Mặc định";

/// 匹配用名称取前几个词
pub const MATCH_NAME_WORDS: usize = 5;

const MIN_PRODUCT_LINE_LEN: usize = 10;

// ==========================================
// PdfOrderLine - PDF 中识别出的商品行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfOrderLine {
    pub order_id: String,
    pub product_name: String,
    pub match_name: String,
    pub weight: Option<String>, // 原始重量标记,如 "500g"
    pub quantity: f64,
    pub sku: String,
}

fn product_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(.*?)\s*(\d+)$").expect("invalid product line regex"))
}

fn order_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Order ID\s*:?\s*([A-Z0-9]+)").expect("invalid order id regex"))
}

fn weight_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(\d+(?:\.\d+)?)(gr|g|kg|ml|lít|l)").expect("invalid weight regex")
    })
}

/// 读取 PDF 全文（页间以换行连接）
pub fn read_pdf_text(path: &Path) -> ImportResult<String> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }

    pdf_extract::extract_text(path)
        .map_err(|e| ImportError::PdfParseError(format!("{}: {}", path.display(), e)))
}

/// 从 PDF 文本提取第一条商品行
///
/// # 返回
/// - Some(PdfOrderLine)
/// - None: 无锚点行,或锚点后没有合格商品行（调用方报告"未找到商品"）
pub fn extract_from_pdf_text(text: &str) -> Option<PdfOrderLine> {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();

    // 锚点之后开始扫描,订单号行不参与商品识别
    let start = lines.iter().position(|line| is_anchor_line(line))? + 1;

    let (product_name, sku, quantity) = lines[start..]
        .iter()
        .filter(|line| !order_id_re().is_match(line))
        .find_map(|line| parse_product_line(line))?;

    let match_name = product_name
        .split_whitespace()
        .take(MATCH_NAME_WORDS)
        .collect::<Vec<_>>()
        .join(" ");

    let weight = weight_re().find(&product_name).map(|m| m.as_str().to_string());

    let order_id = order_id_re()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| format!("TIKTOK_{}", Utc::now().timestamp_millis()));

    debug!(
        order_id = %order_id,
        match_name = %match_name,
        quantity = quantity,
        "PDF 商品行识别成功"
    );

    Some(PdfOrderLine {
        order_id,
        product_name,
        match_name,
        weight,
        quantity,
        sku,
    })
}

/// 重量标记换算为 kg（g/gr/ml ÷ 1000;kg/l/lít 原值）
pub fn weight_token_to_kg(token: &str) -> Option<f64> {
    let caps = weight_re().captures(token)?;
    let value: f64 = caps.get(1)?.as_str().parse().ok()?;

    let kg = match caps.get(2)?.as_str() {
        "g" | "gr" | "ml" => value / 1000.0,
        _ => value,
    };
    Some(kg)
}

fn is_anchor_line(line: &str) -> bool {
    let lower = line.to_lowercase();
    lower.contains("product name") && lower.contains("sku") && lower.contains("qty")
}

// 返回 (商品名称, SKU, 数量)
fn parse_product_line(line: &str) -> Option<(String, String, f64)> {
    if line.chars().count() <= MIN_PRODUCT_LINE_LEN {
        return None;
    }

    let caps = product_line_re().captures(line)?;
    let quantity: f64 = caps.get(2)?.as_str().parse().ok()?;
    if quantity <= 0.0 {
        return None;
    }

    let (name, sku) = split_trailing_sku(caps.get(1)?.as_str().trim());
    if name.is_empty() {
        return None;
    }

    Some((name, sku, quantity))
}

fn split_trailing_sku(rest: &str) -> (String, String) {
    if let Some(name) = strip_suffix_ignore_case(rest, DEFAULT_PDF_SKU) {
        return (name.trim_end().to_string(), DEFAULT_PDF_SKU.to_string());
    }

    if let Some((name, token)) = rest.rsplit_once(char::is_whitespace) {
        if is_sku_token(token) {
            return (name.trim_end().to_string(), token.to_string());
        }
    }

    (rest.to_string(), DEFAULT_PDF_SKU.to_string())
}

// SKU 形态: 至少 3 位,大写字母/数字/-/_,且含数字
fn is_sku_token(token: &str) -> bool {
    token.len() >= 3
        && token.chars().any(|c| c.is_ascii_digit())
        && token
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-' || c == '_')
}

fn strip_suffix_ignore_case<'a>(text: &'a str, suffix: &str) -> Option<&'a str> {
    let lower = text.to_lowercase();
    let suffix_lower = suffix.to_lowercase();
    if !lower.ends_with(&suffix_lower) || lower.len() != text.len() {
        return None;
    }
    text.get(..text.len() - suffix_lower.len())
}
