// ==========================================
// 电商订单导入 - 单元格清洗
// ==========================================
// 职责: TRIM / 小写 / NULL 标准化 / 数值前缀解析
// ==========================================

use regex::Regex;
use std::sync::OnceLock;

// 数值前缀: 符号 + 整数/小数 + 可选指数（指数须带数字）
fn number_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?").expect("invalid number prefix regex")
    })
}

pub struct DataCleaner;

impl DataCleaner {
    /// 清洗文本字段（TRIM + 可选小写）
    pub fn clean_text(&self, value: &str, lowercase: bool) -> String {
        let trimmed = value.trim();
        if lowercase {
            trimmed.to_lowercase()
        } else {
            trimmed.to_string()
        }
    }

    /// 标准化 NULL 值（空字符串/空白 → None）
    pub fn normalize_null(&self, value: Option<&str>) -> Option<String> {
        value.and_then(|v| {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }

    /// 解析数值前缀
    ///
    /// # 规则
    /// - 忽略前导空白,读取最长的合法数字前缀（符号/小数点/指数）
    /// - "12abc" → 12, "1,5" → 1, "abc" → None
    pub fn parse_number_prefix(&self, value: &str) -> Option<f64> {
        number_prefix_re()
            .find(value.trim_start())
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .filter(|v| v.is_finite())
    }

    /// 解析数量（无法解析 → 0）
    pub fn parse_quantity(&self, value: &str) -> f64 {
        self.parse_number_prefix(value).unwrap_or(0.0)
    }

    /// 解析可选金额（空/无法解析 → None）
    pub fn parse_optional_amount(&self, value: &str) -> Option<f64> {
        self.normalize_null(Some(value))
            .and_then(|v| self.parse_number_prefix(&v))
    }
}
