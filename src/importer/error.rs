// ==========================================
// 电商订单导入 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 此处只有"整个文件失败"的错误;单行问题走 SkipReason
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xls/.csv/.pdf）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    #[error("PDF 解析失败: {0}")]
    PdfParseError(String),

    // ===== 内容结构错误 =====
    #[error("缺少必需列（前 {scanned_rows} 行内未找到 Order ID / SKU ID 或 Seller SKU / Product Name / Quantity）")]
    RequiredColumnsMissing { scanned_rows: usize },

    #[error("文件没有数据行")]
    NoDataRows,

    #[error("PDF 中未找到商品信息")]
    NoPdfProducts,

    // ===== 落库错误 =====
    #[error("订单写入失败: {0}")]
    SinkWriteError(String),

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ImportError {
    /// 是否为文件内容结构问题（而非 IO/落库问题）
    pub fn is_content_error(&self) -> bool {
        matches!(
            self,
            ImportError::RequiredColumnsMissing { .. }
                | ImportError::NoDataRows
                | ImportError::NoPdfProducts
        )
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

// 实现 From<RepositoryError>（落库阶段）
impl From<crate::repository::error::RepositoryError> for ImportError {
    fn from(err: crate::repository::error::RepositoryError) -> Self {
        ImportError::SinkWriteError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_errors() {
        assert!(ImportError::NoDataRows.is_content_error());
        assert!(ImportError::RequiredColumnsMissing { scanned_rows: 5 }.is_content_error());
        assert!(!ImportError::FileNotFound("a.xlsx".to_string()).is_content_error());
    }
}
