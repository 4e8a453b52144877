// ==========================================
// 电商订单导入 - API层错误类型
// ==========================================
// 职责: 把导入/仓储错误转换为用户可读的单条提示
// 说明: 消息文本经 i18n 本地化
// ==========================================

use crate::i18n::{t, t_with_args};
use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 导入错误（整个文件失败）
    // ==========================================
    #[error("{0}")]
    RequiredColumnsMissing(String),

    #[error("{0}")]
    NoDataRows(String),

    #[error("{0}")]
    NoPdfProducts(String),

    #[error("{0}")]
    FileError(String),

    #[error("{0}")]
    ImportError(String),

    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    #[error("业务规则违反: {0}")]
    BusinessRuleViolation(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("{0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据库事务失败: {0}")]
    DatabaseTransactionError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("{0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 稳定的错误码（供前端/CLI 区分）
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::RequiredColumnsMissing(_) => "REQUIRED_COLUMNS_MISSING",
            ApiError::NoDataRows(_) => "NO_DATA_ROWS",
            ApiError::NoPdfProducts(_) => "NO_PDF_PRODUCTS",
            ApiError::FileError(_) => "FILE_ERROR",
            ApiError::ImportError(_) => "IMPORT_ERROR",
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::BusinessRuleViolation(_) => "BUSINESS_RULE_VIOLATION",
            ApiError::DatabaseError(_)
            | ApiError::DatabaseConnectionError(_)
            | ApiError::DatabaseTransactionError(_) => "DATABASE_ERROR",
            ApiError::InternalError(_) | ApiError::Other(_) => "INTERNAL_ERROR",
        }
    }
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::RequiredColumnsMissing { .. } => {
                ApiError::RequiredColumnsMissing(t("import.required_columns_missing"))
            }
            ImportError::NoDataRows => ApiError::NoDataRows(t("import.no_data_rows")),
            ImportError::NoPdfProducts => ApiError::NoPdfProducts(t("import.no_pdf_products")),
            ImportError::FileNotFound(path) => {
                ApiError::FileError(t_with_args("import.file_not_found", &[("path", &path)]))
            }
            ImportError::UnsupportedFormat(format) => ApiError::FileError(t_with_args(
                "import.unsupported_format",
                &[("format", &format)],
            )),
            ImportError::FileReadError(detail)
            | ImportError::ExcelParseError(detail)
            | ImportError::CsvParseError(detail)
            | ImportError::PdfParseError(detail) => {
                ApiError::FileError(t_with_args("import.file_read_error", &[("detail", &detail)]))
            }
            ImportError::SinkWriteError(detail) => ApiError::ImportError(t_with_args(
                "import.sink_write_failed",
                &[("detail", &detail)],
            )),
            ImportError::Other(err) => ApiError::Other(err),
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::DatabaseTransactionError(msg) => {
                ApiError::DatabaseTransactionError(msg)
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => {
                ApiError::DatabaseError(t_with_args("api.database_error", &[("detail", &msg)]))
            }
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InvalidInput(format!("字段{}错误: {}", field, message))
            }
            RepositoryError::ConfigFormatError { key, message } => {
                ApiError::InvalidInput(format!("配置{}格式错误: {}", key, message))
            }
            RepositoryError::InternalError(msg) => {
                ApiError::InternalError(t_with_args("api.internal_error", &[("detail", &msg)]))
            }
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
