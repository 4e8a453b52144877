// ==========================================
// 电商订单导入 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供 CLI/界面调用
// ==========================================

pub mod error;
pub mod import_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use import_api::{ImportApi, ImportApiResponse};
