// ==========================================
// 电商订单导入 - 核心库
// ==========================================
// 职责: 订单文件 → 商品匹配 → 利润核算 → 落库
// 技术栈: Rust + SQLite
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 利润规则
pub mod engine;

// 导入层 - 外部文件
pub mod importer;

// 配置层 - 店铺/费率/包装
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{OrderStatus, Platform, ProductStatus, ProductType};

// 领域实体
pub use domain::{
    CatalogProduct, EnrichedOrder, FeeKind, FeeRule, FeeSchedule, FeeType, ImportBatch,
    ImportOutcome, ImportSummary, ImportedOrder, NetProfitResult, RawOrderRow, SkipReason,
};

// 引擎
pub use engine::{adjust_profit, PackagingCostProvider, PackagingCostTable, ProfitReport};

// 导入
pub use importer::{ImportError, OrderImporter, OrderImporterImpl};

// API
pub use api::{ApiError, ImportApi, ImportApiResponse};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "电商订单导入";

// 数据库版本
pub const DB_VERSION: &str = "v1";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
