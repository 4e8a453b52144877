// ==========================================
// 电商订单导入 - 配置层
// ==========================================
// 职责: 店铺、平台费率表、包装成本表
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod import_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager, DEFAULT_STORE_ID};
pub use import_config_trait::ImportConfigReader;
