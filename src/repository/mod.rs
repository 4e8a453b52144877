// ==========================================
// 电商订单导入 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 商品目录快照来源 + 订单落库
// 约束: 所有查询使用参数化
// ==========================================

pub mod catalog_repo;
pub mod catalog_repo_impl;
pub mod error;
pub mod order_repo;
pub mod order_repo_impl;

// 重导出核心仓储
pub use catalog_repo::CatalogRepository;
pub use catalog_repo_impl::CatalogRepositoryImpl;
pub use error::{RepositoryError, RepositoryResult};
pub use order_repo::OrderRepository;
pub use order_repo_impl::OrderRepositoryImpl;
