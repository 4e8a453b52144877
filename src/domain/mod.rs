// ==========================================
// 电商订单导入 - 领域模型层
// ==========================================
// 职责: 定义值对象与枚举
// 红线: 不含数据访问逻辑,不含导入流程逻辑
// ==========================================

pub mod fee;
pub mod import_batch;
pub mod order;
pub mod product;
pub mod types;

// 重导出核心类型
pub use fee::{FeeKind, FeeRule, FeeSchedule, FeeType};
pub use import_batch::{ImportBatch, ImportOutcome, ImportSummary};
pub use order::{EnrichedOrder, ImportedOrder, NetProfitResult, RawOrderRow, SkipReason};
pub use product::CatalogProduct;
pub use types::{OrderStatus, Platform, ProductStatus, ProductType};
