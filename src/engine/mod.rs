// ==========================================
// 电商订单导入 - 引擎层
// ==========================================
// 职责: 利润规则计算,不拼 SQL,不读文件
// ==========================================

pub mod packaging;
pub mod profit_adjuster;
pub mod profit_report;

// 重导出核心引擎
pub use packaging::{PackagingCostProvider, PackagingCostTable, PackagingTier};
pub use profit_adjuster::adjust_profit;
pub use profit_report::{ProfitReport, ProfitTotals};
