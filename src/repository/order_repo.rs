// ==========================================
// 电商订单导入 - 订单落库 Repository Trait
// ==========================================
// 职责: 导入批次与订单行的写入/查询
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::domain::import_batch::ImportBatch;
use crate::domain::order::ImportedOrder;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// OrderRepository Trait
// ==========================================
// 实现者: OrderRepositoryImpl（使用 rusqlite）
#[async_trait]
pub trait OrderRepository: Send + Sync {
    // ===== 批量写入（事务化）=====

    /// 写入批次记录
    async fn insert_batch(&self, batch: &ImportBatch) -> RepositoryResult<()>;

    /// 批量写入订单行（批次内按行号全部保留,其他批次的同 order_id + product_id 旧行被替换）
    ///
    /// # 返回
    /// - Ok(usize): 写入行数
    /// - Err: 数据库错误（整个事务回滚）
    async fn batch_insert_orders(
        &self,
        batch_id: &str,
        orders: &[ImportedOrder],
    ) -> RepositoryResult<usize>;

    /// 批次 + 订单行在同一事务中写入
    async fn save_import(
        &self,
        batch: &ImportBatch,
        orders: &[ImportedOrder],
    ) -> RepositoryResult<usize>;

    // ===== 查询 =====

    /// 查询批次下的订单行（按原始行号排序）
    async fn list_orders_by_batch(&self, batch_id: &str) -> RepositoryResult<Vec<ImportedOrder>>;

    /// 按 ID 查询批次
    async fn get_batch(&self, batch_id: &str) -> RepositoryResult<Option<ImportBatch>>;

    /// 订单行总数
    async fn count_orders(&self) -> RepositoryResult<i64>;

    /// 最近的导入批次
    async fn get_recent_batches(&self, limit: i64) -> RepositoryResult<Vec<ImportBatch>>;
}
