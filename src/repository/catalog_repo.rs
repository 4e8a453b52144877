// ==========================================
// 电商订单导入 - 商品目录 Repository Trait
// ==========================================
// 职责: 目录快照读取 + 目录维护写入
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::domain::product::CatalogProduct;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// CatalogRepository Trait
// ==========================================
// 实现者: CatalogRepositoryImpl（使用 rusqlite）
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// 读取启用状态的商品快照
    ///
    /// # 返回
    /// - 按加载顺序（写入顺序）排列,匹配器依赖此顺序
    async fn list_active_products(&self) -> RepositoryResult<Vec<CatalogProduct>>;

    /// 批量写入商品（按 product_id 更新,保持原有加载顺序）
    async fn upsert_products(&self, products: Vec<CatalogProduct>) -> RepositoryResult<usize>;

    /// 按 ID 查询商品
    async fn get_product(&self, product_id: &str) -> RepositoryResult<Option<CatalogProduct>>;
}
