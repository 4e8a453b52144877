// ==========================================
// 电商订单导入 - 商品目录 Repository 实现
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::product::CatalogProduct;
use crate::domain::types::ProductStatus;
use crate::repository::catalog_repo::CatalogRepository;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

const SELECT_COLUMNS: &str = "product_id, sku, name, selling_price, import_price, \
                              product_type, weight_kg, status";

fn map_product(row: &Row) -> rusqlite::Result<CatalogProduct> {
    let product_type: Option<String> = row.get(5)?;
    let status: String = row.get(7)?;

    Ok(CatalogProduct {
        id: row.get(0)?,
        sku: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        name: row.get(2)?,
        selling_price: row.get::<_, Option<f64>>(3)?.unwrap_or(0.0),
        import_price: row.get(4)?,
        // 无法识别的类型按未分类处理
        product_type: product_type.and_then(|t| t.parse().ok()),
        weight: row.get(6)?,
        status: status.parse().unwrap_or(ProductStatus::Inactive),
    })
}

// ==========================================
// CatalogRepositoryImpl
// ==========================================
pub struct CatalogRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl CatalogRepositoryImpl {
    /// 创建新的 Repository 实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

#[async_trait]
impl CatalogRepository for CatalogRepositoryImpl {
    async fn list_active_products(&self) -> RepositoryResult<Vec<CatalogProduct>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM product_catalog WHERE status = 'active' ORDER BY rowid",
            SELECT_COLUMNS
        ))?;

        let products = stmt
            .query_map([], map_product)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(products)
    }

    async fn upsert_products(&self, products: Vec<CatalogProduct>) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let mut count = 0;
        {
            // ON CONFLICT 更新保留 rowid,目录加载顺序不变
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO product_catalog (
                    product_id, sku, name, selling_price, import_price,
                    product_type, weight_kg, status, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, datetime('now'))
                ON CONFLICT(product_id) DO UPDATE SET
                    sku = excluded.sku,
                    name = excluded.name,
                    selling_price = excluded.selling_price,
                    import_price = excluded.import_price,
                    product_type = excluded.product_type,
                    weight_kg = excluded.weight_kg,
                    status = excluded.status,
                    updated_at = excluded.updated_at
                "#,
            )?;

            for product in &products {
                stmt.execute(params![
                    product.id,
                    product.sku,
                    product.name,
                    product.selling_price,
                    product.import_price,
                    product.product_type.map(|t| t.to_string()),
                    product.weight,
                    product.status.to_string(),
                ])?;
                count += 1;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(count)
    }

    async fn get_product(&self, product_id: &str) -> RepositoryResult<Option<CatalogProduct>> {
        let conn = self.get_conn()?;
        let product = conn
            .query_row(
                &format!("SELECT {} FROM product_catalog WHERE product_id = ?1", SELECT_COLUMNS),
                params![product_id],
                map_product,
            )
            .optional()?;
        Ok(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::ProductType;

    fn repo() -> CatalogRepositoryImpl {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::init_schema(&conn).unwrap();
        CatalogRepositoryImpl::from_connection(Arc::new(Mutex::new(conn)))
    }

    #[tokio::test]
    async fn test_list_active_keeps_load_order_and_filters_inactive() {
        let repo = repo();
        repo.upsert_products(vec![
            CatalogProduct::new("p2", "B", "Second", 1.0),
            CatalogProduct::new("p1", "A", "First", 1.0),
            CatalogProduct::new("p3", "C", "Hidden", 1.0).with_status(ProductStatus::Inactive),
        ])
        .await
        .unwrap();

        let ids: Vec<String> = repo
            .list_active_products()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec!["p2", "p1"]);
    }

    #[tokio::test]
    async fn test_upsert_updates_in_place() {
        let repo = repo();
        repo.upsert_products(vec![
            CatalogProduct::new("p1", "A", "First", 1.0),
            CatalogProduct::new("p2", "B", "Second", 1.0),
        ])
        .await
        .unwrap();

        repo.upsert_products(vec![CatalogProduct::new("p1", "A", "First v2", 9.0)
            .with_import_price(5.0)
            .with_product_type(ProductType::Cold)
            .with_weight(1.25)])
            .await
            .unwrap();

        let products = repo.list_active_products().await.unwrap();
        assert_eq!(products[0].id, "p1");
        assert_eq!(products[0].name, "First v2");

        let p1 = repo.get_product("p1").await.unwrap().unwrap();
        assert_eq!(p1.selling_price, 9.0);
        assert_eq!(p1.import_price, Some(5.0));
        assert_eq!(p1.product_type, Some(ProductType::Cold));
        assert_eq!(p1.weight, Some(1.25));

        assert!(repo.get_product("missing").await.unwrap().is_none());
    }
}
