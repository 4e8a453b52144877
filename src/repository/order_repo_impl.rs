// ==========================================
// 电商订单导入 - 订单落库 Repository 实现
// ==========================================
// 职责: 实现批次/订单数据访问（使用 rusqlite）
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::import_batch::ImportBatch;
use crate::domain::order::{EnrichedOrder, ImportedOrder, NetProfitResult};
use crate::domain::types::{OrderStatus, Platform};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::order_repo::OrderRepository;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};
use std::sync::{Arc, Mutex, MutexGuard};

const ORDER_COLUMNS: &str = "order_id, product_id, sku_id, seller_sku, sku, quantity, \
     sku_subtotal_after_discount, row_number, matched_product_name, product_type, weight_kg, \
     selling_price, import_price, profit_per_unit, total_profit, total_amount, platform, status, \
     base_profit, total_fees, packaging_cost, final_profit, fee_breakdown_json";

const BATCH_COLUMNS: &str = "batch_id, file_name, file_path, platform, store_id, total_rows, \
     valid_rows, skipped_rows, imported_at, elapsed_ms";

fn map_imported_order(row: &Row) -> rusqlite::Result<ImportedOrder> {
    let product_type: Option<String> = row.get(9)?;
    let platform: String = row.get(16)?;
    let fee_breakdown_json: String = row.get(22)?;

    let order = EnrichedOrder {
        order_id: row.get(0)?,
        product_id: row.get(1)?,
        sku_id: row.get(2)?,
        seller_sku: row.get(3)?,
        sku: row.get(4)?,
        quantity: row.get(5)?,
        sku_subtotal_after_discount: row.get(6)?,
        row_number: row.get::<_, i64>(7)?.max(0) as usize,
        matched_product_name: row.get(8)?,
        product_type: product_type.and_then(|t| t.parse().ok()),
        weight: row.get(10)?,
        selling_price: row.get(11)?,
        import_price: row.get(12)?,
        profit_per_unit: row.get(13)?,
        total_profit: row.get(14)?,
        total_amount: row.get(15)?,
        platform: platform.parse().unwrap_or(Platform::Other),
        status: OrderStatus::Valid,
    };

    let net_profit = NetProfitResult {
        base_profit: row.get(18)?,
        total_fees: row.get(19)?,
        packaging_cost: row.get(20)?,
        final_profit: row.get(21)?,
        fee_breakdown: serde_json::from_str(&fee_breakdown_json).unwrap_or_default(),
    };

    Ok(ImportedOrder { order, net_profit })
}

fn map_batch(row: &Row) -> rusqlite::Result<ImportBatch> {
    let platform: String = row.get(3)?;

    Ok(ImportBatch {
        batch_id: row.get(0)?,
        file_name: row.get(1)?,
        file_path: row.get(2)?,
        platform: platform.parse().unwrap_or(Platform::Other),
        store_id: row.get(4)?,
        total_rows: row.get(5)?,
        valid_rows: row.get(6)?,
        skipped_rows: row.get(7)?,
        imported_at: row.get(8)?,
        elapsed_ms: row.get(9)?,
    })
}

// ==========================================
// OrderRepositoryImpl
// ==========================================
pub struct OrderRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl OrderRepositoryImpl {
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

    /// 在事务中写入批次
    fn insert_batch_tx(tx: &Transaction, batch: &ImportBatch) -> RepositoryResult<()> {
        tx.execute(
            &format!(
                "INSERT INTO import_batch ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                BATCH_COLUMNS
            ),
            params![
                batch.batch_id,
                batch.file_name,
                batch.file_path,
                batch.platform.as_key(),
                batch.store_id,
                batch.total_rows,
                batch.valid_rows,
                batch.skipped_rows,
                batch.imported_at,
                batch.elapsed_ms,
            ],
        )?;
        Ok(())
    }

    /// 在事务中批量写入订单行
    ///
    /// 同一批次内按行号区分（同订单同商品的多行全部保留）;
    /// 其他批次中相同 (order_id, product_id) 的旧行先删除。
    fn batch_insert_orders_tx(
        tx: &Transaction,
        batch_id: &str,
        orders: &[ImportedOrder],
    ) -> RepositoryResult<usize> {
        let mut delete_stmt = tx.prepare(
            "DELETE FROM imported_order WHERE order_id = ?1 AND product_id = ?2 AND batch_id <> ?3",
        )?;
        for item in orders {
            delete_stmt.execute(params![item.order.order_id, item.order.product_id, batch_id])?;
        }

        let mut stmt = tx.prepare(&format!(
            "INSERT INTO imported_order ({}, batch_id) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12,
                ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24
            )",
            ORDER_COLUMNS
        ))?;

        let mut count = 0;
        for item in orders {
            let order = &item.order;
            let net = &item.net_profit;
            let fee_breakdown_json =
                serde_json::to_string(&net.fee_breakdown).map_err(anyhow::Error::from)?;

            stmt.execute(params![
                order.order_id,
                order.product_id,
                order.sku_id,
                order.seller_sku,
                order.sku,
                order.quantity,
                order.sku_subtotal_after_discount,
                order.row_number as i64,
                order.matched_product_name,
                order.product_type.map(|t| t.to_string()),
                order.weight,
                order.selling_price,
                order.import_price,
                order.profit_per_unit,
                order.total_profit,
                order.total_amount,
                order.platform.as_key(),
                order.status.to_string(),
                net.base_profit,
                net.total_fees,
                net.packaging_cost,
                net.final_profit,
                fee_breakdown_json,
                batch_id,
            ])?;
            count += 1;
        }

        Ok(count)
    }
}

#[async_trait]
impl OrderRepository for OrderRepositoryImpl {
    async fn insert_batch(&self, batch: &ImportBatch) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Self::insert_batch_tx(&tx, batch)?;
        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))
    }

    async fn batch_insert_orders(
        &self,
        batch_id: &str,
        orders: &[ImportedOrder],
    ) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        let count = Self::batch_insert_orders_tx(&tx, batch_id, orders)?;
        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(count)
    }

    async fn save_import(
        &self,
        batch: &ImportBatch,
        orders: &[ImportedOrder],
    ) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        Self::insert_batch_tx(&tx, batch)?;
        let count = Self::batch_insert_orders_tx(&tx, &batch.batch_id, orders)?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(count)
    }

    async fn list_orders_by_batch(&self, batch_id: &str) -> RepositoryResult<Vec<ImportedOrder>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM imported_order WHERE batch_id = ?1 ORDER BY row_number, rowid",
            ORDER_COLUMNS
        ))?;

        let orders = stmt
            .query_map(params![batch_id], map_imported_order)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(orders)
    }

    async fn get_batch(&self, batch_id: &str) -> RepositoryResult<Option<ImportBatch>> {
        let conn = self.get_conn()?;
        let batch = conn
            .query_row(
                &format!("SELECT {} FROM import_batch WHERE batch_id = ?1", BATCH_COLUMNS),
                params![batch_id],
                map_batch,
            )
            .optional()?;
        Ok(batch)
    }

    async fn count_orders(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM imported_order", [], |row| row.get(0))?;
        Ok(count)
    }

    async fn get_recent_batches(&self, limit: i64) -> RepositoryResult<Vec<ImportBatch>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM import_batch ORDER BY imported_at DESC, rowid DESC LIMIT ?1",
            BATCH_COLUMNS
        ))?;

        let batches = stmt
            .query_map(params![limit], map_batch)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(batches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fee::FeeKind;
    use crate::domain::order::RawOrderRow;
    use crate::domain::product::CatalogProduct;
    use crate::importer::order_enricher::enrich;
    use chrono::Utc;

    fn repo() -> OrderRepositoryImpl {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::configure_sqlite_connection(&conn).unwrap();
        crate::db::init_schema(&conn).unwrap();
        OrderRepositoryImpl::from_connection(Arc::new(Mutex::new(conn)))
    }

    fn batch(batch_id: &str) -> ImportBatch {
        ImportBatch {
            batch_id: batch_id.to_string(),
            file_name: Some("orders.csv".to_string()),
            file_path: None,
            platform: Platform::Shopee,
            store_id: "default".to_string(),
            total_rows: 2,
            valid_rows: 2,
            skipped_rows: 0,
            imported_at: Utc::now(),
            elapsed_ms: 12,
        }
    }

    fn imported(order_id: &str, row_number: usize) -> ImportedOrder {
        let product = CatalogProduct::new("p1", "ABC", "Widget", 10000.0).with_import_price(6000.0);
        let row = RawOrderRow::new(order_id, None, Some("ABC".to_string()), "Widget", 3.0)
            .with_row_number(row_number);
        let order = enrich(&row, &product, Platform::Shopee);

        let mut net_profit = NetProfitResult {
            base_profit: 12000.0,
            total_fees: 1500.0,
            packaging_cost: 0.0,
            final_profit: 10500.0,
            fee_breakdown: Default::default(),
        };
        net_profit.fee_breakdown.insert(FeeKind::CommissionFee, 1500.0);
        ImportedOrder { order, net_profit }
    }

    #[tokio::test]
    async fn test_save_import_and_read_back() {
        let repo = repo();
        let orders = vec![imported("B", 3), imported("A", 2)];

        let written = repo.save_import(&batch("b1"), &orders).await.unwrap();
        assert_eq!(written, 2);

        let loaded = repo.list_orders_by_batch("b1").await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].order.order_id, "A");
        assert_eq!(loaded[1], orders[0]);

        let batches = repo.get_recent_batches(10).await.unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].batch_id, "b1");
        assert_eq!(batches[0].file_name.as_deref(), Some("orders.csv"));
    }

    #[tokio::test]
    async fn test_reimport_replaces_same_order_line() {
        let repo = repo();
        repo.save_import(&batch("b1"), &[imported("A", 2)]).await.unwrap();
        repo.save_import(&batch("b2"), &[imported("A", 2)]).await.unwrap();

        assert_eq!(repo.count_orders().await.unwrap(), 1);
        assert!(repo.list_orders_by_batch("b1").await.unwrap().is_empty());
        assert_eq!(repo.list_orders_by_batch("b2").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_same_order_line_twice_in_one_batch_keeps_both() {
        let repo = repo();
        let orders = vec![imported("A", 2), imported("A", 3)];

        let written = repo.save_import(&batch("b1"), &orders).await.unwrap();
        assert_eq!(written, 2);
        assert_eq!(repo.count_orders().await.unwrap(), 2);

        let loaded = repo.list_orders_by_batch("b1").await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].order.row_number, 2);
        assert_eq!(loaded[1].order.row_number, 3);
    }

    #[tokio::test]
    async fn test_get_batch_without_orders() {
        let repo = repo();
        repo.save_import(&batch("b1"), &[]).await.unwrap();

        let found = repo.get_batch("b1").await.unwrap().unwrap();
        assert_eq!(found.batch_id, "b1");
        assert_eq!(found.platform, Platform::Shopee);
        assert!(repo.list_orders_by_batch("b1").await.unwrap().is_empty());

        assert!(repo.get_batch("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_orders_require_existing_batch() {
        let repo = repo();
        let result = repo.batch_insert_orders("missing", &[imported("A", 2)]).await;
        assert!(result.is_err());
        assert_eq!(repo.count_orders().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_batch_rolls_back_orders() {
        let repo = repo();
        repo.insert_batch(&batch("b1")).await.unwrap();

        let result = repo.save_import(&batch("b1"), &[imported("A", 2)]).await;
        assert!(matches!(result, Err(RepositoryError::UniqueConstraintViolation(_))));
        assert_eq!(repo.count_orders().await.unwrap(), 0);
    }
}
