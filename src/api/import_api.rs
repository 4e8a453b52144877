// ==========================================
// 订单导入API
// ==========================================
// 职责: 封装订单导入、批次查询、利润汇总
// 说明: 所有错误转换为单条可读提示（ApiError）
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection};
use crate::domain::import_batch::{ImportBatch, ImportOutcome};
use crate::domain::order::ImportedOrder;
use crate::domain::product::CatalogProduct;
use crate::domain::types::Platform;
use crate::engine::ProfitReport;
use crate::i18n::t_with_args;
use crate::importer::{OrderImporter, OrderImporterImpl, UniversalFileParser};
use crate::repository::{
    CatalogRepository, CatalogRepositoryImpl, OrderRepository, OrderRepositoryImpl,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, Mutex};

type ConcreteImporter = OrderImporterImpl<ConfigManager, CatalogRepositoryImpl, OrderRepositoryImpl>;

/// 导入API响应
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportApiResponse {
    /// 导入批次ID
    pub batch_id: String,
    /// 成功输出的订单行数
    pub valid_count: usize,
    /// 界面错误计数（跳过行不计入）
    pub error_count: usize,
    /// 静默跳过的行数（诊断用）
    pub skipped_count: usize,
    /// 核算后的订单行
    pub orders: Vec<ImportedOrder>,
    /// 本批次利润汇总
    pub report: ProfitReport,
    /// 导入耗时（毫秒）
    pub elapsed_ms: i64,
}

impl From<ImportOutcome> for ImportApiResponse {
    fn from(outcome: ImportOutcome) -> Self {
        let report = ProfitReport::from_orders(&outcome.orders);
        Self {
            batch_id: outcome.batch.batch_id,
            valid_count: outcome.summary.valid_count,
            error_count: outcome.summary.error_count,
            skipped_count: outcome.summary.skipped_count,
            orders: outcome.orders,
            report,
            elapsed_ms: outcome.elapsed_time.as_millis() as i64,
        }
    }
}

/// 导入API
pub struct ImportApi {
    db_path: String,
    conn: Arc<Mutex<Connection>>,
}

impl ImportApi {
    /// 创建新的ImportApi实例（打开数据库并确保表结构存在）
    pub fn new(db_path: impl Into<String>) -> ApiResult<Self> {
        let db_path = db_path.into();
        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| ApiError::DatabaseConnectionError(e.to_string()))?;
        init_schema(&conn).map_err(|e| ApiError::DatabaseError(e.to_string()))?;

        tracing::debug!(db_path = %db_path, "ImportApi 初始化完成");
        Ok(Self {
            db_path,
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// 导入订单表格（.xlsx/.xls/.csv）
    ///
    /// # 参数
    /// - file_path: 文件路径
    /// - platform: 平台名称（shopee / tiktok / lazada / other）
    ///
    /// # 返回
    /// - Ok(ImportApiResponse): 导入结果
    /// - Err(ApiError): 平台无效、缺少必需列、无数据行、文件不可读、落库失败
    pub async fn import_orders(
        &self,
        file_path: &str,
        platform: &str,
    ) -> ApiResult<ImportApiResponse> {
        let platform = parse_platform(platform)?;
        let importer = self.create_importer()?;

        let outcome = importer
            .import_spreadsheet(Path::new(file_path), platform)
            .await?;
        Ok(ImportApiResponse::from(outcome))
    }

    /// 导入 TikTok 打包单 PDF
    pub async fn import_tiktok_pdf(&self, file_path: &str) -> ApiResult<ImportApiResponse> {
        let importer = self.create_importer()?;

        let outcome = importer.import_pdf(Path::new(file_path)).await?;
        Ok(ImportApiResponse::from(outcome))
    }

    /// 查询批次下的订单行
    pub async fn list_batch_orders(&self, batch_id: &str) -> ApiResult<Vec<ImportedOrder>> {
        let repo = OrderRepositoryImpl::from_connection(self.conn.clone());
        Ok(repo.list_orders_by_batch(batch_id).await?)
    }

    /// 计算批次利润汇总
    ///
    /// # 返回
    /// - Ok: 批次存在（无订单行时为空汇总）
    /// - Err(NotFound): 批次不存在
    pub async fn profit_report(&self, batch_id: &str) -> ApiResult<ProfitReport> {
        let repo = OrderRepositoryImpl::from_connection(self.conn.clone());
        if repo.get_batch(batch_id).await?.is_none() {
            return Err(ApiError::NotFound(t_with_args(
                "api.batch_not_found",
                &[("batch_id", batch_id)],
            )));
        }

        let orders = repo.list_orders_by_batch(batch_id).await?;
        Ok(ProfitReport::from_orders(&orders))
    }

    /// 最近的导入批次
    pub async fn recent_batches(&self, limit: i64) -> ApiResult<Vec<ImportBatch>> {
        let repo = OrderRepositoryImpl::from_connection(self.conn.clone());
        Ok(repo.get_recent_batches(limit.clamp(1, 100)).await?)
    }

    /// 写入/更新商品目录
    pub async fn upsert_catalog(&self, products: Vec<CatalogProduct>) -> ApiResult<usize> {
        let repo = CatalogRepositoryImpl::from_connection(self.conn.clone());
        Ok(repo.upsert_products(products).await?)
    }

    /// 创建OrderImporter实例
    fn create_importer(&self) -> ApiResult<ConcreteImporter> {
        let config = ConfigManager::from_connection(self.conn.clone())?;
        let catalog_repo = CatalogRepositoryImpl::from_connection(self.conn.clone());
        let order_repo = OrderRepositoryImpl::from_connection(self.conn.clone());

        Ok(OrderImporterImpl::new(
            config,
            catalog_repo,
            order_repo,
            Box::new(UniversalFileParser),
        ))
    }
}

fn parse_platform(raw: &str) -> ApiResult<Platform> {
    raw.parse::<Platform>().map_err(|_| {
        ApiError::InvalidInput(t_with_args("api.invalid_platform", &[("platform", raw)]))
    })
}
