// ==========================================
// 电商订单导入 - 订单导入器实现
// ==========================================
// 职责: 整合导入流程，从文件到数据库
// 流程: 读取配置快照 → 解析 → 会话处理 → 整批落库
// ==========================================

use crate::config::ImportConfigReader;
use crate::domain::fee::FeeSchedule;
use crate::domain::import_batch::{ImportBatch, ImportOutcome};
use crate::domain::types::Platform;
use crate::engine::packaging::PackagingCostTable;
use crate::importer::catalog_matcher::CatalogIndex;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::ingestion_session::{IngestionSession, SessionOutput};
use crate::importer::order_importer_trait::{FileParser, OrderImporter};
use crate::importer::pdf_extractor::read_pdf_text;
use crate::repository::{CatalogRepository, OrderRepository};
use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// OrderImporterImpl - 订单导入器实现
// ==========================================
pub struct OrderImporterImpl<C, R, O>
where
    C: ImportConfigReader,
    R: CatalogRepository,
    O: OrderRepository,
{
    // 配置读取器
    config: C,

    // 数据访问层
    catalog_repo: R,
    order_repo: O,

    // 导入组件
    file_parser: Box<dyn FileParser>,
}

impl<C, R, O> OrderImporterImpl<C, R, O>
where
    C: ImportConfigReader,
    R: CatalogRepository,
    O: OrderRepository,
{
    /// 创建新的 OrderImporter 实例
    ///
    /// # 参数
    /// - config: 配置读取器
    /// - catalog_repo: 商品目录仓储（快照来源）
    /// - order_repo: 订单仓储（落库）
    /// - file_parser: 文件解析器
    pub fn new(config: C, catalog_repo: R, order_repo: O, file_parser: Box<dyn FileParser>) -> Self {
        Self {
            config,
            catalog_repo,
            order_repo,
            file_parser,
        }
    }

    // ==========================================
    // 快照加载
    // ==========================================

    /// 建立本次导入的会话（目录/费率表/包装表各读一次）
    async fn open_session(&self, platform: Platform) -> (IngestionSession, String) {
        // 目录读取失败: 空目录继续（所有行按未匹配跳过）
        let products = match self.catalog_repo.list_active_products().await {
            Ok(products) => products,
            Err(e) => {
                warn!(error = %e, "商品目录读取失败，使用空目录");
                Vec::new()
            }
        };
        let catalog = CatalogIndex::new(products);

        let store_id = match self.config.get_store_id().await {
            Ok(id) => id,
            Err(e) => {
                warn!(error = %e, "店铺配置读取失败，使用默认店铺");
                crate::config::DEFAULT_STORE_ID.to_string()
            }
        };

        let fee_schedule = self.load_fee_schedule(&store_id, platform).await;
        let packaging = self.load_packaging_table().await;

        info!(
            catalog_size = catalog.len(),
            store_id = %store_id,
            platform = %platform,
            has_fee_schedule = fee_schedule.is_some(),
            "导入快照加载完成"
        );

        let session = IngestionSession::new(catalog, platform)
            .with_fee_schedule(fee_schedule)
            .with_packaging(packaging);
        (session, store_id)
    }

    async fn load_fee_schedule(&self, store_id: &str, platform: Platform) -> Option<FeeSchedule> {
        match self.config.get_fee_schedule(store_id, platform).await {
            Ok(Some(schedule)) => Some(schedule),
            Ok(None) => {
                debug!(store_id = %store_id, platform = %platform, "未配置费率表，费用按 0 计");
                None
            }
            Err(e) => {
                warn!(error = %e, "费率表读取失败，费用按 0 计");
                None
            }
        }
    }

    async fn load_packaging_table(&self) -> PackagingCostTable {
        match self.config.get_packaging_table().await {
            Ok(Some(table)) => table,
            Ok(None) => PackagingCostTable::default(),
            Err(e) => {
                warn!(error = %e, "包装成本表读取失败，使用默认表");
                PackagingCostTable::default()
            }
        }
    }

    // ==========================================
    // 落库
    // ==========================================

    async fn persist(
        &self,
        file_path: &Path,
        platform: Platform,
        store_id: String,
        output: SessionOutput,
        start_time: Instant,
    ) -> ImportResult<ImportOutcome> {
        let batch_id = Uuid::new_v4().to_string();
        let elapsed = start_time.elapsed();

        let batch = ImportBatch {
            batch_id: batch_id.clone(),
            file_name: file_path
                .file_name()
                .map(|n| n.to_string_lossy().to_string()),
            file_path: Some(file_path.display().to_string()),
            platform,
            store_id,
            total_rows: output.summary.total_rows as i64,
            valid_rows: output.summary.valid_count as i64,
            skipped_rows: output.summary.skipped_count as i64,
            imported_at: Utc::now(),
            elapsed_ms: elapsed.as_millis() as i64,
        };

        let written = self
            .order_repo
            .save_import(&batch, &output.orders)
            .await
            .map_err(|e| {
                error!(batch_id = %batch_id, error = %e, "订单落库失败");
                ImportError::from(e)
            })?;

        info!(
            batch_id = %batch_id,
            written = written,
            valid = output.summary.valid_count,
            skipped = output.summary.skipped_count,
            elapsed_ms = batch.elapsed_ms,
            "订单导入完成"
        );

        Ok(ImportOutcome {
            batch,
            summary: output.summary,
            orders: output.orders,
            elapsed_time: start_time.elapsed(),
        })
    }
}

#[async_trait]
impl<C, R, O> OrderImporter for OrderImporterImpl<C, R, O>
where
    C: ImportConfigReader,
    R: CatalogRepository,
    O: OrderRepository,
{
    #[instrument(skip(self, file_path), fields(file = %file_path.display()))]
    async fn import_spreadsheet(
        &self,
        file_path: &Path,
        platform: Platform,
    ) -> ImportResult<ImportOutcome> {
        let start_time = Instant::now();
        info!(platform = %platform, "开始导入订单表格");

        // === 步骤 1: 加载快照 ===
        let (session, store_id) = self.open_session(platform).await;

        // === 步骤 2: 解析文件 ===
        debug!("步骤 2: 解析文件");
        let grid = self.file_parser.parse_to_grid(file_path).map_err(|e| {
            error!(error = %e, "文件解析失败");
            e
        })?;
        info!(rows = grid.len(), "文件解析完成");

        // === 步骤 3: 逐行处理 ===
        debug!("步骤 3: 表头定位与逐行处理");
        let output = session.process_grid(&grid).map_err(|e| {
            warn!(error = %e, "订单文件内容不合格");
            e
        })?;

        // === 步骤 4: 落库 ===
        self.persist(file_path, platform, store_id, output, start_time).await
    }

    #[instrument(skip(self, file_path), fields(file = %file_path.display()))]
    async fn import_pdf(&self, file_path: &Path) -> ImportResult<ImportOutcome> {
        let start_time = Instant::now();
        let platform = Platform::Tiktok;
        info!("开始导入 TikTok PDF");

        let (session, store_id) = self.open_session(platform).await;

        let text = read_pdf_text(file_path).map_err(|e| {
            error!(error = %e, "PDF 读取失败");
            e
        })?;
        debug!(chars = text.len(), "PDF 文本提取完成");

        let output = session.process_pdf_text(&text).map_err(|e| {
            warn!(error = %e, "PDF 内容不合格");
            e
        })?;

        self.persist(file_path, platform, store_id, output, start_time).await
    }

    async fn batch_import(
        &self,
        file_paths: &[PathBuf],
        platform: Platform,
    ) -> Vec<Result<ImportOutcome, String>> {
        info!(count = file_paths.len(), "开始批量导入");

        let mut results = Vec::with_capacity(file_paths.len());
        for path in file_paths {
            let is_pdf = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case("pdf"))
                .unwrap_or(false);

            let result = if is_pdf {
                self.import_pdf(path).await
            } else {
                self.import_spreadsheet(path, platform).await
            };

            if let Err(e) = &result {
                warn!(file = %path.display(), error = %e, "文件导入失败");
            }
            results.push(result.map_err(|e| e.to_string()));
        }

        results
    }
}
