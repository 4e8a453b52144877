// ==========================================
// 电商订单导入 - 单次导入会话
// ==========================================
// 职责: 持有本次导入的只读快照（目录/费率表/包装成本）,
//       把单元格网格或 PDF 文本转换为订单列表
// 流程: 定位表头 → 逐行提取 → 商品匹配 → 价格核算 → 利润调整
// 红线: 致命错误直接返回,不产生部分结果
// ==========================================

use crate::domain::fee::FeeSchedule;
use crate::domain::import_batch::ImportSummary;
use crate::domain::order::{EnrichedOrder, ImportedOrder, RawOrderRow, SkipReason};
use crate::domain::types::Platform;
use crate::engine::packaging::{PackagingCostProvider, PackagingCostTable};
use crate::engine::profit_adjuster::adjust_profit;
use crate::importer::catalog_matcher::{match_product, CatalogIndex, MatchQuery};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{is_blank_row, CellGrid};
use crate::importer::header_locator::{locate_headers, HEADER_SCAN_ROWS};
use crate::importer::order_enricher::{enrich, resolve_selling_price, PriceSource};
use crate::importer::pdf_extractor::{extract_from_pdf_text, weight_token_to_kg, DEFAULT_PDF_SKU};
use crate::importer::row_extractor::extract_row;
use tracing::{debug, info, warn};

// ==========================================
// SessionOutput - 会话输出
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct SessionOutput {
    pub orders: Vec<ImportedOrder>,
    pub summary: ImportSummary,
}

// ==========================================
// IngestionSession
// ==========================================
pub struct IngestionSession {
    catalog: CatalogIndex,
    platform: Platform,
    fee_schedule: Option<FeeSchedule>,
    packaging: Box<dyn PackagingCostProvider>,
}

impl IngestionSession {
    /// 创建会话（无费率表,默认包装成本表）
    pub fn new(catalog: CatalogIndex, platform: Platform) -> Self {
        Self {
            catalog,
            platform,
            fee_schedule: None,
            packaging: Box::new(PackagingCostTable::default()),
        }
    }

    pub fn with_fee_schedule(mut self, fee_schedule: Option<FeeSchedule>) -> Self {
        self.fee_schedule = fee_schedule;
        self
    }

    pub fn with_packaging(mut self, packaging: impl PackagingCostProvider + 'static) -> Self {
        self.packaging = Box::new(packaging);
        self
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn catalog_size(&self) -> usize {
        self.catalog.len()
    }

    // ==========================================
    // 表格路径
    // ==========================================

    /// 处理单元格网格
    ///
    /// # 错误
    /// - NoDataRows: 网格为空,或表头之后没有非空行
    /// - RequiredColumnsMissing: 前 5 行内未找到合格表头
    pub fn process_grid(&self, grid: &CellGrid) -> ImportResult<SessionOutput> {
        if grid.iter().all(|row| is_blank_row(row)) {
            return Err(ImportError::NoDataRows);
        }

        let headers = locate_headers(grid).ok_or(ImportError::RequiredColumnsMissing {
            scanned_rows: HEADER_SCAN_ROWS,
        })?;
        debug!(header_row = headers.row_index + 1, "表头定位完成");

        let first_data_row = headers.row_index + 1;
        let data_rows = grid.get(first_data_row..).unwrap_or(&[]);
        if data_rows.iter().all(|row| is_blank_row(row)) {
            return Err(ImportError::NoDataRows);
        }

        let mut output = SessionOutput::default();
        for (offset, row) in data_rows.iter().enumerate() {
            if is_blank_row(row) {
                continue;
            }
            output.summary.total_rows += 1;

            // 原始文件行号（1 起）
            let row_number = first_data_row + offset + 1;
            let raw = match extract_row(row, &headers, row_number) {
                Ok(raw) => raw,
                Err(reason) => {
                    debug!(row_number, reason = %reason, "跳过数据行");
                    output.summary.record_skip(reason);
                    continue;
                }
            };

            let query = MatchQuery::from(&raw);
            if let Some(order) = self.match_and_enrich(&raw, &query, &mut output.summary) {
                output.orders.push(self.finish(order));
            }
        }

        output.summary.valid_count = output.orders.len();
        self.log_summary(&output.summary);
        Ok(output)
    }

    // ==========================================
    // PDF 路径
    // ==========================================

    /// 处理 PDF 全文
    ///
    /// # 错误
    /// - NoPdfProducts: 未找到商品行
    pub fn process_pdf_text(&self, text: &str) -> ImportResult<SessionOutput> {
        let line = extract_from_pdf_text(text).ok_or(ImportError::NoPdfProducts)?;

        let sku = Some(line.sku.clone()).filter(|s| s != DEFAULT_PDF_SKU);
        let raw = RawOrderRow::new(
            line.order_id.clone(),
            Some(line.sku.clone()),
            None,
            line.product_name.clone(),
            line.quantity,
        )
        .with_row_number(1);

        // 默认规格不参与 SKU 匹配,只按名称前 5 个词匹配
        let query = MatchQuery {
            sku: sku.clone(),
            seller_sku: None,
            sku_id: sku,
            product_name: line.match_name.clone(),
        };

        let mut output = SessionOutput::default();
        output.summary.total_rows = 1;

        if let Some(mut order) = self.match_and_enrich(&raw, &query, &mut output.summary) {
            if order.weight.is_none() {
                order.weight = line.weight.as_deref().and_then(weight_token_to_kg);
            }
            output.orders.push(self.finish(order));
        }

        output.summary.valid_count = output.orders.len();
        self.log_summary(&output.summary);
        Ok(output)
    }

    // ==========================================
    // 内部步骤
    // ==========================================

    fn match_and_enrich(
        &self,
        raw: &RawOrderRow,
        query: &MatchQuery,
        summary: &mut ImportSummary,
    ) -> Option<EnrichedOrder> {
        let Some(product) = match_product(query, &self.catalog) else {
            debug!(
                row_number = raw.row_number,
                sku = %raw.sku,
                product_name = %raw.product_name,
                "目录中未匹配到商品"
            );
            summary.record_skip(SkipReason::NoCatalogMatch);
            return None;
        };

        let (_, source) = resolve_selling_price(raw, product);
        if source == PriceSource::Unresolved {
            warn!(
                row_number = raw.row_number,
                product_id = %product.id,
                "售价无法确定,按 0 输出"
            );
            summary.degraded_price_count += 1;
        }

        Some(enrich(raw, product, self.platform))
    }

    fn finish(&self, order: EnrichedOrder) -> ImportedOrder {
        let net_profit = adjust_profit(&order, self.fee_schedule.as_ref(), self.packaging.as_ref());
        ImportedOrder { order, net_profit }
    }

    fn log_summary(&self, summary: &ImportSummary) {
        info!(
            platform = %self.platform,
            total_rows = summary.total_rows,
            valid = summary.valid_count,
            skipped = summary.skipped_count,
            degraded_price = summary.degraded_price_count,
            skip_reasons = ?summary.skip_reasons,
            "订单处理完成"
        );
    }
}
