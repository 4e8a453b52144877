// ==========================================
// 电商订单导入 - 导入层
// ==========================================
// 职责: 订单文件 → 订单列表
// 支持: Excel, CSV, TikTok PDF
// ==========================================

// 模块声明
pub mod catalog_matcher;
pub mod data_cleaner;
pub mod error;
pub mod file_parser;
pub mod header_locator;
pub mod ingestion_session;
pub mod order_enricher;
pub mod order_importer_impl;
pub mod order_importer_trait;
pub mod pdf_extractor;
pub mod row_extractor;

// 重导出核心类型
pub use catalog_matcher::{match_product, CatalogIndex, MatchQuery};
pub use data_cleaner::DataCleaner;
pub use error::{ImportError, ImportResult};
pub use file_parser::{CellGrid, CsvParser, ExcelParser, UniversalFileParser};
pub use header_locator::{locate_headers, HeaderMap};
pub use ingestion_session::{IngestionSession, SessionOutput};
pub use order_enricher::enrich;
pub use order_importer_impl::OrderImporterImpl;
pub use pdf_extractor::{extract_from_pdf_text, read_pdf_text, PdfOrderLine};
pub use row_extractor::extract_row;

// 重导出 Trait 接口
pub use order_importer_trait::{FileParser, OrderImporter};
