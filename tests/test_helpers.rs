// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 临时数据库、商品目录种子数据、订单文件生成
// ==========================================

#![allow(dead_code)]

use retail_order_import::config::ConfigManager;
use retail_order_import::db::{init_schema, open_sqlite_connection};
use retail_order_import::domain::{CatalogProduct, ProductType};
use retail_order_import::importer::{OrderImporterImpl, UniversalFileParser};
use retail_order_import::repository::{CatalogRepositoryImpl, OrderRepositoryImpl};
use rusqlite::Connection;
use std::error::Error;
use std::io::Write;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

pub type TestImporter = OrderImporterImpl<ConfigManager, CatalogRepositoryImpl, OrderRepositoryImpl>;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_string_lossy().to_string();

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 打开共享连接（同一测试内各仓储共用）
pub fn shared_connection(db_path: &str) -> Arc<Mutex<Connection>> {
    let conn = open_sqlite_connection(db_path).unwrap();
    Arc::new(Mutex::new(conn))
}

/// 基础商品目录
///
/// - WIDGET: 售价 10000 / 进价 6000
/// - NOPRICE: 无售价（依赖表格小计回填）
/// - TEA: 干货 0.5kg,用于费用 + 包装场景
pub fn sample_catalog() -> Vec<CatalogProduct> {
    vec![
        CatalogProduct::new("P-WIDGET", "WIDGET", "Blue Widget", 10000.0)
            .with_import_price(6000.0),
        CatalogProduct::new("P-NOPRICE", "NOPRICE", "Gift Box", 0.0).with_import_price(30000.0),
        CatalogProduct::new("P-TEA", "TEA-500", "Green Tea 500g", 100000.0)
            .with_import_price(60000.0)
            .with_product_type(ProductType::Dry)
            .with_weight(0.5),
    ]
}

/// 组装导入器（配置/目录/订单仓储共用一个连接）
pub fn build_importer(conn: Arc<Mutex<Connection>>) -> TestImporter {
    OrderImporterImpl::new(
        ConfigManager::from_connection(conn.clone()).unwrap(),
        CatalogRepositoryImpl::from_connection(conn.clone()),
        OrderRepositoryImpl::from_connection(conn),
        Box::new(UniversalFileParser),
    )
}

/// 写入临时 CSV 文件
pub fn write_csv(content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
