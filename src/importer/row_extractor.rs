// ==========================================
// 电商订单导入 - 数据行提取器
// ==========================================
// 职责: 表格行 + 列映射 → RawOrderRow
// 不合格行返回 SkipReason（静默跳过,不是错误）
// ==========================================

use crate::domain::order::{RawOrderRow, SkipReason};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::file_parser::cell;
use crate::importer::header_locator::HeaderMap;

/// 提取单个数据行
///
/// # 参数
/// - row: 数据行单元格
/// - headers: 表头列映射
/// - row_number: 原始文件行号（1 起,用于诊断日志）
///
/// # 跳过规则（按顺序判定）
/// 1. 订单号为空
/// 2. SKU ID 与 Seller SKU 均为空
/// 3. 商品名称为空
/// 4. 数量 <= 0（无法解析按 0 处理）
pub fn extract_row(
    row: &[String],
    headers: &HeaderMap,
    row_number: usize,
) -> Result<RawOrderRow, SkipReason> {
    let cleaner = DataCleaner;
    let text_at = |col: Option<usize>| -> Option<String> {
        col.and_then(|c| cleaner.normalize_null(Some(cell(row, c))))
    };

    let order_id = text_at(Some(headers.order_id)).ok_or(SkipReason::MissingOrderId)?;

    let sku_id = text_at(headers.sku_id);
    let seller_sku = text_at(headers.seller_sku);
    if sku_id.is_none() && seller_sku.is_none() {
        return Err(SkipReason::MissingSku);
    }

    let product_name =
        text_at(Some(headers.product_name)).ok_or(SkipReason::MissingProductName)?;

    let quantity = cleaner.parse_quantity(cell(row, headers.quantity));
    if quantity <= 0.0 {
        return Err(SkipReason::NonPositiveQuantity);
    }

    let subtotal = headers
        .sku_subtotal_after_discount
        .and_then(|c| cleaner.parse_optional_amount(cell(row, c)));

    let mut raw = RawOrderRow::new(order_id, sku_id, seller_sku, product_name, quantity)
        .with_row_number(row_number);
    raw.sku_subtotal_after_discount = subtotal;

    Ok(raw)
}
