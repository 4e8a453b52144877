// ==========================================
// 电商订单导入 - 表头定位器
// ==========================================
// 规则: 只扫描前 5 行,标签小写去空白后精确匹配
// 合格表头: Order ID + (SKU ID 或 Seller SKU) + Product Name + Quantity
// ==========================================

use crate::importer::data_cleaner::DataCleaner;
use crate::importer::file_parser::CellGrid;
use serde::{Deserialize, Serialize};

/// 表头最多出现在前几行
pub const HEADER_SCAN_ROWS: usize = 5;

pub const LABEL_ORDER_ID: &str = "order id";
pub const LABEL_SKU_ID: &str = "sku id";
pub const LABEL_SELLER_SKU: &str = "seller sku";
pub const LABEL_PRODUCT_NAME: &str = "product name";
pub const LABEL_QUANTITY: &str = "quantity";
pub const LABEL_SKU_SUBTOTAL: &str = "sku subtotal after discount";

// ==========================================
// HeaderMap - 列索引映射
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderMap {
    pub row_index: usize, // 表头所在行（0 起）
    pub order_id: usize,
    pub sku_id: Option<usize>,
    pub seller_sku: Option<usize>,
    pub product_name: usize,
    pub quantity: usize,
    pub sku_subtotal_after_discount: Option<usize>,
}

// 单行扫描的中间结果
#[derive(Default)]
struct PartialHeader {
    order_id: Option<usize>,
    sku_id: Option<usize>,
    seller_sku: Option<usize>,
    product_name: Option<usize>,
    quantity: Option<usize>,
    sku_subtotal_after_discount: Option<usize>,
}

impl PartialHeader {
    fn from_row(row: &[String], cleaner: &DataCleaner) -> Self {
        let mut partial = PartialHeader::default();

        for (col, value) in row.iter().enumerate() {
            // 同一标签重复出现时保留最左列
            let slot = match cleaner.clean_text(value, true).as_str() {
                LABEL_ORDER_ID => &mut partial.order_id,
                LABEL_SKU_ID => &mut partial.sku_id,
                LABEL_SELLER_SKU => &mut partial.seller_sku,
                LABEL_PRODUCT_NAME => &mut partial.product_name,
                LABEL_QUANTITY => &mut partial.quantity,
                LABEL_SKU_SUBTOTAL => &mut partial.sku_subtotal_after_discount,
                _ => continue,
            };
            slot.get_or_insert(col);
        }

        partial
    }

    fn into_header_map(self, row_index: usize) -> Option<HeaderMap> {
        if self.sku_id.is_none() && self.seller_sku.is_none() {
            return None;
        }

        Some(HeaderMap {
            row_index,
            order_id: self.order_id?,
            sku_id: self.sku_id,
            seller_sku: self.seller_sku,
            product_name: self.product_name?,
            quantity: self.quantity?,
            sku_subtotal_after_discount: self.sku_subtotal_after_discount,
        })
    }
}

/// 定位表头行
///
/// # 返回
/// - Some(HeaderMap): 自上而下第一个合格的表头行
/// - None: 前 5 行均不合格（调用方报告"缺少必需列"）
pub fn locate_headers(grid: &CellGrid) -> Option<HeaderMap> {
    let cleaner = DataCleaner;

    grid.iter()
        .take(HEADER_SCAN_ROWS)
        .enumerate()
        .find_map(|(row_index, row)| {
            PartialHeader::from_row(row, &cleaner).into_header_map(row_index)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_locate_headers_first_row() {
        let grid = vec![
            row(&["Order ID", "Seller SKU", "Product Name", "Quantity"]),
            row(&["1", "A", "Widget", "2"]),
        ];

        let headers = locate_headers(&grid).unwrap();
        assert_eq!(headers.row_index, 0);
        assert_eq!(headers.order_id, 0);
        assert_eq!(headers.seller_sku, Some(1));
        assert_eq!(headers.sku_id, None);
        assert_eq!(headers.product_name, 2);
        assert_eq!(headers.quantity, 3);
    }

    #[test]
    fn test_locate_headers_any_order_and_case() {
        let grid = vec![
            row(&["Báo cáo đơn hàng"]),
            row(&[]),
            row(&["  QUANTITY ", "product NAME", "SKU ID", "order Id", "SKU Subtotal After Discount"]),
        ];

        let headers = locate_headers(&grid).unwrap();
        assert_eq!(headers.row_index, 2);
        assert_eq!(headers.quantity, 0);
        assert_eq!(headers.product_name, 1);
        assert_eq!(headers.sku_id, Some(2));
        assert_eq!(headers.order_id, 3);
        assert_eq!(headers.sku_subtotal_after_discount, Some(4));
    }

    #[test]
    fn test_locate_headers_requires_some_sku_column() {
        let grid = vec![row(&["Order ID", "Product Name", "Quantity"])];
        assert!(locate_headers(&grid).is_none());
    }

    #[test]
    fn test_locate_headers_only_scans_five_rows() {
        let mut grid: CellGrid = (0..5).map(|_| row(&["Date", "Amount"])).collect();
        grid.push(row(&["Order ID", "Seller SKU", "Product Name", "Quantity"]));

        assert!(locate_headers(&grid).is_none());
    }

    #[test]
    fn test_locate_headers_not_found() {
        let grid = vec![row(&["Date", "Amount"]), row(&["2024-01-01", "100"])];
        assert!(locate_headers(&grid).is_none());
    }

    #[test]
    fn test_locate_headers_labels_must_match_exactly() {
        let grid = vec![row(&["Order ID:", "Seller SKU", "Product Name", "Quantity"])];
        assert!(locate_headers(&grid).is_none());
    }

    #[test]
    fn test_duplicate_label_keeps_leftmost_column() {
        let grid = vec![row(&["Order ID", "Seller SKU", "Product Name", "Quantity", "Order ID"])];
        let headers = locate_headers(&grid).unwrap();
        assert_eq!(headers.order_id, 0);
    }
}
