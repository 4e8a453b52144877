// ==========================================
// 电商订单导入 - 订单核算
// ==========================================
// 售价优先级:
//   1. 目录售价 > 0
//   2. Excel "SKU Subtotal After Discount" / 数量
//   3. 0（仍输出订单）
// 名称/类型/重量一律以目录为准
// ==========================================

use crate::domain::order::{EnrichedOrder, RawOrderRow};
use crate::domain::product::CatalogProduct;
use crate::domain::types::{OrderStatus, Platform};

/// 售价来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceSource {
    Catalog,
    ExcelSubtotal,
    Unresolved,
}

/// 解析单价
pub fn resolve_selling_price(row: &RawOrderRow, product: &CatalogProduct) -> (f64, PriceSource) {
    if product.selling_price > 0.0 {
        return (product.selling_price, PriceSource::Catalog);
    }

    match row.sku_subtotal_after_discount {
        Some(subtotal) if subtotal > 0.0 && row.quantity > 0.0 => {
            (subtotal / row.quantity, PriceSource::ExcelSubtotal)
        }
        _ => (0.0, PriceSource::Unresolved),
    }
}

/// 合并目录商品,计算价格与利润
pub fn enrich(row: &RawOrderRow, product: &CatalogProduct, platform: Platform) -> EnrichedOrder {
    let (selling_price, _) = resolve_selling_price(row, product);
    let import_price = product.import_price.unwrap_or(0.0);
    let profit_per_unit = selling_price - import_price;

    EnrichedOrder {
        order_id: row.order_id.clone(),
        sku_id: row.sku_id.clone(),
        seller_sku: row.seller_sku.clone(),
        sku: row.sku.clone(),
        quantity: row.quantity,
        sku_subtotal_after_discount: row.sku_subtotal_after_discount,
        row_number: row.row_number,

        product_id: product.id.clone(),
        matched_product_name: product.name.clone(),
        product_type: product.product_type,
        weight: product.weight,

        selling_price,
        import_price,
        profit_per_unit,
        total_profit: profit_per_unit * row.quantity,
        total_amount: selling_price * row.quantity,

        platform,
        status: OrderStatus::Valid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::ProductType;

    fn row(quantity: f64) -> RawOrderRow {
        RawOrderRow::new("O1", None, Some("ABC".to_string()), "Widget X", quantity)
    }

    #[test]
    fn test_enrich_with_catalog_price() {
        let product = CatalogProduct::new("p1", "ABC", "Widget", 10000.0)
            .with_import_price(6000.0)
            .with_product_type(ProductType::Dry)
            .with_weight(0.5);

        let order = enrich(&row(3.0), &product, Platform::Shopee);

        assert_eq!(order.selling_price, 10000.0);
        assert_eq!(order.import_price, 6000.0);
        assert_eq!(order.profit_per_unit, 4000.0);
        assert_eq!(order.total_profit, 12000.0);
        assert_eq!(order.total_amount, 30000.0);
        assert_eq!(order.matched_product_name, "Widget");
        assert_eq!(order.product_type, Some(ProductType::Dry));
        assert_eq!(order.weight, Some(0.5));
        assert_eq!(order.status, OrderStatus::Valid);
        assert_eq!(order.platform, Platform::Shopee);
    }

    #[test]
    fn test_price_fallback_to_subtotal() {
        let product = CatalogProduct::new("p1", "ABC", "Widget", 0.0);
        let row = row(10.0).with_subtotal(500000.0);

        let (price, source) = resolve_selling_price(&row, &product);
        assert_eq!(price, 50000.0);
        assert_eq!(source, PriceSource::ExcelSubtotal);

        let order = enrich(&row, &product, Platform::Tiktok);
        assert_eq!(order.selling_price, 50000.0);
        assert_eq!(order.total_amount, 500000.0);
    }

    #[test]
    fn test_catalog_price_preferred_over_subtotal() {
        let product = CatalogProduct::new("p1", "ABC", "Widget", 12000.0);
        let row = row(10.0).with_subtotal(500000.0);
        assert_eq!(resolve_selling_price(&row, &product), (12000.0, PriceSource::Catalog));
    }

    #[test]
    fn test_unresolved_price_still_emitted() {
        let product = CatalogProduct::new("p1", "ABC", "Widget", 0.0).with_import_price(3000.0);
        let order = enrich(&row(2.0), &product, Platform::Other);

        assert_eq!(order.selling_price, 0.0);
        assert_eq!(order.profit_per_unit, -3000.0);
        assert_eq!(order.total_profit, -6000.0);
        assert_eq!(order.total_amount, 0.0);
    }

    #[test]
    fn test_missing_import_price_is_zero() {
        let product = CatalogProduct::new("p1", "ABC", "Widget", 8000.0);
        let order = enrich(&row(1.0), &product, Platform::Lazada);
        assert_eq!(order.import_price, 0.0);
        assert_eq!(order.total_profit, 8000.0);
    }
}
