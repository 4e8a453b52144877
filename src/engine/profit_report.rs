// ==========================================
// 电商订单导入 - 利润汇总报表
// ==========================================
// 输入: 一个批次（或任意集合）的 ImportedOrder
// 输出: 总计 + 按平台分组小计
// ==========================================

use crate::domain::order::ImportedOrder;
use crate::domain::types::Platform;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::instrument;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitTotals {
    pub order_lines: usize,
    pub distinct_orders: usize,
    pub total_quantity: f64,
    pub revenue: f64,
    pub base_profit: f64,
    pub total_fees: f64,
    pub packaging_cost: f64,
    pub final_profit: f64,
}

impl ProfitTotals {
    fn accumulate<'a>(orders: impl Iterator<Item = &'a ImportedOrder>) -> Self {
        let mut totals = ProfitTotals::default();
        let mut order_ids = HashSet::new();

        for item in orders {
            totals.order_lines += 1;
            order_ids.insert(item.order.order_id.as_str());
            totals.total_quantity += item.order.quantity;
            totals.revenue += item.order.total_amount;
            totals.base_profit += item.net_profit.base_profit;
            totals.total_fees += item.net_profit.total_fees;
            totals.packaging_cost += item.net_profit.packaging_cost;
            totals.final_profit += item.net_profit.final_profit;
        }

        totals.distinct_orders = order_ids.len();
        totals
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitReport {
    pub overall: ProfitTotals,
    pub by_platform: BTreeMap<Platform, ProfitTotals>,
}

impl ProfitReport {
    #[instrument(skip(orders), fields(count = orders.len()))]
    pub fn from_orders(orders: &[ImportedOrder]) -> Self {
        let mut grouped: BTreeMap<Platform, Vec<&ImportedOrder>> = BTreeMap::new();
        for item in orders {
            grouped.entry(item.order.platform).or_default().push(item);
        }

        let by_platform = grouped
            .into_iter()
            .map(|(platform, items)| (platform, ProfitTotals::accumulate(items.into_iter())))
            .collect();

        Self {
            overall: ProfitTotals::accumulate(orders.iter()),
            by_platform,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::{NetProfitResult, RawOrderRow};
    use crate::domain::product::CatalogProduct;
    use crate::importer::order_enricher::enrich;

    fn imported(order_id: &str, platform: Platform, quantity: f64, fees: f64) -> ImportedOrder {
        let product = CatalogProduct::new("p1", "ABC", "Widget", 10000.0).with_import_price(6000.0);
        let row = RawOrderRow::new(order_id, None, Some("ABC".to_string()), "Widget", quantity);
        let order = enrich(&row, &product, platform);
        let net_profit = NetProfitResult {
            base_profit: order.total_profit,
            total_fees: fees,
            packaging_cost: 0.0,
            final_profit: order.total_profit - fees,
            fee_breakdown: Default::default(),
        };
        ImportedOrder { order, net_profit }
    }

    #[test]
    fn test_report_totals_and_platform_split() {
        let orders = vec![
            imported("A", Platform::Shopee, 3.0, 1000.0),
            imported("A", Platform::Shopee, 1.0, 0.0),
            imported("B", Platform::Tiktok, 2.0, 500.0),
        ];

        let report = ProfitReport::from_orders(&orders);

        assert_eq!(report.overall.order_lines, 3);
        assert_eq!(report.overall.distinct_orders, 2);
        assert_eq!(report.overall.total_quantity, 6.0);
        assert_eq!(report.overall.revenue, 60000.0);
        assert_eq!(report.overall.base_profit, 24000.0);
        assert_eq!(report.overall.final_profit, 22500.0);

        let shopee = &report.by_platform[&Platform::Shopee];
        assert_eq!(shopee.order_lines, 2);
        assert_eq!(shopee.distinct_orders, 1);
        assert_eq!(shopee.total_fees, 1000.0);
        assert_eq!(report.by_platform[&Platform::Tiktok].final_profit, 7500.0);
        assert!(!report.by_platform.contains_key(&Platform::Lazada));
    }

    #[test]
    fn test_empty_report() {
        let report = ProfitReport::from_orders(&[]);
        assert_eq!(report.overall, ProfitTotals::default());
        assert!(report.by_platform.is_empty());
    }
}
