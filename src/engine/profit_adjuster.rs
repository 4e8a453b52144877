// ==========================================
// 电商订单导入 - 利润调整引擎
// ==========================================
// final_profit = base_profit - total_fees - packaging_cost
// 百分比费用基于营业额 (selling_price * quantity),固定费用直接计入
// 红线: 不抛错,缺失/非法输入一律按 0 计
// ==========================================

use crate::domain::fee::{FeeKind, FeeSchedule, FeeType};
use crate::domain::order::{EnrichedOrder, NetProfitResult};
use crate::engine::packaging::PackagingCostProvider;
use std::collections::BTreeMap;

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// 计算扣除平台费用与包装成本后的净利润
///
/// # 参数
/// - order: 已核算订单
/// - fees: 平台费率表（None = 未配置,费用为 0）
/// - packaging: 包装成本查询
pub fn adjust_profit(
    order: &EnrichedOrder,
    fees: Option<&FeeSchedule>,
    packaging: &dyn PackagingCostProvider,
) -> NetProfitResult {
    let base_profit = finite_or_zero(order.profit_per_unit * order.quantity);
    let total_revenue = finite_or_zero(order.total_revenue());

    let mut fee_breakdown = BTreeMap::new();
    if let Some(schedule) = fees {
        for kind in FeeKind::ALL {
            let Some(rule) = schedule.get(kind) else {
                continue;
            };
            let amount = match rule.fee_type {
                FeeType::Percent => total_revenue * rule.value / 100.0,
                FeeType::Fixed => rule.value,
            };
            fee_breakdown.insert(kind, finite_or_zero(amount));
        }
    }
    let total_fees: f64 = fee_breakdown.values().sum();

    let packaging_cost = finite_or_zero(
        packaging.packaging_cost(order.product_type, order.total_weight_kg()),
    );

    NetProfitResult {
        base_profit,
        total_fees,
        packaging_cost,
        final_profit: base_profit - total_fees - packaging_cost,
        fee_breakdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fee::FeeRule;
    use crate::domain::product::CatalogProduct;
    use crate::domain::order::RawOrderRow;
    use crate::domain::types::{Platform, ProductType};
    use crate::importer::order_enricher::enrich;

    fn order(selling: f64, import: f64, quantity: f64) -> EnrichedOrder {
        let product = CatalogProduct::new("p1", "ABC", "Widget", selling)
            .with_import_price(import)
            .with_product_type(ProductType::Dry)
            .with_weight(0.5);
        let row = RawOrderRow::new("O1", None, Some("ABC".to_string()), "Widget", quantity);
        enrich(&row, &product, Platform::Shopee)
    }

    fn no_packaging() -> impl PackagingCostProvider {
        |_: Option<ProductType>, _: f64| 0.0
    }

    #[test]
    fn test_fee_and_packaging_scenario() {
        let order = order(100000.0, 60000.0, 2.0);
        let fees = FeeSchedule::new().with_rule(FeeKind::CommissionFee, FeeRule::percent(5.0));
        let packaging = |_: Option<ProductType>, _: f64| 5000.0;

        let result = adjust_profit(&order, Some(&fees), &packaging);

        assert_eq!(result.base_profit, 80000.0);
        assert_eq!(result.total_fees, 10000.0);
        assert_eq!(result.packaging_cost, 5000.0);
        assert_eq!(result.final_profit, 65000.0);
        assert_eq!(result.fee_breakdown.get(&FeeKind::CommissionFee), Some(&10000.0));
    }

    #[test]
    fn test_no_schedule_means_no_fees() {
        let order = order(100000.0, 60000.0, 2.0);
        let result = adjust_profit(&order, None, &no_packaging());

        assert_eq!(result.total_fees, 0.0);
        assert!(result.fee_breakdown.is_empty());
        assert_eq!(result.final_profit, result.base_profit);
    }

    #[test]
    fn test_mixed_fee_types() {
        let order = order(50000.0, 30000.0, 4.0); // 营业额 200000
        let fees = FeeSchedule::new()
            .with_rule(FeeKind::TransactionFee, FeeRule::percent(2.0))
            .with_rule(FeeKind::ShippingFee, FeeRule::fixed(1500.0))
            .with_rule(FeeKind::AffiliateCommission, FeeRule::percent(1.5));

        let result = adjust_profit(&order, Some(&fees), &no_packaging());

        assert_eq!(result.total_fees, 4000.0 + 1500.0 + 3000.0);
        assert_eq!(result.final_profit, 80000.0 - 8500.0);
    }

    #[test]
    fn test_adding_positive_fee_never_raises_profit() {
        let order = order(80000.0, 50000.0, 3.0);
        let base = FeeSchedule::new().with_rule(FeeKind::CommissionFee, FeeRule::percent(4.0));
        let more = base.clone().with_rule(FeeKind::VoucherFee, FeeRule::fixed(2000.0));

        let before = adjust_profit(&order, Some(&base), &no_packaging());
        let after = adjust_profit(&order, Some(&more), &no_packaging());

        assert!(after.final_profit <= before.final_profit);
    }

    #[test]
    fn test_packaging_uses_total_weight() {
        let order = order(10000.0, 6000.0, 3.0);
        let packaging = |product_type: Option<ProductType>, weight: f64| {
            assert_eq!(product_type, Some(ProductType::Dry));
            weight * 1000.0
        };

        let result = adjust_profit(&order, None, &packaging);
        assert_eq!(result.packaging_cost, 1500.0);
        assert_eq!(result.final_profit, 12000.0 - 1500.0);
    }

    #[test]
    fn test_non_finite_inputs_degrade_to_zero() {
        let order = order(10000.0, 6000.0, 1.0);
        let fees = FeeSchedule::new().with_rule(FeeKind::ShippingFee, FeeRule::fixed(f64::INFINITY));
        let packaging = |_: Option<ProductType>, _: f64| f64::NAN;

        let result = adjust_profit(&order, Some(&fees), &packaging);
        assert_eq!(result.total_fees, 0.0);
        assert_eq!(result.packaging_cost, 0.0);
        assert_eq!(result.final_profit, 4000.0);
    }
}
