// ==========================================
// 电商订单导入 - 包装成本表
// ==========================================
// 按商品类型分档: 第一个 max_weight_kg >= 重量 的档位生效
// 超出最后一档: 最后一档成本 + 超重部分 * extra_cost_per_kg
// 无类型商品按 dry 计算
// ==========================================

use crate::domain::types::ProductType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// PackagingCostProvider - 包装成本查询接口
// ==========================================
pub trait PackagingCostProvider: Send + Sync {
    /// 按 (商品类型, 总重量 kg) 查询包装成本
    fn packaging_cost(&self, product_type: Option<ProductType>, total_weight_kg: f64) -> f64;
}

impl<F> PackagingCostProvider for F
where
    F: Fn(Option<ProductType>, f64) -> f64 + Send + Sync,
{
    fn packaging_cost(&self, product_type: Option<ProductType>, total_weight_kg: f64) -> f64 {
        self(product_type, total_weight_kg)
    }
}

// ==========================================
// PackagingTier - 单个重量档位
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackagingTier {
    pub max_weight_kg: f64,
    pub cost: f64,
}

impl PackagingTier {
    pub fn new(max_weight_kg: f64, cost: f64) -> Self {
        Self { max_weight_kg, cost }
    }
}

// ==========================================
// PackagingCostTable - 配置化的分档成本表
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackagingCostTable {
    pub tiers: BTreeMap<ProductType, Vec<PackagingTier>>,
    #[serde(default)]
    pub extra_cost_per_kg: f64,
}

impl Default for PackagingCostTable {
    fn default() -> Self {
        let mut tiers = BTreeMap::new();
        tiers.insert(
            ProductType::Dry,
            vec![
                PackagingTier::new(0.5, 2000.0),
                PackagingTier::new(1.0, 3000.0),
                PackagingTier::new(3.0, 5000.0),
            ],
        );
        tiers.insert(
            ProductType::Liquid,
            vec![
                PackagingTier::new(0.5, 3000.0),
                PackagingTier::new(1.0, 4500.0),
                PackagingTier::new(3.0, 7000.0),
            ],
        );
        // 冷链需保温箱 + 冰袋
        tiers.insert(
            ProductType::Cold,
            vec![
                PackagingTier::new(1.0, 8000.0),
                PackagingTier::new(3.0, 12000.0),
            ],
        );

        Self {
            tiers,
            extra_cost_per_kg: 1500.0,
        }
    }
}

impl PackagingCostTable {
    pub fn new(extra_cost_per_kg: f64) -> Self {
        Self {
            tiers: BTreeMap::new(),
            extra_cost_per_kg,
        }
    }

    /// 设置某类型的档位（自动按重量升序排列）
    pub fn with_tiers(mut self, product_type: ProductType, mut tiers: Vec<PackagingTier>) -> Self {
        tiers.sort_by(|a, b| a.max_weight_kg.total_cmp(&b.max_weight_kg));
        self.tiers.insert(product_type, tiers);
        self
    }

    fn tiers_for(&self, product_type: Option<ProductType>) -> &[PackagingTier] {
        let key = product_type.unwrap_or(ProductType::Dry);
        self.tiers.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl PackagingCostProvider for PackagingCostTable {
    fn packaging_cost(&self, product_type: Option<ProductType>, total_weight_kg: f64) -> f64 {
        if !total_weight_kg.is_finite() || total_weight_kg <= 0.0 {
            return 0.0;
        }

        let tiers = self.tiers_for(product_type);
        if let Some(tier) = tiers.iter().find(|t| t.max_weight_kg >= total_weight_kg) {
            return tier.cost;
        }

        match tiers.last() {
            Some(last) => {
                let excess = total_weight_kg - last.max_weight_kg;
                last.cost + excess * self.extra_cost_per_kg
            }
            None => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> PackagingCostTable {
        PackagingCostTable::new(1000.0)
            .with_tiers(
                ProductType::Dry,
                vec![PackagingTier::new(2.0, 3000.0), PackagingTier::new(0.5, 1000.0)],
            )
            .with_tiers(ProductType::Cold, vec![PackagingTier::new(1.0, 8000.0)])
    }

    #[test]
    fn test_tier_lookup() {
        let table = table();
        assert_eq!(table.packaging_cost(Some(ProductType::Dry), 0.3), 1000.0);
        assert_eq!(table.packaging_cost(Some(ProductType::Dry), 0.5), 1000.0);
        assert_eq!(table.packaging_cost(Some(ProductType::Dry), 1.2), 3000.0);
        assert_eq!(table.packaging_cost(Some(ProductType::Cold), 0.8), 8000.0);
    }

    #[test]
    fn test_over_last_tier_charges_extra_per_kg() {
        let table = table();
        assert_eq!(table.packaging_cost(Some(ProductType::Dry), 4.0), 5000.0);
    }

    #[test]
    fn test_untyped_uses_dry_and_missing_type_costs_nothing() {
        let table = table();
        assert_eq!(table.packaging_cost(None, 1.0), 3000.0);
        assert_eq!(table.packaging_cost(Some(ProductType::Liquid), 1.0), 0.0);
    }

    #[test]
    fn test_zero_or_invalid_weight_costs_nothing() {
        let table = PackagingCostTable::default();
        assert_eq!(table.packaging_cost(Some(ProductType::Cold), 0.0), 0.0);
        assert_eq!(table.packaging_cost(Some(ProductType::Cold), f64::NAN), 0.0);
    }

    #[test]
    fn test_closure_provider() {
        let flat = |_: Option<ProductType>, _: f64| 5000.0;
        assert_eq!(flat.packaging_cost(None, 2.0), 5000.0);
    }

    #[test]
    fn test_table_json_round_trip() {
        let table = PackagingCostTable::default();
        let json = serde_json::to_string(&table).unwrap();
        assert!(json.contains("\"maxWeightKg\""));
        let back: PackagingCostTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
    }
}
