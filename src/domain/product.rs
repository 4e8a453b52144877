// ==========================================
// 电商订单导入 - 商品目录模型
// ==========================================
// 用途: 商品管理界面维护,导入流程只读
// 生命周期: 每次导入加载一次快照
// ==========================================

use crate::domain::types::{ProductStatus, ProductType};
use serde::{Deserialize, Serialize};

// ==========================================
// CatalogProduct - 目录商品
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogProduct {
    pub id: String,                        // 目录分配的商品 ID
    #[serde(default)]
    pub sku: String,                       // SKU（可能为空）
    pub name: String,                      // 商品名称（展示名以此为准）
    #[serde(default)]
    pub selling_price: f64,                // 售价（>=0）
    #[serde(default)]
    pub import_price: Option<f64>,         // 进价
    #[serde(default)]
    pub product_type: Option<ProductType>, // 商品类型（包装成本分档）
    #[serde(default)]
    pub weight: Option<f64>,               // 单件重量（kg）
    pub status: ProductStatus,
}

impl CatalogProduct {
    /// 构造一个启用状态的商品（其余可选字段为空）
    pub fn new(
        id: impl Into<String>,
        sku: impl Into<String>,
        name: impl Into<String>,
        selling_price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            sku: sku.into(),
            name: name.into(),
            selling_price,
            import_price: None,
            product_type: None,
            weight: None,
            status: ProductStatus::Active,
        }
    }

    pub fn with_import_price(mut self, import_price: f64) -> Self {
        self.import_price = Some(import_price);
        self
    }

    pub fn with_product_type(mut self, product_type: ProductType) -> Self {
        self.product_type = Some(product_type);
        self
    }

    pub fn with_weight(mut self, weight_kg: f64) -> Self {
        self.weight = Some(weight_kg);
        self
    }

    pub fn with_status(mut self, status: ProductStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_active(&self) -> bool {
        self.status == ProductStatus::Active
    }

    /// 匹配用的标准化 SKU（小写 + 去空白）
    pub fn normalized_sku(&self) -> String {
        self.sku.trim().to_lowercase()
    }

    /// 匹配用的标准化名称
    pub fn normalized_name(&self) -> String {
        self.name.trim().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{"id":"P1","name":"Trà sữa","status":"active"}"#;
        let product: CatalogProduct = serde_json::from_str(json).unwrap();
        assert_eq!(product.sku, "");
        assert_eq!(product.selling_price, 0.0);
        assert!(product.import_price.is_none());
        assert!(product.is_active());
    }

    #[test]
    fn test_normalized_fields() {
        let product = CatalogProduct::new("P1", "  AbC-01 ", " Bánh Quy ", 10000.0);
        assert_eq!(product.normalized_sku(), "abc-01");
        assert_eq!(product.normalized_name(), "bánh quy");
    }
}
