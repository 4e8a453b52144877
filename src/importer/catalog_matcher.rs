// ==========================================
// 电商订单导入 - 目录商品匹配器
// ==========================================
// 三级匹配（命中即停）:
//   1. SKU 精确匹配
//   2. SKU 包含匹配（双向）
//   3. 商品名称包含匹配（双向）
// 无评分、无排序: 同一级多个候选时按目录加载顺序取第一个
// ==========================================

use crate::domain::order::RawOrderRow;
use crate::domain::product::CatalogProduct;
use std::collections::HashMap;

// ==========================================
// MatchQuery - 匹配输入
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchQuery {
    pub sku: Option<String>,
    pub seller_sku: Option<String>,
    pub sku_id: Option<String>,
    pub product_name: String,
}

impl MatchQuery {
    /// 匹配键: seller_sku → sku_id → sku,小写去空白
    pub fn sku_key(&self) -> String {
        [&self.seller_sku, &self.sku_id, &self.sku]
            .into_iter()
            .flatten()
            .find(|v| !v.is_empty())
            .map(|v| v.trim().to_lowercase())
            .unwrap_or_default()
    }

    pub fn name_key(&self) -> String {
        self.product_name.trim().to_lowercase()
    }
}

impl From<&RawOrderRow> for MatchQuery {
    fn from(row: &RawOrderRow) -> Self {
        Self {
            sku: Some(row.sku.clone()),
            seller_sku: row.seller_sku.clone(),
            sku_id: row.sku_id.clone(),
            product_name: row.product_name.clone(),
        }
    }
}

// ==========================================
// CatalogIndex - 目录快照索引
// ==========================================
// 保持加载顺序;精确匹配走 HashMap（同 SKU 只记第一个）
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    products: Vec<CatalogProduct>,
    normalized_skus: Vec<String>,
    normalized_names: Vec<String>,
    exact_sku: HashMap<String, usize>,
}

impl CatalogIndex {
    pub fn new(products: Vec<CatalogProduct>) -> Self {
        let normalized_skus: Vec<String> = products.iter().map(|p| p.normalized_sku()).collect();
        let normalized_names = products.iter().map(|p| p.normalized_name()).collect();

        let mut exact_sku = HashMap::new();
        for (idx, sku) in normalized_skus.iter().enumerate() {
            if !sku.is_empty() {
                exact_sku.entry(sku.clone()).or_insert(idx);
            }
        }

        Self {
            products,
            normalized_skus,
            normalized_names,
            exact_sku,
        }
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn products(&self) -> &[CatalogProduct] {
        &self.products
    }

    // ===== 第 1 级: SKU 精确 =====
    fn find_exact_sku(&self, key: &str) -> Option<&CatalogProduct> {
        self.exact_sku.get(key).map(|&idx| &self.products[idx])
    }

    // ===== 第 2 级: SKU 包含 =====
    fn find_sku_substring(&self, key: &str) -> Option<&CatalogProduct> {
        self.normalized_skus
            .iter()
            .position(|sku| !sku.is_empty() && (key.contains(sku.as_str()) || sku.contains(key)))
            .map(|idx| &self.products[idx])
    }

    // ===== 第 3 级: 名称包含 =====
    fn find_name_substring(&self, name: &str) -> Option<&CatalogProduct> {
        if name.is_empty() {
            return None;
        }
        self.normalized_names
            .iter()
            .position(|candidate| {
                !candidate.is_empty() && (candidate.contains(name) || name.contains(candidate.as_str()))
            })
            .map(|idx| &self.products[idx])
    }
}

impl From<Vec<CatalogProduct>> for CatalogIndex {
    fn from(products: Vec<CatalogProduct>) -> Self {
        Self::new(products)
    }
}

/// 匹配目录商品
///
/// # 返回
/// - Some(&CatalogProduct): 第一个命中层级的第一个候选
/// - None: 三级均未命中
pub fn match_product<'a>(query: &MatchQuery, catalog: &'a CatalogIndex) -> Option<&'a CatalogProduct> {
    let key = query.sku_key();

    if !key.is_empty() {
        if let Some(product) = catalog.find_exact_sku(&key) {
            return Some(product);
        }
        if let Some(product) = catalog.find_sku_substring(&key) {
            return Some(product);
        }
    }

    catalog.find_name_substring(&query.name_key())
}
