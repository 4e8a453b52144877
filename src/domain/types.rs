// ==========================================
// 电商订单导入 - 领域类型定义
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 商品类型 (Product Type)
// ==========================================
// 用途: 包装成本分档
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    Cold,   // 冷藏
    Dry,    // 干货
    Liquid, // 液体
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductType::Cold => write!(f, "cold"),
            ProductType::Dry => write!(f, "dry"),
            ProductType::Liquid => write!(f, "liquid"),
        }
    }
}

impl FromStr for ProductType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cold" => Ok(ProductType::Cold),
            "dry" => Ok(ProductType::Dry),
            "liquid" => Ok(ProductType::Liquid),
            other => Err(format!("未知商品类型: {}", other)),
        }
    }
}

// ==========================================
// 商品状态 (Product Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Active,
    Inactive,
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductStatus::Active => write!(f, "active"),
            ProductStatus::Inactive => write!(f, "inactive"),
        }
    }
}

impl FromStr for ProductStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(ProductStatus::Active),
            "inactive" => Ok(ProductStatus::Inactive),
            other => Err(format!("未知商品状态: {}", other)),
        }
    }
}

// ==========================================
// 销售平台 (Platform)
// ==========================================
// 费率表按 门店 + 平台 配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Shopee,
    Tiktok,
    Lazada,
    Other,
}

impl Platform {
    /// 配置键中使用的标识
    pub fn as_key(&self) -> &'static str {
        match self {
            Platform::Shopee => "shopee",
            Platform::Tiktok => "tiktok",
            Platform::Lazada => "lazada",
            Platform::Other => "other",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_key())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "shopee" => Ok(Platform::Shopee),
            "tiktok" | "tiktok shop" | "tiktokshop" => Ok(Platform::Tiktok),
            "lazada" => Ok(Platform::Lazada),
            "other" | "" => Ok(Platform::Other),
            other => Err(format!("未知销售平台: {}", other)),
        }
    }
}

// ==========================================
// 订单状态 (Order Status)
// ==========================================
// 完成匹配与核算后固定为 VALID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Valid,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Valid => write!(f, "VALID"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_from_str() {
        assert_eq!("Shopee".parse::<Platform>(), Ok(Platform::Shopee));
        assert_eq!(" TikTok Shop ".parse::<Platform>(), Ok(Platform::Tiktok));
        assert!("ebay".parse::<Platform>().is_err());
    }

    #[test]
    fn test_product_type_serde() {
        let json = serde_json::to_string(&ProductType::Liquid).unwrap();
        assert_eq!(json, "\"liquid\"");
        let parsed: ProductType = serde_json::from_str("\"cold\"").unwrap();
        assert_eq!(parsed, ProductType::Cold);
    }
}
