// ==========================================
// 电商订单导入 - 平台费率模型
// ==========================================
// 来源: 门店 + 平台 配置（config_kv）
// 用途: 利润调整器只读输入
// ==========================================

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use tracing::warn;

// ==========================================
// FeeKind - 费用种类
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FeeKind {
    TransactionFee,      // 交易手续费
    CommissionFee,       // 平台佣金
    ShippingFee,         // 运费补贴
    VoucherFee,          // 优惠券分摊
    AffiliateCommission, // 联盟佣金
}

impl FeeKind {
    /// 参与汇总的全部费用种类（固定顺序）
    pub const ALL: [FeeKind; 5] = [
        FeeKind::TransactionFee,
        FeeKind::CommissionFee,
        FeeKind::ShippingFee,
        FeeKind::VoucherFee,
        FeeKind::AffiliateCommission,
    ];
}

impl fmt::Display for FeeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FeeKind::TransactionFee => "transactionFee",
            FeeKind::CommissionFee => "commissionFee",
            FeeKind::ShippingFee => "shippingFee",
            FeeKind::VoucherFee => "voucherFee",
            FeeKind::AffiliateCommission => "affiliateCommission",
        };
        write!(f, "{}", name)
    }
}

// ==========================================
// FeeType - 计费方式
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeType {
    Percent, // 按营业额百分比
    Fixed,   // 每单固定金额
}

// ==========================================
// FeeRule - 单项费用规则
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeeRule {
    #[serde(rename = "type")]
    pub fee_type: FeeType,
    pub value: f64,
}

impl FeeRule {
    pub fn percent(value: f64) -> Self {
        Self {
            fee_type: FeeType::Percent,
            value,
        }
    }

    pub fn fixed(value: f64) -> Self {
        Self {
            fee_type: FeeType::Fixed,
            value,
        }
    }
}

// ==========================================
// FeeSchedule - 单平台费率表
// ==========================================
// JSON 形如 {"commissionFee":{"type":"percent","value":5}}
// 读取时逐项解析: 未知种类与格式错误的单项被忽略,其余照常生效
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeeSchedule {
    pub rules: BTreeMap<FeeKind, FeeRule>,
}

impl<'de> Deserialize<'de> for FeeSchedule {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;

        let mut rules = BTreeMap::new();
        for (key, value) in raw {
            let kind = match serde_json::from_value::<FeeKind>(Value::String(key.clone())) {
                Ok(kind) => kind,
                Err(_) => {
                    warn!(fee_kind = %key, "未知费用种类,已忽略");
                    continue;
                }
            };
            match serde_json::from_value::<FeeRule>(value) {
                Ok(rule) => {
                    rules.insert(kind, rule);
                }
                Err(e) => {
                    warn!(fee_kind = %kind, error = %e, "费用规则格式错误,已忽略");
                }
            }
        }

        Ok(Self { rules })
    }
}

impl FeeSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rule(mut self, kind: FeeKind, rule: FeeRule) -> Self {
        self.rules.insert(kind, rule);
        self
    }

    pub fn get(&self, kind: FeeKind) -> Option<&FeeRule> {
        self.rules.get(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
