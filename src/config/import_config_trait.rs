// ==========================================
// 电商订单导入 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入流程所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::domain::fee::FeeSchedule;
use crate::domain::types::Platform;
use crate::engine::packaging::PackagingCostTable;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 用途: 导入流程开始时一次性读取的配置快照
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// 获取当前店铺 ID
    ///
    /// # 默认值
    /// - "default"
    async fn get_store_id(&self) -> RepositoryResult<String>;

    /// 获取店铺 + 平台的费率表
    ///
    /// # 返回
    /// - Ok(None): 未配置（费用按 0 计）
    /// - Err: 读取失败或 JSON 格式错误
    async fn get_fee_schedule(
        &self,
        store_id: &str,
        platform: Platform,
    ) -> RepositoryResult<Option<FeeSchedule>>;

    /// 获取包装成本表
    ///
    /// # 返回
    /// - Ok(None): 未配置（调用方使用内置默认表）
    async fn get_packaging_table(&self) -> RepositoryResult<Option<PackagingCostTable>>;
}
