// ==========================================
// 电商订单导入 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、写入
// 存储: config_kv 表 (scope_id='global', key, value JSON)
// ==========================================

use crate::config::import_config_trait::ImportConfigReader;
use crate::db::open_sqlite_connection;
use crate::domain::fee::FeeSchedule;
use crate::domain::types::Platform;
use crate::engine::packaging::PackagingCostTable;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// 未配置店铺时使用的店铺 ID
pub const DEFAULT_STORE_ID: &str = "default";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let conn_guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 读取 JSON 配置并反序列化
    fn get_json_value<T: DeserializeOwned>(&self, key: &str) -> RepositoryResult<Option<T>> {
        let Some(raw) = self.get_global_config_value(key)? else {
            return Ok(None);
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| RepositoryError::ConfigFormatError {
                key: key.to_string(),
                message: e.to_string(),
            })
    }

    /// 写入配置值（UPSERT）
    pub fn set_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value, updated_at)
             VALUES ('global', ?1, ?2, datetime('now'))
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// 写入店铺 + 平台费率表
    pub fn set_fee_schedule(
        &self,
        store_id: &str,
        platform: Platform,
        schedule: &FeeSchedule,
    ) -> RepositoryResult<()> {
        let value = serde_json::to_string(schedule).map_err(anyhow::Error::from)?;
        self.set_config_value(&config_keys::fee_schedule_key(store_id, platform), &value)
    }

    /// 写入包装成本表
    pub fn set_packaging_table(&self, table: &PackagingCostTable) -> RepositoryResult<()> {
        let value = serde_json::to_string(table).map_err(anyhow::Error::from)?;
        self.set_config_value(config_keys::PACKAGING_COST_TABLE, &value)
    }

    /// 获取所有配置的快照（JSON格式,按键排序）
    pub fn get_config_snapshot(&self) -> RepositoryResult<String> {
        let conn = self.get_conn()?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        serde_json::to_string(&json!(config_map)).map_err(|e| anyhow::Error::from(e).into())
    }
}

// ==========================================
// ImportConfigReader Trait 实现
// ==========================================
#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_store_id(&self) -> RepositoryResult<String> {
        let value = self.get_global_config_value(config_keys::STORE_ID)?;
        Ok(value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_STORE_ID.to_string()))
    }

    async fn get_fee_schedule(
        &self,
        store_id: &str,
        platform: Platform,
    ) -> RepositoryResult<Option<FeeSchedule>> {
        self.get_json_value(&config_keys::fee_schedule_key(store_id, platform))
    }

    async fn get_packaging_table(&self) -> RepositoryResult<Option<PackagingCostTable>> {
        self.get_json_value(config_keys::PACKAGING_COST_TABLE)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    use crate::domain::types::Platform;

    pub const STORE_ID: &str = "store_id";
    pub const PACKAGING_COST_TABLE: &str = "packaging_cost_table";
    pub const FEE_SCHEDULE_PREFIX: &str = "fee_schedule";

    /// fee_schedule/{store}/{platform}
    pub fn fee_schedule_key(store_id: &str, platform: Platform) -> String {
        format!("{}/{}/{}", FEE_SCHEDULE_PREFIX, store_id.trim(), platform.as_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fee::{FeeKind, FeeRule};

    fn manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::init_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[tokio::test]
    async fn test_store_id_default_and_override() {
        let manager = manager();
        assert_eq!(manager.get_store_id().await.unwrap(), DEFAULT_STORE_ID);

        manager.set_config_value(config_keys::STORE_ID, " shop-hn ").unwrap();
        assert_eq!(manager.get_store_id().await.unwrap(), "shop-hn");
    }

    #[tokio::test]
    async fn test_fee_schedule_round_trip_per_platform() {
        let manager = manager();
        let schedule = FeeSchedule::new().with_rule(FeeKind::CommissionFee, FeeRule::percent(5.0));
        manager.set_fee_schedule("s1", Platform::Shopee, &schedule).unwrap();

        let loaded = manager.get_fee_schedule("s1", Platform::Shopee).await.unwrap();
        assert_eq!(loaded, Some(schedule));
        assert!(manager.get_fee_schedule("s1", Platform::Tiktok).await.unwrap().is_none());
        assert!(manager.get_fee_schedule("s2", Platform::Shopee).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_malformed_fee_schedule_is_format_error() {
        let manager = manager();
        manager
            .set_config_value(&config_keys::fee_schedule_key("s1", Platform::Lazada), "not json")
            .unwrap();

        let result = manager.get_fee_schedule("s1", Platform::Lazada).await;
        assert!(matches!(result, Err(RepositoryError::ConfigFormatError { .. })));
    }

    #[tokio::test]
    async fn test_fee_schedule_with_unknown_kind_keeps_known_rules() {
        let manager = manager();
        manager
            .set_config_value(
                &config_keys::fee_schedule_key("s1", Platform::Shopee),
                r#"{"commissionFee":{"type":"percent","value":5},"paymentFee":{"type":"fixed","value":900}}"#,
            )
            .unwrap();

        let loaded = manager
            .get_fee_schedule("s1", Platform::Shopee)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.rules.len(), 1);
        assert_eq!(loaded.get(FeeKind::CommissionFee), Some(&FeeRule::percent(5.0)));
    }

    #[tokio::test]
    async fn test_packaging_table_and_snapshot() {
        let manager = manager();
        assert!(manager.get_packaging_table().await.unwrap().is_none());

        let table = PackagingCostTable::default();
        manager.set_packaging_table(&table).unwrap();
        assert_eq!(manager.get_packaging_table().await.unwrap(), Some(table));

        let snapshot = manager.get_config_snapshot().unwrap();
        assert!(snapshot.contains(config_keys::PACKAGING_COST_TABLE));
    }

    #[test]
    fn test_fee_schedule_key_format() {
        assert_eq!(
            config_keys::fee_schedule_key("shop-1", Platform::Tiktok),
            "fee_schedule/shop-1/tiktok"
        );
    }
}
