// ==========================================
// 电商订单导入 - 导入接口 Trait
// ==========================================
// 职责: 定义文件解析与订单导入接口（不包含实现）
// ==========================================

use crate::domain::import_batch::ImportOutcome;
use crate::domain::types::Platform;
use crate::importer::error::ImportResult;
use crate::importer::file_parser::CellGrid;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

// ==========================================
// OrderImporter Trait
// ==========================================
// 用途: 订单导入主接口
// 实现者: OrderImporterImpl
#[async_trait]
pub trait OrderImporter: Send + Sync {
    /// 从表格文件（.xlsx/.xls/.csv）导入订单
    ///
    /// # 参数
    /// - file_path: 文件路径
    /// - platform: 销售平台（决定费率表）
    ///
    /// # 返回
    /// - Ok(ImportOutcome): 批次信息、统计、订单列表
    /// - Err: 缺少必需列 / 无数据行 / 文件不可读 / 落库失败
    ///
    /// # 导入流程
    /// 1. 加载目录快照、费率表、包装成本表（各一次）
    /// 2. 文件解析为单元格网格
    /// 3. 定位表头 → 逐行提取 → 商品匹配 → 价格核算 → 利润调整
    /// 4. 整批落库（致命错误时不写入任何数据）
    async fn import_spreadsheet(
        &self,
        file_path: &Path,
        platform: Platform,
    ) -> ImportResult<ImportOutcome>;

    /// 从 TikTok 打包单 PDF 导入订单
    ///
    /// # 返回
    /// - Err(NoPdfProducts): PDF 中未找到商品行
    async fn import_pdf(&self, file_path: &Path) -> ImportResult<ImportOutcome>;

    /// 批量导入多个文件（逐个顺序执行）
    ///
    /// # 说明
    /// - 每个文件的导入是独立的,某个文件失败不影响其他文件
    async fn batch_import(
        &self,
        file_paths: &[PathBuf],
        platform: Platform,
    ) -> Vec<Result<ImportOutcome, String>>;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件 → 单元格网格（不假设表头位置）
// 实现者: ExcelParser, CsvParser, UniversalFileParser
pub trait FileParser: Send + Sync {
    /// 解析文件为二维单元格网格（行优先,单元格已转字符串并去空白）
    ///
    /// # 返回
    /// - Ok(CellGrid): 行列表
    /// - Err: 文件不存在、格式不支持、解析失败
    fn parse_to_grid(&self, file_path: &Path) -> ImportResult<CellGrid>;
}
