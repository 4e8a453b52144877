// ==========================================
// 电商订单导入 - 文件解析器实现
// ==========================================
// 阶段 0: 文件读取 → 单元格网格
// 支持: Excel (.xlsx/.xls/.xlsm) / CSV (.csv)
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::order_importer_trait::FileParser;
use calamine::{open_workbook_auto, Reader};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;

/// 二维单元格网格（第一维行,第二维列）
pub type CellGrid = Vec<Vec<String>>;

/// 读取单元格（越界返回空串,兼容参差不齐的行）
pub fn cell(row: &[String], col: usize) -> &str {
    row.get(col).map(|s| s.as_str()).unwrap_or("")
}

/// 整行是否为空白
pub fn is_blank_row(row: &[String]) -> bool {
    row.iter().all(|c| c.trim().is_empty())
}

fn file_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_grid(&self, file_path: &Path) -> ImportResult<CellGrid> {
        ensure_exists(file_path)?;

        let ext = file_extension(file_path);
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        // 表头位置不固定,全部按数据行读取
        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let mut grid = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            let record = result?;
            let row: Vec<String> = record
                .iter()
                .enumerate()
                .map(|(col_idx, value)| {
                    // 去除 UTF-8 BOM
                    let value = if row_idx == 0 && col_idx == 0 {
                        value.trim_start_matches('\u{feff}')
                    } else {
                        value
                    };
                    value.trim().to_string()
                })
                .collect();
            grid.push(row);
        }

        Ok(grid)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_to_grid(&self, file_path: &Path) -> ImportResult<CellGrid> {
        ensure_exists(file_path)?;

        let ext = file_extension(file_path);
        if !matches!(ext.as_str(), "xlsx" | "xls" | "xlsm") {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(file_path)?;

        // 只读取第一个 sheet
        let sheet_names = workbook.sheet_names();
        let sheet_name = sheet_names
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;

        let range = workbook.worksheet_range(&sheet_name)?;

        let grid = range
            .rows()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.to_string().trim().to_string())
                    .collect()
            })
            .collect();

        Ok(grid)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl FileParser for UniversalFileParser {
    fn parse_to_grid(&self, file_path: &Path) -> ImportResult<CellGrid> {
        match file_extension(file_path).as_str() {
            "csv" => CsvParser.parse_to_grid(file_path),
            "xlsx" | "xls" | "xlsm" => ExcelParser.parse_to_grid(file_path),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }
}
