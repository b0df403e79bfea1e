// ==========================================
// 团队排练排期系统 - CSV 解析器
// ==========================================
// 输出: 每行一个 表头→值 映射 (值已 trim),附带文件行号
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

/// 一行原始记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// 文件行号 (表头为第 1 行)
    pub row: usize,
    pub fields: HashMap<String, String>,
}

impl RawRecord {
    /// 读取字段,缺列与空值均返回空串
    pub fn field(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }
}

pub struct CsvParser;

impl CsvParser {
    /// 解析 CSV 文件
    pub fn parse_file(path: &Path, required: &[&str]) -> ImportResult<Vec<RawRecord>> {
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        if let Some(ext) = path.extension() {
            if !ext.eq_ignore_ascii_case("csv") {
                return Err(ImportError::UnsupportedFormat(
                    ext.to_string_lossy().to_string(),
                ));
            }
        }

        let file = std::fs::File::open(path)?;
        Self::parse_reader(file, required)
    }

    /// 从任意读取器解析
    ///
    /// # 参数
    /// - `required`: 必须存在的列名 (大小写不敏感)
    pub fn parse_reader<R: Read>(reader: R, required: &[&str]) -> ImportResult<Vec<RawRecord>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect();

        for column in required {
            if !headers.iter().any(|h| h == column) {
                return Err(ImportError::MissingColumn(column.to_string()));
            }
        }

        let mut records = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            let record = result?;
            let mut fields = HashMap::new();

            for (col_idx, value) in record.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    fields.insert(header.clone(), value.trim().to_string());
                }
            }

            // 跳过完全空白的行
            if fields.values().all(|v| v.is_empty()) {
                continue;
            }

            records.push(RawRecord {
                row: row_idx + 2,
                fields,
            });
        }

        Ok(records)
    }
}
