//! 実験結果ファイルのプレビュー読み込み
//!
//! CSV は csv クレート、Excel/ODS は calamine で先頭シートを読む。
//! 解析は先頭 N 行の表示のみで、データ自体には何もしない。

use crate::error::{Error, Result};
use calamine::{open_workbook_auto_from_rs, Reader};
use serde::Serialize;
use std::io::Cursor;
use std::path::Path;

/// プレビュー行数の既定値
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// 受け付ける拡張子
pub const ACCEPTED_EXTENSIONS: &[&str] = &["csv", "xlsx", "xlsm", "xls", "ods"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFormat {
    Csv,
    Spreadsheet,
}

impl UploadFormat {
    /// ファイル名の拡張子から判定
    pub fn detect(file_name: &str) -> Option<Self> {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())?;
        match ext.as_str() {
            "csv" => Some(UploadFormat::Csv),
            "xlsx" | "xlsm" | "xls" | "ods" => Some(UploadFormat::Spreadsheet),
            _ => None,
        }
    }
}

/// 先頭行のプレビュー
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TablePreview {
    pub file_name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// ヘッダーを除いた全行数
    pub total_rows: usize,
}

impl TablePreview {
    pub fn is_truncated(&self) -> bool {
        self.total_rows > self.rows.len()
    }
}

/// アップロードされたバイト列をプレビューする
pub fn load_preview(file_name: &str, bytes: &[u8], max_rows: usize) -> Result<TablePreview> {
    let format = UploadFormat::detect(file_name).ok_or_else(|| {
        Error::file_load(
            file_name,
            format!("unsupported file type (expected {})", ACCEPTED_EXTENSIONS.join(", ")),
        )
    })?;

    let (columns, rows, total_rows) = match format {
        UploadFormat::Csv => read_csv(bytes, max_rows),
        UploadFormat::Spreadsheet => read_spreadsheet(bytes, max_rows),
    }
    .map_err(|reason| Error::file_load(file_name, reason))?;

    if columns.iter().all(|c| c.is_empty()) {
        return Err(Error::file_load(file_name, "no columns to parse from file"));
    }

    log::info!("{}: {}列 {}行を読み込み", file_name, columns.len(), total_rows);

    Ok(TablePreview {
        file_name: file_name.to_string(),
        columns,
        rows,
        total_rows,
    })
}

/// パスからプレビューする
pub fn load_preview_from_path(path: &Path, max_rows: usize) -> Result<TablePreview> {
    let file_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();
    let bytes = std::fs::read(path).map_err(|e| Error::file_load(&file_name, e))?;
    load_preview(&file_name, &bytes, max_rows)
}

type Parsed = (Vec<String>, Vec<Vec<String>>, usize);

fn read_csv(bytes: &[u8], max_rows: usize) -> std::result::Result<Parsed, String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| e.to_string())?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    let mut total_rows = 0;
    for record in reader.records() {
        let record = record.map_err(|e| e.to_string())?;
        if rows.len() < max_rows {
            rows.push(record.iter().map(String::from).collect());
        }
        total_rows += 1;
    }

    Ok((columns, rows, total_rows))
}

fn read_spreadsheet(bytes: &[u8], max_rows: usize) -> std::result::Result<Parsed, String> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec())).map_err(|e| e.to_string())?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| "workbook has no worksheets".to_string())?
        .map_err(|e| e.to_string())?;

    let mut sheet_rows = range.rows();
    let columns: Vec<String> = match sheet_rows.next() {
        Some(header) => header.iter().map(|c| c.to_string()).collect(),
        None => Vec::new(),
    };

    let mut rows = Vec::new();
    let mut total_rows = 0;
    for row in sheet_rows {
        if rows.len() < max_rows {
            rows.push(row.iter().map(|c| c.to_string()).collect());
        }
        total_rows += 1;
    }

    Ok((columns, rows, total_rows))
}
