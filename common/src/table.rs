//! 結果テーブルとCSV/Excel出力

use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;

/// 非該当フィールドの表示文字列
pub const NOT_APPLICABLE: &str = "N/A";

/// 列名（固定順）
pub const COLUMNS: [&str; 7] = [
    "Metal Ion",
    "Technique",
    "Deposition Potential (V)",
    "Deposition Time (s)",
    "Scan Rate (mV/s)",
    "Pulse Amplitude (mV)",
    "Pulse Width (ms)",
];

/// テーブルのセル
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Float(f64),
    Integer(i64),
    NotApplicable,
}

impl Serialize for Cell {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Cell::Text(s) => serializer.serialize_str(s),
            Cell::Float(v) => serializer.serialize_f64(*v),
            Cell::Integer(v) => serializer.serialize_i64(*v),
            Cell::NotApplicable => serializer.serialize_str(NOT_APPLICABLE),
        }
    }
}

impl Cell {
    pub fn is_not_applicable(&self) -> bool {
        matches!(self, Cell::NotApplicable)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            // 整数値の電位も "-1.0" のように小数表記を保つ
            Cell::Float(v) if v.fract() == 0.0 => write!(f, "{:.1}", v),
            Cell::Float(v) => write!(f, "{}", v),
            Cell::Integer(v) => write!(f, "{}", v),
            Cell::NotApplicable => f.write_str(NOT_APPLICABLE),
        }
    }
}

/// 描画用の結果テーブル
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ResultTable {
    pub rows: Vec<Vec<Cell>>,
}

impl ResultTable {
    pub fn columns(&self) -> &'static [&'static str] {
        &COLUMNS
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 表示文字列の行
    pub fn display_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    /// CSV（UTF-8、ヘッダー行あり、インデックス列なし）
    pub fn to_csv(&self) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(COLUMNS)?;
        for row in &self.rows {
            writer.write_record(row.iter().map(|c| c.to_string()))?;
        }
        writer.into_inner().map_err(|e| Error::Io(e.into_error()))
    }

    /// Excel（.xlsx）をバッファに生成
    #[cfg(feature = "excel")]
    pub fn to_xlsx(&self) -> Result<Vec<u8>> {
        use rust_xlsxwriter::{Format, Workbook};

        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();

        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name("Optimization")
            .map_err(|e| Error::Excel(format!("シート名設定エラー: {}", e)))?;

        for (col, name) in COLUMNS.iter().enumerate() {
            worksheet
                .write_string_with_format(0, col as u16, *name, &header_format)
                .map_err(|e| Error::Excel(format!("ヘッダー書き込みエラー: {}", e)))?;
        }

        for (index, row) in self.rows.iter().enumerate() {
            let r = index as u32 + 1;
            for (col, cell) in row.iter().enumerate() {
                let c = col as u16;
                let written = match cell {
                    Cell::Text(s) => worksheet.write_string(r, c, s),
                    Cell::Float(v) => worksheet.write_number(r, c, *v),
                    Cell::Integer(v) => worksheet.write_number(r, c, *v as f64),
                    Cell::NotApplicable => worksheet.write_string(r, c, NOT_APPLICABLE),
                };
                written.map_err(|e| Error::Excel(format!("セル書き込みエラー: {}", e)))?;
            }
        }

        workbook
            .save_to_buffer()
            .map_err(|e| Error::Excel(format!("Excel保存エラー: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_display() {
        assert_eq!(Cell::Float(-1.2).to_string(), "-1.2");
        assert_eq!(Cell::Float(-1.0).to_string(), "-1.0");
        assert_eq!(Cell::Float(0.0).to_string(), "0.0");
        assert_eq!(Cell::Integer(50).to_string(), "50");
        assert_eq!(Cell::NotApplicable.to_string(), "N/A");
    }

    #[test]
    fn test_not_applicable_cells() {
        assert!(Cell::NotApplicable.is_not_applicable());
        assert!(!Cell::Text(NOT_APPLICABLE.to_string()).is_not_applicable());
        assert!(!Cell::Float(0.0).is_not_applicable());
    }

    #[test]
    fn test_empty_table_csv_has_header_only() {
        let csv = ResultTable::default().to_csv().expect("CSV生成失敗");
        let text = String::from_utf8(csv).expect("UTF-8ではない");
        assert_eq!(
            text,
            "Metal Ion,Technique,Deposition Potential (V),Deposition Time (s),Scan Rate (mV/s),Pulse Amplitude (mV),Pulse Width (ms)\n"
        );
    }

    #[test]
    fn test_cell_serialize() {
        let row = vec![Cell::Text("Lead (Pb²⁺)".into()), Cell::Integer(50), Cell::NotApplicable];
        let json = serde_json::to_string(&row).expect("シリアライズ失敗");
        assert_eq!(json, r#"["Lead (Pb²⁺)",50,"N/A"]"#);
    }
}
