//! 登録済み記録の蓄積（追記のみ）

use crate::error::{Error, Result};
use crate::record::OptimizationRecord;
use crate::table::ResultTable;
use serde::Serialize;

/// ダウンロードファイル名
pub const EXPORT_FILE_NAME: &str = "technique_optimization.csv";
/// ダウンロードMIMEタイプ
pub const EXPORT_MIME: &str = "text/csv";
/// Excel出力のMIMEタイプ
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// ダウンロード形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum DownloadKind {
    #[default]
    Csv,
    Excel,
}

impl DownloadKind {
    pub fn extension(&self) -> &'static str {
        match self {
            DownloadKind::Csv => "csv",
            DownloadKind::Excel => "xlsx",
        }
    }
}

/// 追記のみの記録列（挿入順 = 登録順）
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResultStore {
    records: Vec<OptimizationRecord>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: OptimizationRecord) {
        log::info!(
            "記録を追加: {} / {} (#{})",
            record.metal_ion().symbol(),
            record.technique().code(),
            self.records.len() + 1
        );
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[OptimizationRecord] {
        &self.records
    }

    pub fn to_table(&self) -> ResultTable {
        ResultTable {
            rows: self.records.iter().map(|r| r.cells()).collect(),
        }
    }

    /// CSVバイト列（空のときは出力不可）
    pub fn export(&self) -> Result<Vec<u8>> {
        if self.is_empty() {
            return Err(Error::NothingToExport);
        }
        self.to_table().to_csv()
    }

    /// Excelバイト列（空のときは出力不可）
    #[cfg(feature = "excel")]
    pub fn export_xlsx(&self) -> Result<Vec<u8>> {
        if self.is_empty() {
            return Err(Error::NothingToExport);
        }
        self.to_table().to_xlsx()
    }

    /// ダウンロード用データ（CSV）
    pub fn download(&self) -> Result<Download> {
        self.download_as(DownloadKind::Csv)
    }

    pub fn download_as(&self, kind: DownloadKind) -> Result<Download> {
        let (mime, data) = match kind {
            DownloadKind::Csv => (EXPORT_MIME, self.export()?),
            #[cfg(feature = "excel")]
            DownloadKind::Excel => (XLSX_MIME, self.export_xlsx()?),
            #[cfg(not(feature = "excel"))]
            DownloadKind::Excel => {
                return Err(Error::Excel("excel 機能が無効です".to_string()));
            }
        };
        let file_name = std::path::Path::new(EXPORT_FILE_NAME)
            .with_extension(kind.extension())
            .to_string_lossy()
            .into_owned();
        Ok(Download {
            file_name,
            mime: mime.to_string(),
            data,
        })
    }
}

/// ダウンロード内容
#[derive(Debug, Clone, PartialEq)]
pub struct Download {
    pub file_name: String,
    pub mime: String,
    pub data: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FieldName;
    use crate::form::FormModel;
    use crate::table::COLUMNS;
    use crate::types::{MetalIon, Technique};

    fn three_records() -> ResultStore {
        let mut store = ResultStore::new();
        let mut form = FormModel::new(MetalIon::Lead, Technique::CyclicVoltammetry);
        form.set_field(FieldName::ScanRate, 100.0);
        store.append(form.snapshot());

        form.set_metal_ion(MetalIon::Cadmium);
        form.set_technique(Technique::SquareWaveVoltammetry);
        store.append(form.snapshot());

        form.set_metal_ion(MetalIon::Arsenic);
        form.set_technique(Technique::AnodicStrippingVoltammetry);
        form.set_field(FieldName::DepositionPotential, -0.8);
        store.append(form.snapshot());
        store
    }

    #[test]
    fn test_append_keeps_submission_order() {
        let store = three_records();
        let table = store.to_table();
        assert_eq!(table.len(), 3);
        let techniques: Vec<String> = table.rows.iter().map(|r| r[1].to_string()).collect();
        assert_eq!(
            techniques,
            vec![
                "Cyclic Voltammetry (CV)",
                "Square Wave Voltammetry (SWV)",
                "Anodic Stripping Voltammetry (ASV)",
            ]
        );
        assert!(!store.export().expect("CSV生成失敗").is_empty());
    }

    #[test]
    fn test_to_table_idempotent() {
        let store = three_records();
        assert_eq!(store.to_table(), store.to_table());
    }

    #[test]
    fn test_export_roundtrip_matches_table() {
        let store = three_records();
        let bytes = store.export().expect("CSV生成失敗");

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let headers: Vec<String> = reader
            .headers()
            .expect("ヘッダー読み込み失敗")
            .iter()
            .map(String::from)
            .collect();
        assert_eq!(headers, COLUMNS);

        let rows: Vec<Vec<String>> = reader
            .records()
            .map(|r| r.expect("行読み込み失敗").iter().map(String::from).collect())
            .collect();
        assert_eq!(rows, store.to_table().display_rows());
    }

    #[test]
    fn test_empty_store_offers_no_export() {
        let store = ResultStore::new();
        assert!(store.to_table().is_empty());
        assert!(matches!(store.export(), Err(Error::NothingToExport)));
        assert!(matches!(store.download(), Err(Error::NothingToExport)));
    }

    #[test]
    fn test_download_metadata() {
        let download = three_records().download().expect("ダウンロード生成失敗");
        assert_eq!(download.file_name, "technique_optimization.csv");
        assert_eq!(download.mime, "text/csv");
        let text = String::from_utf8(download.data).expect("UTF-8ではない");
        assert!(text.starts_with("Metal Ion,Technique,"));
        assert!(text.contains("Arsenic (As³⁺),Anodic Stripping Voltammetry (ASV),-0.8,60,N/A,N/A,N/A"));
    }

    #[cfg(feature = "excel")]
    #[test]
    fn test_export_xlsx_is_zip() {
        let bytes = three_records().export_xlsx().expect("Excel生成失敗");
        assert!(bytes.starts_with(b"PK"));
        assert!(ResultStore::new().export_xlsx().is_err());
    }

    #[cfg(feature = "excel")]
    #[test]
    fn test_download_as_excel() {
        let download = three_records()
            .download_as(DownloadKind::Excel)
            .expect("Excelダウンロード生成失敗");
        assert_eq!(download.file_name, "technique_optimization.xlsx");
        assert_eq!(download.mime, XLSX_MIME);
        assert!(download.data.starts_with(b"PK"));
        assert!(matches!(
            ResultStore::new().download_as(DownloadKind::Excel),
            Err(Error::NothingToExport)
        ));
    }
}
