//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    /// アップロードファイルを表として読めない
    #[error("Error loading file. Please check the format. ({file_name}: {reason})")]
    FileLoad { file_name: String, reason: String },

    #[error("No optimization records to export")]
    NothingToExport,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Excel error: {0}")]
    Excel(String),
}

impl Error {
    pub fn file_load(file_name: impl Into<String>, reason: impl ToString) -> Self {
        Error::FileLoad {
            file_name: file_name.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_load() {
        let error = Error::file_load("results.xlsx", "invalid zip header");
        let display = format!("{}", error);
        assert!(display.starts_with("Error loading file. Please check the format."));
        assert!(display.contains("results.xlsx"));
        assert!(display.contains("invalid zip header"));
    }

    #[test]
    fn test_error_display_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = Error::Io(io_error);
        let display = format!("{}", error);
        assert!(display.contains("IO error"));
        assert!(display.contains("file not found"));
    }

    #[test]
    fn test_error_from_csv() {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(false)
            .from_reader("a,b\n1\n".as_bytes());
        let csv_error = reader.records().next().unwrap().unwrap_err();
        let error: Error = csv_error.into();
        assert!(matches!(error, Error::Csv(_)));
    }

    #[test]
    fn test_error_debug() {
        let error = Error::Excel("テスト".to_string());
        let debug = format!("{:?}", error);
        assert!(debug.contains("Excel"));
        assert!(debug.contains("テスト"));
    }
}
