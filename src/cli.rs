use clap::{Parser, Subcommand};
use echem_opt_common::{DownloadKind, MetalIon, Technique};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "echem-opt")]
#[command(about = "重金属センシング向け電気化学測定手法の最適化パラメータ記録ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 対話的にパラメータを入力して記録テーブルを作る
    Session {
        /// 最初に読み込む実験結果ファイル (csv/xlsx)
        #[arg(short, long)]
        upload: Option<PathBuf>,

        /// ダウンロード先ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// ダウンロード形式 (csv/excel/both)
        #[arg(short, long, default_value = "csv")]
        format: ExportFormat,

        /// 初期の重金属イオン (lead/cadmium/mercury/arsenic)
        #[arg(short, long)]
        metal: Option<MetalIon>,

        /// 初期の測定手法 (cv/asv/dpv/swv/lsv)
        #[arg(short, long)]
        technique: Option<Technique>,
    },

    /// 実験結果ファイルの先頭行を表示
    Preview {
        /// CSVまたはExcelファイル
        #[arg(required = true)]
        file: PathBuf,

        /// 表示行数（省略時は設定値）
        #[arg(short, long)]
        rows: Option<usize>,
    },

    /// 手法ごとの入力フィールドを表示
    Fields {
        /// 測定手法（省略時は全手法）
        technique: Option<Technique>,
    },

    /// 設定を表示/編集
    Config {
        /// 出力ディレクトリを設定
        #[arg(long)]
        set_output_dir: Option<PathBuf>,

        /// プレビュー行数を設定
        #[arg(long)]
        set_preview_rows: Option<usize>,

        /// 既定の重金属イオンを設定
        #[arg(long)]
        set_metal: Option<MetalIon>,

        /// 既定の測定手法を設定
        #[arg(long)]
        set_technique: Option<Technique>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Csv,
    Excel,
    Both,
}

impl ExportFormat {
    pub fn includes_csv(&self) -> bool {
        matches!(self, ExportFormat::Csv | ExportFormat::Both)
    }

    pub fn includes_excel(&self) -> bool {
        matches!(self, ExportFormat::Excel | ExportFormat::Both)
    }

    pub fn kinds(&self) -> Vec<DownloadKind> {
        let mut kinds = Vec::new();
        if self.includes_csv() {
            kinds.push(DownloadKind::Csv);
        }
        if self.includes_excel() {
            kinds.push(DownloadKind::Excel);
        }
        kinds
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "both" => Ok(ExportFormat::Both),
            _ => Err(format!("Unknown format: {}. Use csv, excel, or both", s)),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Excel => write!(f, "excel"),
            ExportFormat::Both => write!(f, "both"),
        }
    }
}
