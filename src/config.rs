use crate::error::{EchemOptError, Result};
use echem_opt_common::{MetalIon, Technique, DEFAULT_PREVIEW_ROWS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// CSVの保存先（未設定ならカレントディレクトリ）
    pub output_dir: Option<PathBuf>,
    pub preview_rows: usize,
    pub default_metal_ion: MetalIon,
    pub default_technique: Technique,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: None,
            preview_rows: DEFAULT_PREVIEW_ROWS,
            default_metal_ion: MetalIon::default(),
            default_technique: Technique::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            log::debug!("config loaded from {}", config_path.display());
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| EchemOptError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("echem-opt").join("config.json"))
    }

    /// 出力ディレクトリ（引数 > 設定 > カレント）
    pub fn resolve_output_dir(&self, arg: Option<&Path>) -> PathBuf {
        arg.map(Path::to_path_buf)
            .or_else(|| self.output_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn set_output_dir(&mut self, dir: PathBuf) -> Result<()> {
        self.output_dir = Some(dir);
        self.save()
    }

    pub fn set_preview_rows(&mut self, rows: usize) -> Result<()> {
        if rows == 0 {
            return Err(EchemOptError::Config("プレビュー行数は1以上を指定してください".into()));
        }
        self.preview_rows = rows;
        self.save()
    }
}
