use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use echem_opt_common::{DownloadKind, EXPORT_FILE_NAME};

pub fn read_upload(path: &Path) -> Result<(String, Vec<u8>)> {
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();
    Ok((file_name, bytes))
}

pub fn save_export(path: &Path, data: &[u8]) -> Result<()> {
    fs::write(path, data).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn default_export_path(kind: DownloadKind) -> PathBuf {
    Path::new(EXPORT_FILE_NAME).with_extension(kind.extension())
}
