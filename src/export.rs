use crate::error::Result;
use echem_opt_common::Download;
use std::path::{Path, PathBuf};

/// 出力先がディレクトリならその中に、ファイル名ならその拡張子を差し替えて保存
fn download_path(output: &Path, download: &Download) -> PathBuf {
    let file_name = Path::new(&download.file_name);
    if output.is_dir() || output.extension().is_none() {
        output.join(file_name)
    } else {
        match file_name.extension() {
            Some(extension) => output.with_extension(extension),
            None => output.to_path_buf(),
        }
    }
}

/// ダウンロード内容を書き出し、書き出したパスを返す
pub fn write_download(download: &Download, output: &Path) -> Result<PathBuf> {
    if output.extension().is_none() {
        std::fs::create_dir_all(output)?;
    }

    let path = download_path(output, download);
    std::fs::write(&path, &download.data)?;
    log::info!("wrote {} ({} bytes, {})", path.display(), download.data.len(), download.mime);
    Ok(path)
}
