//! 対話式セッション
//!
//! 画面1枚分のフォームを端末メニューで再現する。操作はすべて Session::handle() 経由。

use crate::cli::ExportFormat;
use crate::error::{EchemOptError, Result};
use crate::export::write_download;
use crate::render::{format_preview, format_result_table};
use chrono::Local;
use dialoguer::{Confirm, Input, Select};
use echem_opt_common::{Action, Feedback, FieldName, MetalIon, Session, Technique};
use std::path::Path;

/// メニュー項目
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MenuItem {
    Upload,
    MetalIon,
    Technique,
    EditField(FieldName),
    AddRecord,
    SubmitQuery,
    ShowTable,
    Download,
    Quit,
}

/// 現在のセッションで選べる項目（有効フィールドのみ、ダウンロードは記録がある時だけ）
pub fn menu_items(session: &Session) -> Vec<MenuItem> {
    let mut items = vec![MenuItem::Upload, MenuItem::MetalIon, MenuItem::Technique];
    items.extend(session.form().active_fields().into_iter().map(MenuItem::EditField));
    items.push(MenuItem::AddRecord);
    items.push(MenuItem::SubmitQuery);
    items.push(MenuItem::ShowTable);
    if session.can_download() {
        items.push(MenuItem::Download);
    }
    items.push(MenuItem::Quit);
    items
}

pub fn menu_label(session: &Session, item: MenuItem) -> String {
    let form = session.form();
    match item {
        MenuItem::Upload => match session.preview() {
            Some(p) => format!("Upload results file (current: {})", p.file_name),
            None => "Upload results file".to_string(),
        },
        MenuItem::MetalIon => format!("Heavy Metal Ion: {}", form.metal_ion()),
        MenuItem::Technique => format!("Detection Technique: {}", form.technique()),
        MenuItem::EditField(name) => {
            let spec = name.spec();
            format!("  {}: {}", spec.label, spec.cell(form.value(name)))
        }
        MenuItem::AddRecord => "Add Optimized Technique Parameters".to_string(),
        MenuItem::SubmitQuery => "Submit Optimization Query".to_string(),
        MenuItem::ShowTable => format!("Optimized Technique Parameters ({})", session.results().len()),
        MenuItem::Download => "Download Optimized Technique Data".to_string(),
        MenuItem::Quit => "Quit".to_string(),
    }
}

/// 対話式セッションを実行
pub fn run_session(
    mut session: Session,
    upload: Option<&Path>,
    output_dir: &Path,
    format: ExportFormat,
) -> Result<()> {
    println!(
        "🧪 Electrochemical Technique Optimization for Heavy Metal Sensing (session {}, {})",
        session.id(),
        session.started_at().with_timezone(&Local).format("%Y-%m-%d %H:%M")
    );
    println!("Upload experimental results and optimize parameters for voltammetric detection.\n");

    if let Some(path) = upload {
        upload_path(&mut session, path);
    }

    loop {
        let items = menu_items(&session);
        let labels: Vec<String> = items.iter().map(|i| menu_label(&session, *i)).collect();
        let choice = Select::new()
            .with_prompt("Technique Optimization Settings")
            .items(&labels)
            .default(0)
            .interact()
            .map_err(|e| EchemOptError::Prompt(e.to_string()))?;

        match items[choice] {
            MenuItem::Upload => {
                let path: String = Input::new()
                    .with_prompt("CSV / Excel file")
                    .interact_text()
                    .map_err(|e| EchemOptError::Prompt(e.to_string()))?;
                upload_path(&mut session, Path::new(path.trim()));
            }
            MenuItem::MetalIon => {
                let metal = prompt_metal_ion(session.form().metal_ion())?;
                session.handle(Action::SelectMetalIon(metal));
            }
            MenuItem::Technique => {
                let technique = prompt_technique(session.form().technique())?;
                session.handle(Action::SelectTechnique(technique));
            }
            MenuItem::EditField(name) => {
                let value = prompt_field(name, session.form().value(name))?;
                if let Feedback::FieldStored { value, clamped: true, .. } =
                    session.handle(Action::SetField(name, value))
                {
                    println!("  → 範囲外のため {} に補正しました\n", value);
                }
            }
            MenuItem::AddRecord => {
                if let Feedback::RecordAdded { message, count } = session.handle(Action::AddRecord) {
                    println!("✔ {} ({}件)\n", message, count);
                }
            }
            MenuItem::SubmitQuery => {
                if let Feedback::Query { message, summary } = session.handle(Action::SubmitQuery) {
                    println!("✔ {}", message);
                    for line in summary.lines() {
                        println!("  {}", line);
                    }
                    println!();
                }
            }
            MenuItem::ShowTable => {
                println!("Optimized Technique Parameters:");
                println!("{}\n", format_result_table(&session.view().table));
            }
            MenuItem::Download => {
                for kind in format.kinds() {
                    match session.handle(Action::Download(kind)) {
                        Feedback::Download(download) => {
                            let path = write_download(&download, output_dir)?;
                            println!("✔ 保存しました: {}", path.display());
                        }
                        Feedback::DownloadFailed { detail } => {
                            println!("✖ 出力に失敗しました: {}", detail);
                        }
                        _ => println!("✖ 出力する記録がありません"),
                    }
                }
                println!();
            }
            MenuItem::Quit => {
                if session.can_download() && !confirm_quit(session.results().len())? {
                    continue;
                }
                break;
            }
        }
    }

    log::debug!("session {} closed with {} records", session.id(), session.results().len());
    Ok(())
}

fn upload_path(session: &mut Session, path: &Path) {
    let file_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();

    let feedback = match std::fs::read(path) {
        Ok(bytes) => session.handle(Action::Upload { file_name, bytes }),
        Err(e) => Feedback::UploadFailed {
            message: echem_opt_common::session::UPLOAD_ERROR_MESSAGE.to_string(),
            detail: e.to_string(),
        },
    };

    match feedback {
        Feedback::Uploaded { .. } => {
            if let Some(preview) = session.preview() {
                println!("Data Preview:");
                println!("{}\n", format_preview(preview));
            }
        }
        Feedback::UploadFailed { message, detail } => {
            println!("✖ {}", message);
            println!("  {}\n", detail);
        }
        _ => {}
    }
}

fn prompt_metal_ion(current: MetalIon) -> Result<MetalIon> {
    let labels: Vec<&str> = MetalIon::ALL.iter().map(|m| m.label()).collect();
    let default = MetalIon::ALL.iter().position(|m| *m == current).unwrap_or(0);
    let index = Select::new()
        .with_prompt("Select Heavy Metal Ion")
        .items(&labels)
        .default(default)
        .interact()
        .map_err(|e| EchemOptError::Prompt(e.to_string()))?;
    Ok(MetalIon::ALL[index])
}

fn prompt_technique(current: Technique) -> Result<Technique> {
    let labels: Vec<&str> = Technique::ALL.iter().map(|t| t.label()).collect();
    let default = Technique::ALL.iter().position(|t| *t == current).unwrap_or(0);
    let index = Select::new()
        .with_prompt("Choose Detection Technique")
        .items(&labels)
        .default(default)
        .interact()
        .map_err(|e| EchemOptError::Prompt(e.to_string()))?;
    Ok(Technique::ALL[index])
}

fn prompt_field(name: FieldName, current: f64) -> Result<f64> {
    let spec = name.spec();
    Input::<f64>::new()
        .with_prompt(format!(
            "{} [{:.*} ～ {:.*}]",
            spec.label,
            spec.decimals(),
            spec.min,
            spec.decimals(),
            spec.max
        ))
        .default(current)
        .interact_text()
        .map_err(|e| EchemOptError::Prompt(e.to_string()))
}

fn confirm_quit(records: usize) -> Result<bool> {
    Confirm::new()
        .with_prompt(format!("{}件の記録は保存されません。終了しますか？", records))
        .default(false)
        .interact()
        .map_err(|e| EchemOptError::Prompt(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use echem_opt_common::FormModel;

    #[test]
    fn test_menu_shows_only_active_fields() {
        let session = Session::new(FormModel::new(MetalIon::Lead, Technique::CyclicVoltammetry));
        let items = menu_items(&session);
        assert!(items.contains(&MenuItem::EditField(FieldName::ScanRate)));
        assert!(!items.contains(&MenuItem::EditField(FieldName::PulseWidth)));
        assert!(!items.contains(&MenuItem::EditField(FieldName::DepositionTime)));
    }

    #[test]
    fn test_menu_label_shows_stored_value() {
        let mut session = Session::new(FormModel::new(MetalIon::Lead, Technique::AnodicStrippingVoltammetry));
        session.handle(Action::SetField(FieldName::DepositionPotential, -1.25));
        session.handle(Action::AddRecord);

        let cell = session.view().table.rows[0][2].to_string();
        assert_eq!(
            menu_label(&session, MenuItem::EditField(FieldName::DepositionPotential)),
            format!("  Deposition Potential (V): {}", cell)
        );
        assert_eq!(cell, "-1.25");
    }

    #[test]
    fn test_download_appears_after_first_record() {
        let mut session = Session::default();
        assert!(!menu_items(&session).contains(&MenuItem::Download));
        session.handle(Action::AddRecord);
        assert!(menu_items(&session).contains(&MenuItem::Download));
    }

    #[test]
    fn test_menu_labels() {
        let session = Session::new(FormModel::new(MetalIon::Cadmium, Technique::SquareWaveVoltammetry));
        assert_eq!(menu_label(&session, MenuItem::MetalIon), "Heavy Metal Ion: Cadmium (Cd²⁺)");
        assert_eq!(
            menu_label(&session, MenuItem::EditField(FieldName::DepositionPotential)),
            "  Deposition Potential (V): -1.2"
        );
        assert_eq!(
            menu_label(&session, MenuItem::EditField(FieldName::PulseWidth)),
            "  Pulse Width (ms): 10"
        );
        assert_eq!(
            menu_label(&session, MenuItem::ShowTable),
            "Optimized Technique Parameters (0)"
        );
    }
}
