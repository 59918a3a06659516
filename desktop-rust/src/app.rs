use eframe::egui::{self, Color32, RichText};
use eframe::egui::{FontData, FontDefinitions, FontFamily};

use echem_opt_common::fields::STORED_DECIMALS;
use echem_opt_common::session::UPLOAD_ERROR_MESSAGE;
use echem_opt_common::upload::ACCEPTED_EXTENSIONS;
use echem_opt_common::{Action, DownloadKind, Feedback, MetalIon, Technique};

use crate::io::{default_export_path, read_upload, save_export};
use crate::model::AppState;

const TITLE: &str = "Electrochemical Technique Optimization for Heavy Metal Sensing";
const SUBTITLE: &str = "Upload experimental results and optimize parameters for voltammetric detection.";

#[derive(Default)]
pub struct DesktopApp {
    state: AppState,
}

impl DesktopApp {
    fn open_upload(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV / Excel", ACCEPTED_EXTENSIONS)
            .pick_file()
        else {
            return;
        };

        let feedback = match read_upload(&path) {
            Ok((file_name, bytes)) => self.state.session.handle(Action::Upload { file_name, bytes }),
            Err(err) => Feedback::UploadFailed {
                message: UPLOAD_ERROR_MESSAGE.to_string(),
                detail: format!("{err:#}"),
            },
        };

        match feedback {
            Feedback::Uploaded { rows, .. } => {
                self.state.upload_error = None;
                self.state.status = format!("Loaded {} ({} rows)", path.display(), rows);
            }
            Feedback::UploadFailed { message, detail } => {
                log::warn!("upload failed: {}", detail);
                self.state.upload_error = Some((message, detail));
            }
            _ => {}
        }
    }

    fn save_download(&mut self) {
        let kind = self.state.export_kind;
        let download = match self.state.session.handle(Action::Download(kind)) {
            Feedback::Download(download) => download,
            Feedback::DownloadFailed { detail } => {
                self.state.status = format!("Export failed: {detail}");
                return;
            }
            _ => {
                self.state.status = "Nothing to download".to_string();
                return;
            }
        };

        let label = match kind {
            DownloadKind::Csv => "CSV",
            DownloadKind::Excel => "Excel",
        };
        let default_path = default_export_path(kind);
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(
                default_path
                    .file_name()
                    .and_then(|s| s.to_str())
                    .unwrap_or(download.file_name.as_str()),
            )
            .add_filter(label, &[kind.extension()])
            .save_file()
        else {
            return;
        };

        match save_export(&path, &download.data) {
            Ok(_) => self.state.status = format!("Saved {}", path.display()),
            Err(err) => self.state.status = format!("Save failed: {err:#}"),
        }
    }

    fn render_upload(&mut self, ui: &mut egui::Ui) {
        ui.heading("Upload Experimental Results (CSV or Excel)");
        if ui.button("Browse files").clicked() {
            self.open_upload();
        }

        if let Some((message, detail)) = &self.state.upload_error {
            ui.label(RichText::new(message).color(Color32::LIGHT_RED));
            ui.label(RichText::new(detail).small().color(Color32::GRAY));
        }

        if let Some(preview) = self.state.session.preview() {
            ui.label(RichText::new("Data Preview:").strong());
            egui::Grid::new("preview_grid").striped(true).show(ui, |ui| {
                for column in &preview.columns {
                    ui.label(RichText::new(column).strong());
                }
                ui.end_row();
                for row in &preview.rows {
                    for cell in row {
                        ui.label(cell);
                    }
                    ui.end_row();
                }
            });
            if preview.is_truncated() {
                ui.label(
                    RichText::new(format!("{} / {} rows", preview.rows.len(), preview.total_rows))
                        .small()
                        .color(Color32::GRAY),
                );
            }
        }
    }

    fn render_settings(&mut self, ui: &mut egui::Ui) {
        ui.heading("Technique Optimization Settings");

        let current_metal = self.state.session.form().metal_ion();
        let mut metal = current_metal;
        egui::ComboBox::from_label("Select Heavy Metal Ion")
            .selected_text(metal.label())
            .show_ui(ui, |ui| {
                for candidate in MetalIon::ALL {
                    ui.selectable_value(&mut metal, candidate, candidate.label());
                }
            });
        if metal != current_metal {
            self.state.session.handle(Action::SelectMetalIon(metal));
        }

        let current_technique = self.state.session.form().technique();
        let mut technique = current_technique;
        egui::ComboBox::from_label("Choose Detection Technique")
            .selected_text(technique.label())
            .show_ui(ui, |ui| {
                for candidate in Technique::ALL {
                    ui.selectable_value(&mut technique, candidate, candidate.label());
                }
            });
        if technique != current_technique {
            self.state.session.handle(Action::SelectTechnique(technique));
        }

        ui.add_space(6.0);
        for group in self.state.session.form().active_groups() {
            ui.label(RichText::new(group.label()).strong());
            for name in group.fields() {
                let spec = name.spec();
                let current = self.state.session.form().value(*name);
                let mut value = current;
                ui.horizontal(|ui| {
                    ui.label(spec.label);
                    ui.add(
                        egui::DragValue::new(&mut value)
                            .clamp_range(spec.min..=spec.max)
                            .speed(spec.step)
                            .min_decimals(spec.decimals())
                            .max_decimals(STORED_DECIMALS),
                    );
                });
                if value != current {
                    self.state.session.handle(Action::SetField(*name, value));
                }
            }
        }
    }

    fn render_actions(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("Add Optimized Technique Parameters").clicked() {
                self.state.query = None;
                if let Feedback::RecordAdded { count, .. } = self.state.session.handle(Action::AddRecord) {
                    self.state.status = format!("{} records", count);
                }
            }
            if ui.button("Submit Optimization Query").clicked() {
                if let Feedback::Query { message, summary } = self.state.session.handle(Action::SubmitQuery) {
                    self.state.query = Some((message.to_string(), summary));
                }
            }
        });

        if let Some(flash) = self.state.session.view().flash {
            ui.label(RichText::new(flash).color(Color32::LIGHT_GREEN));
        }
        if let Some((message, summary)) = &self.state.query {
            ui.label(RichText::new(message).strong());
            for line in summary.lines() {
                ui.label(line);
            }
        }
    }

    fn render_results(&mut self, ui: &mut egui::Ui) {
        let view = self.state.session.view();
        ui.heading("Optimized Technique Parameters");

        egui::Grid::new("result_grid").striped(true).show(ui, |ui| {
            for column in view.table.columns() {
                ui.label(RichText::new(*column).strong());
            }
            ui.end_row();
            for row in &view.table.rows {
                for cell in row {
                    let text = RichText::new(cell.to_string());
                    if cell.is_not_applicable() {
                        ui.label(text.color(Color32::GRAY));
                    } else {
                        ui.label(text);
                    }
                }
                ui.end_row();
            }
        });

        if view.can_download {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.radio_value(&mut self.state.export_kind, DownloadKind::Csv, "CSV");
                ui.radio_value(&mut self.state.export_kind, DownloadKind::Excel, "Excel");
                if ui.button("Download Optimized Technique Data").clicked() {
                    self.save_download();
                }
            });
        }
    }
}

pub fn configure_fonts(ctx: &egui::Context) {
    let mut fonts = FontDefinitions::default();
    // 上付き文字 (²⁺ など) を含むフォントを優先
    let candidates = [
        r"C:\Windows\Fonts\segoeui.ttf",
        r"C:\Windows\Fonts\meiryo.ttc",
        "/System/Library/Fonts/Supplemental/Arial Unicode.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    ];

    for path in candidates {
        if let Ok(data) = std::fs::read(path) {
            fonts.font_data.insert("symbol_fallback".to_string(), FontData::from_owned(data));
            fonts.families
                .entry(FontFamily::Proportional)
                .or_default()
                .push("symbol_fallback".to_string());
            fonts.families
                .entry(FontFamily::Monospace)
                .or_default()
                .push("symbol_fallback".to_string());
            ctx.set_fonts(fonts);
            return;
        }
    }
}

impl eframe::App for DesktopApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.heading(TITLE);
            ui.label(SUBTITLE);
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.label(RichText::new(&self.state.status).small());
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.render_upload(ui);
                ui.separator();
                self.render_settings(ui);
                ui.separator();
                self.render_actions(ui);
                ui.separator();
                self.render_results(ui);
            });
        });
    }
}
