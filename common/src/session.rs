//! 1ユーザー分のセッション状態
//!
//! フォーム・結果テーブル・直近のプレビューを1つの値にまとめ、
//! 画面側は操作ごとに handle() を呼び、view() で再描画する。

use crate::error::Error;
use crate::fields::FieldName;
use crate::form::{FormModel, QuerySummary};
use crate::store::{Download, DownloadKind, ResultStore};
use crate::table::ResultTable;
use crate::types::{MetalIon, Technique};
use crate::upload::{load_preview, TablePreview, DEFAULT_PREVIEW_ROWS};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

pub const ADDED_MESSAGE: &str = "Technique parameters added successfully!";
pub const QUERY_MESSAGE: &str = "Optimization query submitted with the following settings:";
pub const UPLOAD_ERROR_MESSAGE: &str = "Error loading file. Please check the format.";

/// セッションID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        SessionId(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 画面の状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum InteractionState {
    #[default]
    Idle,
    /// 記録を追加した直後（成功メッセージ表示中）
    Submitted,
}

/// ユーザー操作
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SelectMetalIon(MetalIon),
    SelectTechnique(Technique),
    SetField(FieldName, f64),
    Upload { file_name: String, bytes: Vec<u8> },
    /// 「Add Optimized Technique Parameters」
    AddRecord,
    /// 「Submit Optimization Query」
    SubmitQuery,
    Download(DownloadKind),
}

/// 操作結果
#[derive(Debug, Clone, PartialEq)]
pub enum Feedback {
    Updated,
    FieldStored { name: FieldName, value: f64, clamped: bool },
    Uploaded { rows: usize, columns: usize },
    UploadFailed { message: String, detail: String },
    RecordAdded { message: String, count: usize },
    Query { message: String, summary: QuerySummary },
    Download(Download),
    NothingToDownload,
    /// 記録はあるが出力に失敗した
    DownloadFailed { detail: String },
}

/// 再描画用のスナップショット
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub metal_ion: MetalIon,
    pub technique: Technique,
    pub active_fields: Vec<(FieldName, f64)>,
    pub table: ResultTable,
    pub can_download: bool,
    pub flash: Option<&'static str>,
}

#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    started_at: DateTime<Utc>,
    form: FormModel,
    results: ResultStore,
    preview: Option<TablePreview>,
    preview_rows: usize,
    state: InteractionState,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(FormModel::default())
    }
}

impl Session {
    pub fn new(form: FormModel) -> Self {
        let id = SessionId::new();
        log::debug!("session {} started", id);
        Self {
            id,
            started_at: Utc::now(),
            form,
            results: ResultStore::new(),
            preview: None,
            preview_rows: DEFAULT_PREVIEW_ROWS,
            state: InteractionState::Idle,
        }
    }

    pub fn with_preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = rows.max(1);
        self
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn form(&self) -> &FormModel {
        &self.form
    }

    pub fn results(&self) -> &ResultStore {
        &self.results
    }

    pub fn preview(&self) -> Option<&TablePreview> {
        self.preview.as_ref()
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    /// ダウンロードボタンを出すかどうか
    pub fn can_download(&self) -> bool {
        !self.results.is_empty()
    }

    pub fn handle(&mut self, action: Action) -> Feedback {
        // 成功メッセージは次の操作まで
        self.state = InteractionState::Idle;

        match action {
            Action::SelectMetalIon(metal_ion) => {
                self.form.set_metal_ion(metal_ion);
                Feedback::Updated
            }
            Action::SelectTechnique(technique) => {
                self.form.set_technique(technique);
                Feedback::Updated
            }
            Action::SetField(name, value) => {
                let stored = self.form.set_field(name, value);
                Feedback::FieldStored { name, value: stored, clamped: stored != value }
            }
            Action::Upload { file_name, bytes } => self.upload(&file_name, &bytes),
            Action::AddRecord => {
                self.results.append(self.form.snapshot());
                self.state = InteractionState::Submitted;
                Feedback::RecordAdded {
                    message: ADDED_MESSAGE.to_string(),
                    count: self.results.len(),
                }
            }
            Action::SubmitQuery => Feedback::Query {
                message: QUERY_MESSAGE.to_string(),
                summary: self.form.query_summary(),
            },
            Action::Download(kind) => download_feedback(self.results.download_as(kind)),
        }
    }

    fn upload(&mut self, file_name: &str, bytes: &[u8]) -> Feedback {
        match load_preview(file_name, bytes, self.preview_rows) {
            Ok(preview) => {
                let feedback = Feedback::Uploaded {
                    rows: preview.total_rows,
                    columns: preview.columns.len(),
                };
                self.preview = Some(preview);
                feedback
            }
            Err(e) => {
                log::warn!("upload rejected: {}", e);
                // フォームと結果テーブルには触れない
                self.preview = None;
                let detail = match e {
                    Error::FileLoad { reason, .. } => reason,
                    other => other.to_string(),
                };
                Feedback::UploadFailed {
                    message: UPLOAD_ERROR_MESSAGE.to_string(),
                    detail,
                }
            }
        }
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            metal_ion: self.form.metal_ion(),
            technique: self.form.technique(),
            active_fields: self.form.active_values(),
            table: self.results.to_table(),
            can_download: self.can_download(),
            flash: match self.state {
                InteractionState::Submitted => Some(ADDED_MESSAGE),
                InteractionState::Idle => None,
            },
        }
    }
}

fn download_feedback(result: crate::error::Result<Download>) -> Feedback {
    match result {
        Ok(download) => Feedback::Download(download),
        Err(Error::NothingToExport) => Feedback::NothingToDownload,
        Err(e) => {
            log::error!("export failed: {}", e);
            Feedback::DownloadFailed { detail: e.to_string() }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_transitions_and_resets() {
        let mut session = Session::default();
        assert_eq!(session.state(), InteractionState::Idle);

        let feedback = session.handle(Action::AddRecord);
        assert_eq!(
            feedback,
            Feedback::RecordAdded { message: ADDED_MESSAGE.to_string(), count: 1 }
        );
        assert_eq!(session.state(), InteractionState::Submitted);
        assert_eq!(session.view().flash, Some(ADDED_MESSAGE));

        session.handle(Action::SelectTechnique(Technique::LinearSweepVoltammetry));
        assert_eq!(session.state(), InteractionState::Idle);
        assert_eq!(session.view().flash, None);
    }

    #[test]
    fn test_query_does_not_touch_table() {
        let mut session = Session::default();
        session.handle(Action::SelectTechnique(Technique::DifferentialPulseVoltammetry));
        let feedback = session.handle(Action::SubmitQuery);
        match feedback {
            Feedback::Query { message, summary } => {
                assert_eq!(message, QUERY_MESSAGE);
                assert_eq!(summary.technique, Technique::DifferentialPulseVoltammetry);
                assert_eq!(summary.values.len(), 4);
            }
            other => panic!("unexpected feedback: {:?}", other),
        }
        assert!(session.results().is_empty());
        assert_eq!(session.state(), InteractionState::Idle);
    }

    #[test]
    fn test_set_field_reports_clamping() {
        let mut session = Session::default();
        let feedback = session.handle(Action::SetField(FieldName::PulseWidth, 99.0));
        assert_eq!(
            feedback,
            Feedback::FieldStored { name: FieldName::PulseWidth, value: 50.0, clamped: true }
        );
    }

    #[test]
    fn test_download_only_when_non_empty() {
        let mut session = Session::default();
        assert!(!session.can_download());
        assert_eq!(session.handle(Action::Download(DownloadKind::Csv)), Feedback::NothingToDownload);

        session.handle(Action::AddRecord);
        assert!(session.can_download());
        match session.handle(Action::Download(DownloadKind::Csv)) {
            Feedback::Download(download) => {
                assert_eq!(download.file_name, "technique_optimization.csv");
                assert!(!download.data.is_empty());
            }
            other => panic!("unexpected feedback: {:?}", other),
        }
    }

    #[test]
    fn test_export_error_is_reported() {
        let feedback = download_feedback(Err(Error::Excel("workbook write failed".to_string())));
        assert_eq!(
            feedback,
            Feedback::DownloadFailed { detail: "Excel error: workbook write failed".to_string() }
        );
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(matches!(download_feedback(Err(io.into())), Feedback::DownloadFailed { .. }));
        assert_eq!(download_feedback(Err(Error::NothingToExport)), Feedback::NothingToDownload);
    }

    #[cfg(feature = "excel")]
    #[test]
    fn test_download_resets_flash() {
        let mut session = Session::default();
        session.handle(Action::AddRecord);
        assert_eq!(session.state(), InteractionState::Submitted);

        match session.handle(Action::Download(DownloadKind::Excel)) {
            Feedback::Download(download) => assert_eq!(download.file_name, "technique_optimization.xlsx"),
            other => panic!("unexpected feedback: {:?}", other),
        }
        assert_eq!(session.state(), InteractionState::Idle);
        assert_eq!(session.view().flash, None);
    }

    #[test]
    fn test_failed_upload_keeps_form_and_table() {
        let mut session = Session::default();
        session.handle(Action::SelectMetalIon(MetalIon::Mercury));
        session.handle(Action::SetField(FieldName::ScanRate, 120.0));
        session.handle(Action::AddRecord);
        let before_form = session.form().clone();
        let before_table = session.results().to_table();

        let feedback = session.handle(Action::Upload {
            file_name: "broken.xlsx".into(),
            bytes: b"garbage".to_vec(),
        });
        match feedback {
            Feedback::UploadFailed { message, detail } => {
                assert_eq!(message, UPLOAD_ERROR_MESSAGE);
                assert!(!detail.is_empty());
            }
            other => panic!("unexpected feedback: {:?}", other),
        }
        assert_eq!(session.form(), &before_form);
        assert_eq!(session.results().to_table(), before_table);
        assert!(session.preview().is_none());
    }

    #[test]
    fn test_upload_preview_uses_configured_rows() {
        let mut session = Session::default().with_preview_rows(2);
        let feedback = session.handle(Action::Upload {
            file_name: "runs.csv".into(),
            bytes: b"run,current\n1,0.1\n2,0.2\n3,0.3\n".to_vec(),
        });
        assert_eq!(feedback, Feedback::Uploaded { rows: 3, columns: 2 });
        let preview = session.preview().expect("プレビューがない");
        assert_eq!(preview.rows.len(), 2);
    }

    #[test]
    fn test_sessions_have_distinct_ids() {
        assert_ne!(Session::default().id(), Session::default().id());
    }
}
