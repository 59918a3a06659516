use echem_opt_common::{DownloadKind, QuerySummary, Session};

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub session: Session,
    /// (message, raw error text)
    pub upload_error: Option<(String, String)>,
    pub query: Option<(String, QuerySummary)>,
    pub export_kind: DownloadKind,
    pub status: String,
}
