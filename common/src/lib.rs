//! Echem Opt Common Library
//!
//! CLIとデスクトップで共有される型とセッションモデル

pub mod types;
pub mod fields;
pub mod form;
pub mod record;
pub mod table;
pub mod store;
pub mod upload;
pub mod session;
pub mod error;

pub use types::{MetalIon, Technique};
pub use fields::{current_active_fields, groups_for, FieldGroup, FieldName, FieldSpec, NumberKind, FIELD_SPECS};
pub use form::{FormModel, QuerySummary};
pub use record::OptimizationRecord;
pub use table::{Cell, ResultTable, COLUMNS, NOT_APPLICABLE};
pub use store::{Download, DownloadKind, ResultStore, EXPORT_FILE_NAME, EXPORT_MIME, XLSX_MIME};
pub use upload::{load_preview, load_preview_from_path, TablePreview, DEFAULT_PREVIEW_ROWS};
pub use session::{Action, Feedback, InteractionState, Session, SessionId, SessionView};
pub use error::{Error, Result};
