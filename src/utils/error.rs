use crate::core::mapper::SelectionErrors;
use crate::domain::model::RowId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChecklistError {
    #[error("Please enter a link.")]
    MissingInput,

    #[error("Invalid link format. Make sure it ends with output=csv.")]
    InvalidLinkFormat { url: String },

    #[error("The link is not accessible. Make sure it is shared correctly.")]
    Unreachable { url: String },

    #[error("Please fill out all required fields")]
    SelectionIncomplete(SelectionErrors),

    #[error("Unknown column '{column}'. Available columns: {available}")]
    UnknownColumn { column: String, available: String },

    #[error("No sheet data loaded. Submit a link first.")]
    NoSheetData,

    #[error("Row {0} not found in the checklist")]
    RecordNotFound(RowId),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Stored entry '{key}' is corrupted: {message}")]
    CorruptEntry { key: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },
}

impl ChecklistError {
    /// 使用者輸入造成的錯誤（可直接顯示於畫面，不需要查看日誌）
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            ChecklistError::MissingInput
                | ChecklistError::InvalidLinkFormat { .. }
                | ChecklistError::Unreachable { .. }
                | ChecklistError::SelectionIncomplete(_)
                | ChecklistError::UnknownColumn { .. }
                | ChecklistError::NoSheetData
                | ChecklistError::RecordNotFound(_)
        )
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ChecklistError::MissingInput => "Pass the published CSV link to `load`",
            ChecklistError::InvalidLinkFormat { .. } => {
                "Use File > Share > Publish to web in Google Sheets and pick the CSV format"
            }
            ChecklistError::Unreachable { .. } => {
                "Make sure the sheet is published and the link opens in a private browser window"
            }
            ChecklistError::SelectionIncomplete(_) => {
                "Pass --name, or --split together with --first-name and --last-name"
            }
            ChecklistError::UnknownColumn { .. } => "Run `columns` to list the available columns",
            ChecklistError::NoSheetData => "Run `load <link>` first",
            ChecklistError::RecordNotFound(_) => "Run `list` to see the row ids",
            ChecklistError::HttpError(_) | ChecklistError::HttpStatus { .. } => {
                "Check your network connection and try again"
            }
            ChecklistError::CorruptEntry { .. } | ChecklistError::SerializationError(_) => {
                "Run `clear --yes` and load the sheet again"
            }
            ChecklistError::InvalidConfigValue { .. } | ChecklistError::ConfigError { .. } => {
                "Check the configuration file and command line flags"
            }
            ChecklistError::CsvError(_) | ChecklistError::IoError(_) => {
                "Check that the data directory is writable"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ChecklistError>;
