// Domain-level errors for spreadsheet-backed workflows.
#[derive(Debug, thiserror::Error)]
pub enum SheetsError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("error fetching sheet data: {status} - {body}")]
    UpstreamRead { status: u16, body: String },
    #[error("failed to get access token: {status} - {body}")]
    UpstreamAuth { status: u16, body: String },
    #[error("error writing sheet data: {status} - {body}")]
    UpstreamWrite { status: u16, body: String },
    #[error("sheets transport error: {0}")]
    Transport(String),
    #[error("sheets response decode error: {0}")]
    Decode(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
}

impl SheetsError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
