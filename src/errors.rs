use astra::Response;
use thiserror::Error;

/// Errors originating from either the server logic
/// (routing, bad input, auth) or downstream layers (user store, spreadsheet
/// I/O, chart rendering).
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Not Found")]
    NotFound,
    #[error("Bad Request: {0}")]
    BadRequest(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Store Error: {0}")]
    StoreError(String),
    #[error("Spreadsheet Error: {0}")]
    XlsxError(String),
    #[error("Chart Error: {0}")]
    ChartError(String),
    #[error("Internal Server Error")]
    InternalError,
}

// Type alias commonly used by route handlers.
pub type ResultResp = Result<Response, ServerError>;
