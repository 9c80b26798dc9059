use thiserror::Error;

pub type RenderResult<T> = Result<T, RenderError>;

/// Errors produced while turning a template into an HTML document.
///
/// Missing `page` / `components` are the only validation failures the
/// renderer itself raises; every other template field is defaulted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("invalid template: missing 'page' section")]
    MissingPage,

    #[error("invalid template: missing 'components' list")]
    MissingComponents,

    #[error("template is not valid JSON: {0}")]
    Json(String),

    #[error("formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),
}

impl From<serde_json::Error> for RenderError {
    fn from(err: serde_json::Error) -> Self {
        RenderError::Json(err.to_string())
    }
}

/// Errors from the downloadable-file export path.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("failed to write HTML file: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the backend API boundary.
///
/// The three network causes are kept separate so callers can phrase them
/// differently to the user; the retry policy is identical for all of them
/// (manual retry only).
#[derive(Error, Debug)]
pub enum ApiError {
    /// The backend answered with a non-200 envelope code.
    #[error("server error: {message}")]
    Server { message: String },

    /// The request reached the wire but the round trip failed
    /// (timeout, broken connection, undecodable body).
    #[error("request failed: {0}")]
    Transport(reqwest::Error),

    /// The request never left the client (connection refused, DNS failure).
    #[error("backend unreachable: {0}")]
    Unreachable(reqwest::Error),

    /// A structurally valid envelope that is missing the promised payload.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// Client-side request validation failed before anything was sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}
