pub type ScResult<T> = Result<T, ScError>;

#[derive(Debug, thiserror::Error)]
pub enum ScError {
    #[error("[HTTP Request Error] {0}")]
    HttpRequestError(#[from] ::reqwest::Error),

    #[error("[HTTP Middleware Error] {0}")]
    HttpMiddlewareError(#[from] ::reqwest_middleware::Error),

    #[error("[HTTP Status Error] [{request}] {status}")]
    HttpStatusError { status: String, request: String },

    #[error("[Invalid] {message}")]
    Invalid { code: &'static str, message: String },

    #[error("[No Data] {message}")]
    NoData { code: &'static str, message: String },

    #[error("[Parse Config Error] {0}")]
    ParseConfigError(#[from] ::confy::ConfyError),

    #[error("[Parse Enum Error] {0}")]
    ParseEnumError(#[from] ::strum::ParseError),

    #[error("[Parse URL Error] {0}")]
    ParseUrlError(#[from] url::ParseError),

    #[error("[Serde JSON Error] {0}")]
    SerdeJsonError(#[from] ::serde_json::Error),
}

impl ScError {
    /// The bare message for `Invalid`/`NoData`, the full rendering otherwise.
    pub fn user_message(&self) -> String {
        match self {
            Self::Invalid { message, .. } | Self::NoData { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
