use std::fmt;

#[derive(Debug)]
pub enum TapError {
    /// Endpoint URL is not https (or a loopback test endpoint).
    InvalidUrl { url: String },
    /// A value that cannot be safely interpolated into an ADQL literal.
    InvalidIdentifier { value: String },
    /// Client certificate could not be read or parsed.
    Identity(String),
    /// Transport-level failure.
    Http(String),
    /// Non-success HTTP status from the service.
    Status { code: u16, url: String },
    /// Response body is not the CSV the service promised.
    Csv(String),
}

impl fmt::Display for TapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl { url } => write!(f, "refusing non-https endpoint: {url}"),
            Self::InvalidIdentifier { value } => {
                write!(f, "cannot use '{value}' in a query literal")
            }
            Self::Identity(msg) => write!(f, "client certificate error: {msg}"),
            Self::Http(msg) => write!(f, "HTTP error: {msg}"),
            Self::Status { code, url } => write!(f, "HTTP {code} from {url}"),
            Self::Csv(msg) => write!(f, "CSV parse error: {msg}"),
        }
    }
}

impl std::error::Error for TapError {}
