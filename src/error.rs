use std::fmt;

#[derive(Debug)]
pub enum Error {
    Http(reqwest::Error),
    Connection(reqwest::Error),
    Authentication(String),
    Transport { status: u16 },
    Json(serde_json::Error),
    NotConnected,
    UnsupportedDevice {
        system_type: i64,
        whe_type: Option<i64>,
    },
    UnsupportedOperation(String),
    InvalidMode(String),
    InvalidZone(u32),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Http(e) => write!(f, "HTTP error: {e}"),
            Error::Connection(e) => write!(f, "cannot connect to the cloud: {e}"),
            Error::Authentication(msg) => write!(f, "authentication error: {msg}"),
            Error::Transport { status } => write!(f, "request failed with status {status}"),
            Error::Json(e) => write!(f, "JSON error: {e}"),
            Error::NotConnected => write!(f, "not connected"),
            Error::UnsupportedDevice {
                system_type,
                whe_type: Some(whe),
            } => write!(f, "unsupported device: system type {system_type}, whe type {whe}"),
            Error::UnsupportedDevice { system_type, .. } => {
                write!(f, "unsupported device: system type {system_type}")
            }
            Error::UnsupportedOperation(op) => write!(f, "unsupported operation: {op}"),
            Error::InvalidMode(mode) => write!(f, "invalid mode: {mode}"),
            Error::InvalidZone(zone) => write!(f, "invalid zone: {zone}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Http(e) | Error::Connection(e) => Some(e),
            Error::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Http(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
