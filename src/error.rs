use std::fmt;
use std::io;

#[derive(Debug)]
pub enum Error {
    Format(String),
    DataContract(String),
    Network(String),
    Geolocation(String),
    Config(String),
    Io(io::Error),
    Render(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Format(raw) => write!(f, "Invalid time format: {raw:?}"),
            Error::DataContract(e) => write!(f, "Unexpected response: {e}"),
            Error::Network(e) => write!(f, "Network error: {e}"),
            Error::Geolocation(e) => write!(f, "Geolocation error: {e}"),
            Error::Config(e) => write!(f, "Config error: {e}"),
            Error::Io(e) => write!(f, "IO error: {e}"),
            Error::Render(e) => write!(f, "Render error: {e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Network(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::DataContract(e.to_string())
    }
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Error::Render(e.to_string())
    }
}

impl From<usvg::Error> for Error {
    fn from(e: usvg::Error) -> Self {
        Error::Render(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
