use reqwest::Error as ReqwestError;
use std::fmt;

#[derive(Debug)]
pub enum CatalogError {
    Auth(String),
    Request(ReqwestError),
    Status { code: u16, body: String },
    JsonParse(serde_json::Error),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CatalogError::Auth(s) => write!(f, "Catalog authorization failed: {}", s),
            CatalogError::Request(e) => write!(f, "Catalog request failed: {}", e),
            CatalogError::Status { code, body } => {
                write!(f, "Catalog returned HTTP {}: {}", code, body)
            }
            CatalogError::JsonParse(e) => write!(f, "Catalog JSON parse error: {}", e),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Request(e) => Some(e),
            CatalogError::JsonParse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ReqwestError> for CatalogError {
    fn from(error: ReqwestError) -> Self {
        CatalogError::Request(error)
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(error: serde_json::Error) -> Self {
        CatalogError::JsonParse(error)
    }
}
