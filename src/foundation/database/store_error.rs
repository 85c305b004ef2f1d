use std::fmt;

#[derive(Debug)]
pub enum StoreError {
    Unavailable(sled::Error),
    Corrupt { key: String, message: String },
    Encode(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StoreError::Unavailable(e) => write!(f, "User store unavailable: {}", e),
            StoreError::Corrupt { key, message } => {
                write!(f, "Corrupt user record '{}': {}", key, message)
            }
            StoreError::Encode(s) => write!(f, "Failed to encode user record: {}", s),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Unavailable(e) => Some(e),
            _ => None,
        }
    }
}

impl From<sled::Error> for StoreError {
    fn from(err: sled::Error) -> Self {
        StoreError::Unavailable(err)
    }
}
