use serde::{Deserialize, Serialize};

/// One subscriber and the artists they follow, keyed by email in the store.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub email: String,
    pub artists: Vec<String>, // in the order the user saved them
}

impl UserRecord {
    pub fn new(email: &str, artists: &[&str]) -> Self {
        Self {
            email: email.to_string(),
            artists: artists.iter().map(|a| a.to_string()).collect(),
        }
    }
}
