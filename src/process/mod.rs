//! The digest pipeline stages between reading users and rendering emails.

mod artists;
mod models;
mod releases;

pub use artists::*;
pub use models::*;
pub use releases::*;
