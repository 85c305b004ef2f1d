mod auth;
mod catalog;
mod catalog_error;
pub mod dto;
mod email;

pub use auth::{basic_credential, AuthToken};
pub use catalog::{Catalog, CatalogClient};
pub use catalog_error::CatalogError;
pub use email::{Email, EmailBody, EmailError, EmailSender, HttpEmailClient, Notifier};

#[cfg(test)]
pub use catalog::MockCatalog;
#[cfg(test)]
pub use email::MockEmailSender;
