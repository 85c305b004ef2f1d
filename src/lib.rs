pub mod api_client;
pub mod configuration;
pub mod digest;
pub mod foundation;
pub mod process;
pub mod startup;

pub use api_client::{Catalog, CatalogClient, EmailSender, HttpEmailClient, Notifier};
pub use configuration::*;
pub use foundation::database::*;
pub use startup::{run, run_digest, InvocationResponse, RunStatus, RunSummary};
