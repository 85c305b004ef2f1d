/// # The Main Entry Point of the Weekly Digest
///
/// This module drives one scheduled run, from configuration loading to the
/// last email sent.
///
/// # Steps:
/// 1. Loads the configuration and opens the user store
/// 2. Collects the distinct artists followed by any user
/// 3. Authenticates with the catalog
/// 4. Resolves artist names and fetches their new releases
/// 5. Renders and sends one digest per user
///
use crate::api_client::{Catalog, CatalogClient, HttpEmailClient, Notifier};
use crate::configuration::{self, ConfigFolder, DigestFormat};
use crate::digest::render_digest;
use crate::foundation::database::{SledUserStore, UserRecord, UserStore};
use crate::foundation::utils::lookback_cutoff;
use crate::process::{fetch_release_map, get_artists, resolve_artist_ids, CatalogFailure};
use anyhow::Context;
use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    AllDone,
    NothingToSearch,
}

impl RunStatus {
    pub fn message(&self) -> &'static str {
        match self {
            RunStatus::AllDone => "all done :)",
            RunStatus::NothingToSearch => "Nothing to search :/",
        }
    }
}

/// What happened during one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub status: RunStatus,
    pub emails_sent: usize,
    pub emails_failed: usize,
    pub catalog_failures: Vec<CatalogFailure>,
}

impl RunSummary {
    fn nothing_to_search() -> Self {
        Self {
            status: RunStatus::NothingToSearch,
            emails_sent: 0,
            emails_failed: 0,
            catalog_failures: Vec::new(),
        }
    }
}

/// The JSON object reported back to the scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvocationResponse {
    pub message: String,
}

impl From<&RunSummary> for InvocationResponse {
    fn from(summary: &RunSummary) -> Self {
        Self {
            message: summary.status.message().to_string(),
        }
    }
}

/// Runs the digest with the settings found in `cfg_folder` and the environment.
pub async fn run(cfg_folder: &ConfigFolder) -> anyhow::Result<InvocationResponse> {
    let settings =
        configuration::get_configuration(cfg_folder).context("Unable to load configuration")?;

    let store = SledUserStore::open(&settings.store.path, &settings.store.table)
        .context("Unable to open the user store")?;
    let catalog =
        CatalogClient::new(settings.catalog.clone()).context("Unable to build catalog client")?;
    let mailer = HttpEmailClient::new(&settings.email).context("Unable to build email client")?;
    let notifier = Notifier::new(&mailer, &settings.email, settings.digest.format);

    let summary = run_digest(
        &store,
        &catalog,
        &notifier,
        settings.digest.format,
        settings.digest.lookback_days,
        Local::now().date_naive(),
    )
    .await?;

    Ok(InvocationResponse::from(&summary))
}

/// One pass of the pipeline against the given store, catalog and notifier.
///
/// Store and authorization failures abort the run. Catalog failures for a
/// single artist and failed deliveries are counted in the returned summary.
pub async fn run_digest(
    store: &dyn UserStore,
    catalog: &dyn Catalog,
    notifier: &Notifier<'_>,
    format: DigestFormat,
    lookback_days: u32,
    today: NaiveDate,
) -> anyhow::Result<RunSummary> {
    let records = store.get_users().context("Unable to read users")?;
    let artists = get_artists(&records);

    if artists.is_empty() {
        info!(users = records.len(), "no artists to search");
        return Ok(RunSummary::nothing_to_search());
    }
    info!(users = records.len(), artists = artists.len(), "starting digest run");

    let token = catalog
        .authorize()
        .await
        .context("Unable to authorize with the catalog")?;

    let mut catalog_failures = Vec::new();
    let resolution = resolve_artist_ids(catalog, &artists, &token, &mut catalog_failures).await;
    let cutoff = lookback_cutoff(today, lookback_days);
    let release_map =
        fetch_release_map(catalog, &resolution, &token, cutoff, &mut catalog_failures).await;

    let mut emails_sent = 0;
    let mut emails_failed = 0;
    for record in &records {
        if record.artists.is_empty() {
            debug!(email = %record.email, "user follows no artists, skipping");
            continue;
        }

        let body = render_digest(&record.artists, &release_map, format);
        if notifier.send_email(&body, &record.email).await {
            emails_sent += 1;
        } else {
            emails_failed += 1;
        }
    }

    let summary = RunSummary {
        status: RunStatus::AllDone,
        emails_sent,
        emails_failed,
        catalog_failures,
    };
    log_summary(&summary);
    Ok(summary)
}

fn log_summary(summary: &RunSummary) {
    for failure in &summary.catalog_failures {
        warn!(
            artist = %failure.artist,
            stage = ?failure.stage,
            "catalog lookup failed: {}",
            failure.message
        );
    }
    info!(
        sent = summary.emails_sent,
        failed = summary.emails_failed,
        catalog_failures = summary.catalog_failures.len(),
        "digest run finished"
    );
}

/// Every record in the user store, for the `users` command.
pub fn list_users(cfg_folder: &ConfigFolder) -> anyhow::Result<Vec<UserRecord>> {
    let store = open_user_store(cfg_folder)?;

    Ok(store.get_users()?)
}

/// Creates or replaces a user record, for the `users add` command.
pub fn add_user(cfg_folder: &ConfigFolder, record: &UserRecord) -> anyhow::Result<()> {
    let store = open_user_store(cfg_folder)?;

    store.store_user(record)?;
    Ok(())
}

// The admin commands only need the store section, so they work before the
// catalog and email credentials are configured.
fn open_user_store(cfg_folder: &ConfigFolder) -> anyhow::Result<SledUserStore> {
    let store_settings =
        configuration::get_store_settings(cfg_folder).context("Unable to load configuration")?;

    SledUserStore::open(&store_settings.path, &store_settings.table)
        .context("Unable to open the user store")
}
