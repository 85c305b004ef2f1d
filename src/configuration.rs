use config::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

/// Prefix for environment overrides, e.g. `NEWMUSIC_CATALOG__CLIENT_ID`.
const ENV_PREFIX: &str = "NEWMUSIC";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub store: StoreSettings,
    pub catalog: CatalogSettings,
    pub email: EmailSettings,
    pub digest: DigestSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    pub path: String,
    pub table: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSettings {
    pub client_id: String,
    pub client_secret: String,
    pub token_url: String,
    pub search_url: String,
    /// Artist releases endpoint; `{}` is replaced with the catalog artist id.
    pub releases_url: String,
    pub include_groups: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailSettings {
    pub sender: String,
    pub api_url: String,
    #[serde(default)]
    pub api_token: Option<String>,
    pub subject: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DigestSettings {
    pub format: DigestFormat,
    pub lookback_days: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestFormat {
    Html,
    Text,
}

impl CatalogSettings {
    pub fn new(client_id: &str, client_secret: &str, base_url: &str) -> Self {
        Self {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            token_url: format!("{base_url}/api/token"),
            search_url: format!("{base_url}/v1/search"),
            releases_url: format!("{base_url}/v1/artists/{{}}/albums"),
            include_groups: "single,album".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Loads settings from the optional YAML file, then environment overrides.
///
/// Anything not set in either place falls back to the defaults below; the
/// catalog credentials and email endpoints have no default and must be
/// provided.
pub fn get_configuration(cfg_folder: &ConfigFolder) -> Result<Settings, ConfigError> {
    load_sources(cfg_folder)?.try_deserialize::<Settings>()
}

/// Only the `store` section, for commands that never reach the catalog or
/// the email service.
pub fn get_store_settings(cfg_folder: &ConfigFolder) -> Result<StoreSettings, ConfigError> {
    load_sources(cfg_folder)?.get::<StoreSettings>("store")
}

fn load_sources(cfg_folder: &ConfigFolder) -> Result<config::Config, ConfigError> {
    let db_path = cfg_folder.newmusic_db.to_string_lossy().into_owned();
    let cfg_file = cfg_folder.config_file.to_string_lossy().into_owned();

    config::Config::builder()
        .set_default("store.path", db_path)?
        .set_default("store.table", "user_favorites")?
        .set_default("catalog.token_url", "https://accounts.spotify.com/api/token")?
        .set_default("catalog.search_url", "https://api.spotify.com/v1/search")?
        .set_default(
            "catalog.releases_url",
            "https://api.spotify.com/v1/artists/{}/albums",
        )?
        .set_default("catalog.include_groups", "single,album")?
        .set_default("catalog.timeout_secs", 30)?
        .set_default("email.subject", "Newest Music in Last 7 Days")?
        .set_default("email.timeout_secs", 30)?
        .set_default("digest.format", "html")?
        .set_default("digest.lookback_days", 7)?
        .add_source(config::File::new(&cfg_file, config::FileFormat::Yaml).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
}

pub struct ConfigFolder {
    pub config_dir: PathBuf,
    pub config_file: PathBuf,
    pub newmusic_db: PathBuf,
}

impl ConfigFolder {
    pub fn new() -> io::Result<Self> {
        let home_dir = env::var("HOME").map_err(|_| {
            io::Error::new(io::ErrorKind::NotFound, "HOME environment variable not set")
        })?;

        Ok(Self::from_home(Path::new(&home_dir)))
    }

    pub fn from_home(home_dir: &Path) -> Self {
        let config_dir = home_dir.join(".newmusic");

        Self {
            config_file: config_dir.join("config.yaml"),
            newmusic_db: config_dir.join("newmusic_db"),
            config_dir,
        }
    }
}

pub fn create_config(cfg_folder: ConfigFolder) -> Result<(), Box<dyn std::error::Error>> {
    println!("\x1b[1m\x1b[32mCreating configuration...\x1b[0m");

    if cfg_folder.config_file.exists() && !confirm_overwrite()? {
        println!("\x1b[33mOperation cancelled.\x1b[0m");
        return Ok(());
    }

    fs::create_dir_all(&cfg_folder.config_dir)?;

    let config_content = include_str!("config_template.yaml");
    fs::write(&cfg_folder.config_file, config_content)?;

    println!("\x1b[32mConfiguration file created at:");
    println!("  -> {}", cfg_folder.config_file.display());
    println!("\x1b[0mPlease fill in your catalog credentials and email settings.");

    Ok(())
}

fn confirm_overwrite() -> Result<bool, io::Error> {
    println!("\x1b[31mThe configuration file already exists.");
    println!("Do you want to overwrite it? (y/N)\x1b[0m");

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().eq_ignore_ascii_case("y"))
}
