use clap::{Arg, ArgMatches, Command};
use newmusic::configuration::{create_config, ConfigFolder};
use newmusic::startup::{add_user, list_users, run};
use newmusic::UserRecord;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let args = Command::new("newmusic")
        .about("🎵 Weekly new-release digests for the artists you follow 🎵")
        .subcommand(
            Command::new("run").about("🚀 Look up new releases and email every user their digest"),
        )
        .subcommand(Command::new("config").about("🛠️ Create or update the configuration file"))
        .subcommand(
            Command::new("users")
                .about("👥 List the users in the store")
                .subcommand(
                    Command::new("add")
                        .about("➕ Add a user or replace their artist list")
                        .arg(Arg::new("email").required(true))
                        .arg(Arg::new("artists").required(true).num_args(1..)),
                ),
        )
        .get_matches();
    debug!(?args, "invoked");

    let cfg_folder = ConfigFolder::new()?;

    match args.subcommand() {
        Some(("run", _)) => {
            let response = run(&cfg_folder).await?;
            println!("{}", serde_json::to_string(&response)?);
            Ok(())
        }
        Some(("config", _)) => {
            println!("\x1b[1m\x1b[34mConfiguring newmusic...\x1b[0m");
            create_config(cfg_folder)
        }
        Some(("users", users_args)) => users(&cfg_folder, users_args),
        _ => {
            print_usage();
            Ok(())
        }
    }
}

// Logs go to stderr; stdout only carries the run result.
fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("newmusic=info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn users(cfg_folder: &ConfigFolder, args: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(("add", add_args)) = args.subcommand() {
        let email = add_args.get_one::<String>("email").ok_or("missing email")?;
        let artists: Vec<String> = add_args
            .get_many::<String>("artists")
            .map(|values| values.cloned().collect())
            .unwrap_or_default();

        add_user(
            cfg_folder,
            &UserRecord {
                email: email.clone(),
                artists,
            },
        )?;
        println!("\x1b[32mSaved {}.\x1b[0m", email);
        return Ok(());
    }

    let records = list_users(cfg_folder)?;
    if records.is_empty() {
        println!("\x1b[33mNo users in the store yet.\x1b[0m");
    }
    for record in records {
        println!("\x1b[1m{}\x1b[0m: {}", record.email, record.artists.join(", "));
    }
    Ok(())
}

fn print_usage() {
    println!("\x1b[1m\x1b[31mInvalid command!\x1b[0m\n");
    println!("📖 Available Commands:");
    println!("  \x1b[1m\x1b[32mnewmusic run\x1b[0m                     - 🚀 Send this week's digests");
    println!("  \x1b[1m\x1b[32mnewmusic config\x1b[0m                  - 🛠️  Create or update configuration file");
    println!("  \x1b[1m\x1b[32mnewmusic users\x1b[0m                   - 👥 List users");
    println!("  \x1b[1m\x1b[32mnewmusic users add EMAIL ARTIST...\x1b[0m - ➕ Add a user");
}
