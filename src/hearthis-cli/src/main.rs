use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand};
use hearthis_core::models::CatalogRef;
use hearthis_core::secrets::CredentialStore;
use hearthis_core::{
    init_logging, AppDirs, Config, HearthisConfig, MediaLibrary, PlaybackTranslator,
};
use hearthis_provider::client::Credentials;
use hearthis_provider::HearthisBackend;

#[derive(Debug, Parser)]
#[command(name = "hearthis", version, about = "hearthis.at catalog backend")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the entries under a catalog address (default: the root)
    Browse { uri: Option<String> },
    /// Browse a page and print the full record of every track on it
    Tracks { uri: String },
    /// Resolve a track address to its direct stream URL
    Resolve { uri: String },
    /// Keyring password management
    #[command(subcommand)]
    Auth(AuthCommand),
}

#[derive(Debug, Subcommand)]
enum AuthCommand {
    /// Store the account password in the OS keyring
    Set { password: String },
    /// Remove the stored password from the OS keyring
    Clear,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let dirs = AppDirs::discover()?;
    let config = Config::load_or_default(&dirs)?;
    let _logging = init_logging(&config.logging, &dirs)?;

    let store = CredentialStore::new();
    tracing::debug!(api_url = %config.hearthis.api_url, "configuration loaded");
    match cli.command {
        Command::Auth(auth) => run_auth(&config.hearthis, &store, auth),
        Command::Browse { uri } => {
            let mut backend = connect(&config.hearthis, &store)?;
            let uri = uri.unwrap_or_else(|| backend.root().uri().to_string());
            for entry in backend.browse(&uri) {
                println!("{}", render_ref(&entry));
            }
            Ok(())
        }
        Command::Tracks { uri } => {
            let mut backend = connect(&config.hearthis, &store)?;
            for entry in backend.browse(&uri) {
                if entry.is_directory() {
                    continue;
                }
                for track in backend.lookup(entry.uri()) {
                    println!(
                        "{} | {} | {} | {} ms | {}",
                        track.name, track.artist.name, track.date, track.length_ms, track.uri
                    );
                }
            }
            Ok(())
        }
        Command::Resolve { uri } => {
            let backend = connect(&config.hearthis, &store)?;
            let stream = backend.translate_uri(&uri)?;
            println!("{}", stream.as_ref());
            Ok(())
        }
    }
}

fn connect(config: &HearthisConfig, store: &CredentialStore) -> Result<HearthisBackend> {
    let credentials = resolve_credentials(config, store)?;
    Ok(HearthisBackend::connect(config, &credentials)?)
}

fn resolve_credentials(config: &HearthisConfig, store: &CredentialStore) -> Result<Credentials> {
    let Some(username) = config.username.clone() else {
        bail!("set hearthis.username in config.toml");
    };
    let password = match &config.password {
        Some(password) => password.clone(),
        None => store.get_password(&username).map_err(|err| {
            anyhow!("no password in config and keyring lookup failed ({err}); run `hearthis auth set <password>`")
        })?,
    };
    Ok(Credentials { username, password })
}

fn run_auth(config: &HearthisConfig, store: &CredentialStore, auth: AuthCommand) -> Result<()> {
    let Some(username) = config.username.as_deref() else {
        bail!("set hearthis.username in config.toml before managing the password");
    };
    match auth {
        AuthCommand::Set { password } => {
            store.store_password(username, &password)?;
            println!("Password stored for {username}.");
        }
        AuthCommand::Clear => {
            store.delete_password(username)?;
            println!("Password cleared for {username}.");
        }
    }
    Ok(())
}

fn render_ref(entry: &CatalogRef) -> String {
    let kind = if entry.is_directory() { "dir  " } else { "track" };
    format!("{kind}  {}  [{}]", entry.name(), entry.uri())
}
