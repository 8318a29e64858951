//! `burp` binary
//!
//! Uploads source archives to the AUR.
//!
//! # Usage
//!
//! ```bash
//! burp -u alice -c network foo-1.0-1.src.tar.gz
//! burp -C ~/.cache/burp.cookies -k *.src.tar.gz
//! ```

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use burp::{
    Client, ConfigLoader, SettingsOverrides,
    cli::{self, UploadArgs},
    types::CategoryId,
};

#[derive(Parser)]
#[command(name = "burp", author, version, about, long_about = None)]
#[command(after_help = "burp also honors a config file, by default $XDG_CONFIG_HOME/burp/burp.toml.")]
struct Cli {
    /// AUR login username
    #[arg(short, long)]
    user: Option<String>,

    /// AUR login password
    #[arg(short, long)]
    password: Option<String>,

    /// Assign the uploaded package with category CAT. This will default to
    /// the current category for pre-existing packages and 'None' for new
    /// packages. `-c help` gives a list of valid categories.
    #[arg(short, long, value_name = "CAT")]
    category: Option<String>,

    /// Use FILE to store cookies rather than keeping them in memory. Useful
    /// with the -k option.
    #[arg(short = 'C', long, value_name = "FILE")]
    cookies: Option<PathBuf>,

    /// Cookies will be persistent and reused for logins. Requires a cookie
    /// file.
    #[arg(short = 'k', long)]
    keep_cookies: bool,

    /// Domain of the AUR
    #[arg(long, value_name = "DOMAIN", hide = true)]
    domain: Option<String>,

    /// Read configuration from FILE instead of the default location
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log out after uploading, ending the stored session
    #[arg(long)]
    logout: bool,

    /// Be more verbose. Pass twice for debug output.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Source archives to upload
    #[arg(value_name = "TARGETS")]
    targets: Vec<PathBuf>,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let category = match cli.category.as_deref() {
        Some("help") => {
            cli::write_categories(&mut std::io::stdout())?;
            return Ok(ExitCode::SUCCESS);
        }
        Some(name) => match CategoryId::from_name(name) {
            Ok(id) => id,
            Err(e) => {
                eprintln!("error: {}", e);
                cli::write_categories(&mut std::io::stderr())?;
                return Ok(ExitCode::FAILURE);
            }
        },
        None => CategoryId::unspecified(),
    };

    let overrides = SettingsOverrides {
        domain: cli.domain.clone(),
        user: cli.user.clone(),
        password: cli.password.clone(),
        cookies: cli.cookies.clone(),
        persist: cli.keep_cookies.then_some(true),
    };
    let loader = ConfigLoader::new();
    let loaded = match &cli.config {
        Some(path) => loader.load(Some(path.as_path()), overrides),
        None => loader.load_default(overrides),
    };
    let settings = match loaded {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("error: {}", e);
            return Ok(ExitCode::FAILURE);
        }
    };

    init_logging(cli.verbose, &settings.logging.level);

    if cli.targets.is_empty() && !cli.logout {
        eprintln!("error: no targets specified (use -h for help)");
        return Ok(ExitCode::FAILURE);
    }

    let mut client = match Client::from_settings(&settings) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("error: failed to create AUR client: {}", e);
            return Ok(ExitCode::FAILURE);
        }
    };

    let args = UploadArgs {
        targets: cli.targets,
        category,
        logout: cli.logout,
    };
    let status = cli::run_upload(
        &mut client,
        &args,
        &mut prompt_password,
        &mut std::io::stdout(),
        &mut std::io::stderr(),
    )?;

    Ok(ExitCode::from(status))
}

/// `RUST_LOG` wins; otherwise `-v`/`-vv` raise the configured level.
fn init_logging(verbose: u8, configured: &str) {
    let default = match verbose {
        0 => configured,
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn prompt_password(username: &str) -> Option<String> {
    if !std::io::stdin().is_terminal() {
        return None;
    }
    dialoguer::Password::new()
        .with_prompt(format!("[{}] password", username))
        .interact()
        .ok()
}
