//! EchoLink CLI - place and inspect calls
//!
//! Thin client over the EchoLink REST API.

mod api;
mod config;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::{ColoredString, Colorize};
use dialoguer::{Input, Password};

use api::EchoLinkClient;
use config::Config;

#[derive(Parser)]
#[command(name = "echolink")]
#[command(about = "EchoLink CLI - AI voice calls from the terminal", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store an API key after checking it against the server
    Login {
        /// API key (will prompt if not provided)
        #[arg(short, long)]
        key: Option<String>,
    },

    /// Inspect calls
    Calls {
        #[command(subcommand)]
        action: CallsAction,
    },

    /// Place an outbound call
    Call {
        /// Number to dial (will prompt if not provided)
        #[arg(long)]
        to: Option<String>,
        /// Caller ID, usually your Twilio number (will prompt if not provided)
        #[arg(long)]
        from: Option<String>,
    },

    /// Check the server is up
    Health,

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
enum CallsAction {
    /// List calls
    List {
        /// completed, ongoing, missed or all
        #[arg(short, long)]
        status: Option<String>,
        #[arg(short, long, default_value = "1")]
        page: u32,
        #[arg(short, long, default_value = "10")]
        limit: u32,
    },
    /// Show a single call
    Show {
        /// Call SID
        sid: String,
    },
    /// Print a call's transcript
    Transcript {
        /// Call SID
        sid: String,
    },
    /// List a call's recordings
    Recordings {
        /// Call SID
        sid: String,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Point the CLI at another server
    SetUrl {
        /// Base URL, e.g. https://echolink.shuttle.app
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Login { key } => cmd_login(key).await,
        Commands::Calls { action } => cmd_calls(action).await,
        Commands::Call { to, from } => cmd_call(to, from).await,
        Commands::Health => cmd_health().await,
        Commands::Config { action } => cmd_config(action.unwrap_or(ConfigAction::Show)),
    }
}

fn client(config: &Config) -> EchoLinkClient {
    EchoLinkClient::new(&config.base_url, config.api_key.as_deref())
}

// ============================================
// Command Implementations
// ============================================

async fn cmd_login(key: Option<String>) -> Result<()> {
    let mut config = Config::load()?;

    let api_key = match key {
        Some(k) => k,
        None => Password::new()
            .with_prompt("API Key")
            .interact()
            .context("Failed to read API key")?,
    };

    // Test the key against a protected route
    let client = EchoLinkClient::new(&config.base_url, Some(&api_key));
    print!("Testing connection... ");

    match client.verify_key().await {
        Ok(()) => println!("{}", "OK".green()),
        Err(e) => {
            println!("{}", "Failed".red());
            bail!("Could not authenticate with EchoLink API: {}", e);
        }
    }

    config.set_api_key(api_key);
    config.save()?;

    println!("{} API key saved to {:?}", "✓".green(), Config::config_path()?);
    Ok(())
}

async fn cmd_calls(action: CallsAction) -> Result<()> {
    let config = Config::load()?;
    let client = client(&config);

    match action {
        CallsAction::List { status, page, limit } => {
            let response = client.list_calls(status.as_deref(), page, limit).await?;

            if response.calls.is_empty() {
                println!("No calls found.");
                return Ok(());
            }

            println!(
                "{} (page {}, limit {}, total {})",
                "Calls:".bold(),
                response.pagination.page,
                response.pagination.limit,
                response.pagination.total
            );
            for call in response.calls {
                println!(
                    "  {} {} {} {:>8} {} {}",
                    call.id.dimmed(),
                    call.caller.cyan().bold(),
                    call.phone_number,
                    call.duration,
                    status_badge(&call.status),
                    call.timestamp.dimmed()
                );
            }
        }

        CallsAction::Show { sid } => {
            let call = client.get_call(&sid).await?;

            println!("{}", call.caller.cyan().bold());
            println!("  {:<10} {}", "SID".dimmed(), call.id);
            println!("  {:<10} {}", "Number".dimmed(), call.phone_number);
            println!("  {:<10} {}", "Duration".dimmed(), call.duration);
            println!("  {:<10} {}", "Status".dimmed(), status_badge(&call.status));
            println!("  {:<10} {}", "Direction".dimmed(), call.direction);
            println!("  {:<10} {}", "Started".dimmed(), call.timestamp);
        }

        CallsAction::Transcript { sid } => {
            let entries = client.transcript(&sid).await?;

            if entries.is_empty() {
                println!("No transcript for {}", sid);
                return Ok(());
            }

            for entry in entries {
                let speaker = if entry.speaker == "AI" {
                    entry.speaker.magenta().bold()
                } else {
                    entry.speaker.cyan().bold()
                };
                println!("  {} {:<5} {}", entry.time.dimmed(), speaker, entry.text);
            }
        }

        CallsAction::Recordings { sid } => {
            let recordings = client.recordings(&sid).await?;

            if recordings.is_empty() {
                println!("No recordings for {}", sid);
                return Ok(());
            }

            for recording in recordings {
                println!(
                    "  {} {}m {}s {} {}",
                    recording.sid.dimmed(),
                    recording.duration / 60,
                    recording.duration % 60,
                    recording.url,
                    recording.created_at.dimmed()
                );
            }
        }
    }

    Ok(())
}

async fn cmd_call(to: Option<String>, from: Option<String>) -> Result<()> {
    let config = Config::load()?;

    let to = match to {
        Some(t) => t,
        None => Input::new()
            .with_prompt("Call to")
            .interact_text()
            .context("Failed to read number")?,
    };
    let from = match from {
        Some(f) => f,
        None => Input::new()
            .with_prompt("Call from")
            .interact_text()
            .context("Failed to read number")?,
    };

    let response = client(&config).place_call(&to, &from).await?;
    println!(
        "{} Call {} initiated to {}",
        "✓".green(),
        response.call_sid.cyan(),
        to
    );

    Ok(())
}

async fn cmd_health() -> Result<()> {
    let config = Config::load()?;
    let health = client(&config).health().await?;

    let status = if health.status == "ok" {
        health.status.green()
    } else {
        health.status.yellow()
    };
    println!("{} {} (v{})", status, health.message, health.version);

    Ok(())
}

fn cmd_config(action: ConfigAction) -> Result<()> {
    let mut config = Config::load()?;

    match action {
        ConfigAction::Show => {
            println!("{}", "Configuration:".bold());
            println!("  Path:     {:?}", Config::config_path()?);
            println!("  Base URL: {}", config.base_url);
            println!(
                "  API Key:  {}",
                if config.api_key.is_some() {
                    "****** (set)".green()
                } else {
                    "(not set)".yellow()
                }
            );
        }
        ConfigAction::SetUrl { url } => {
            config.set_base_url(&url);
            config.save()?;
            println!("{} Base URL set to {}", "✓".green(), config.base_url);
        }
    }

    Ok(())
}

fn status_badge(status: &str) -> ColoredString {
    match status {
        "completed" => status.green(),
        "ongoing" => status.yellow(),
        "missed" => status.red(),
        other => other.normal(),
    }
}
