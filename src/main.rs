mod ai;
mod app;
mod auth;
mod clipboard;
mod command;
mod config;
mod constants;
mod error;
mod input;
mod persona;
mod types;
mod ui;
mod workspace;

use anyhow::Result;
use std::env;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::ai::{GeminiClient, analyze_channel_profile};
use crate::app::App;
use crate::config::Config;

fn setup_logging() {
    use std::fs::OpenOptions;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tubereply=debug"));

    // Try to create a log file in the config directory
    let log_file = Config::config_dir()
        .ok()
        .filter(|dir| std::fs::create_dir_all(dir).is_ok())
        .map(|dir| dir.join("tubereply.log"))
        .and_then(|path| {
            OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&path)
                .ok()
        });

    if let Some(file) = log_file {
        // Log to file
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::sync::Mutex::new(file))
                    .with_ansi(false),
            )
            .init();
    } else {
        // Fallback to stderr if file logging fails
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn print_usage() {
    eprintln!(
        r#"tubereply - AI replies to YouTube comments in your channel's voice

Usage: tubereply [command]

Commands:
    (none)              Start the TUI
    analyze <channel>   Research a channel (URL, @handle, or name) and print its persona
    help                Show this help message

Environment:
    TUBEREPLY_API_KEY / GEMINI_API_KEY   Gemini API key (required)
    TUBEREPLY_OAUTH_CLIENT_ID            Google OAuth client id (for sign-in)
    TUBEREPLY_OAUTH_CLIENT_SECRET        Google OAuth client secret (optional)

Configuration file: ~/.config/tubereply/config.toml
"#
    );
}

async fn run_analyze(channel: &str) -> Result<()> {
    let config = Config::load()?;
    let Some(api_key) = config.gemini.get_api_key() else {
        anyhow::bail!(
            "No Gemini API key configured. Set TUBEREPLY_API_KEY or add api_key under [gemini] in {}",
            Config::config_path()?.display()
        );
    };

    let client = GeminiClient::new(
        api_key,
        config.gemini.model.clone(),
        config.gemini.base_url.clone(),
    );

    println!("Researching {}...\n", channel);
    let profile =
        analyze_channel_profile(&client, channel, config.gemini.analysis_temperature).await?;

    println!("Name:        {}", profile.name);
    println!("Description: {}", profile.description);
    println!("Keywords:    {}", profile.style_keywords.join(", "));
    println!("Tone:        {}", profile.tone);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        Some("help") | Some("--help") | Some("-h") => {
            print_usage();
            Ok(())
        }
        Some("analyze") => {
            let channel = args[2..].join(" ");
            if channel.trim().is_empty() {
                eprintln!("Missing channel. Example: tubereply analyze @mkbhd");
                std::process::exit(1);
            }
            run_analyze(channel.trim()).await
        }
        Some(cmd) => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            std::process::exit(1);
        }
        None => {
            setup_logging();

            let config = Config::load()?;
            config.ensure_dirs()?;

            // Initialize theme from config
            crate::ui::theme::init_theme(config.ui.theme);

            let mut app = App::new(&config)?;
            app.run().await
        }
    }
}
