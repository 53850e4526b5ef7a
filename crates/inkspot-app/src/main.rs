//! Ink Spot application binary - composition root.
//!
//! 1. Parse the command line and load configuration from TOML
//! 2. Initialize tracing (RUST_LOG > --log-level > config)
//! 3. Run the chosen front end: terminal chat, one-shot answer, or the
//!    mock backend's HTTP server

mod cli;
mod repl;

use clap::Parser;

use inkspot_api::routes;
use inkspot_api::state::AppState;
use inkspot_chat::render::render_plain;
use inkspot_chat::{Matcher, Message, SessionController};
use inkspot_core::config::InkspotConfig;

use cli::{CliArgs, Command};

fn init_tracing(default_level: &str) {
    // Logs go to stderr so they never interleave with chat output on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let mut config = InkspotConfig::load_or_default(&config_file);

    // Tracing.
    init_tracing(&args.resolve_log_level(&config.general.log_level));
    tracing::info!(
        path = %config_file.display(),
        "Starting Ink Spot v{}",
        env!("CARGO_PKG_VERSION")
    );

    match &args.command {
        Command::Chat => {
            let matcher = Matcher::notary()?;
            let session = SessionController::from_config(matcher, &config.chat)?;
            repl::run(session).await?;
        }
        Command::Ask { message } => {
            let matcher = Matcher::notary()?;
            let question = Message::user(message.join(" "));
            let reply = matcher.reply_for(&question.text);
            println!("{}", render_plain(&Message::bot_reply(reply, question.id)));
        }
        Command::Serve { no_latency, .. } => {
            config.api.port = args.command.resolve_port(config.api.port);
            if *no_latency {
                config.api.simulate_latency = false;
            }
            let state = AppState::from_config(&config.api);

            tokio::select! {
                result = routes::start_server(&config.api, state) => result?,
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Shutdown signal received");
                }
            }
        }
    }

    Ok(())
}
