//! Jenga - a Matrix bot that plays Jenga through chat commands.
//!
//! Players type a bang command at the start of a message; the bot answers in the
//! room with what happened to the tower, addressed to the player:
//!
//! - `!startjenga` - Start a game
//! - `!pullblock` - Pull a block
//! - `!placeblock` - Place a block
//! - `!resetjenga` - Reset game
//!
//! The same actions are available as `/jenga start|pull|place|reset`.
//!
//! # Configuration
//!
//! ```yaml
//! matrix:
//!   user_id: "@jenga:matrix.org"
//!   password: "your-password"
//!   room_id: "!game:matrix.org"
//!
//! game:
//!   levels: 18
//! ```
//!
//! Any value can be overridden with a `JENGA_` environment variable, e.g.
//! `JENGA_MATRIX__PASSWORD`.
//!
//! # Usage
//!
//! ```bash
//! RUST_LOG=debug jenga --config config.yaml --data ./jenga-data
//! ```
//!
//! # Architecture
//!
//! - [`commands`] - bang command table, scanner, dispatcher and `/jenga` registration
//! - [`game`] - the tower and the game rules
//! - [`host`] - the chat host seams the bot is written against
//! - [`extension`] - plugs the game into a host
//! - [`matrix`] - Matrix implementation of the host
//! - [`bot`] - wiring and main loop

use clap::Parser;
use env_logger::Env;
use log::{error, info};

use crate::{bot::Bot, config::Config};

mod bot;
mod commands;
mod config;
mod extension;
mod game;
mod host;
mod matrix;
mod utils;

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long)]
    config: String,

    /// Directory for persistent data (Matrix session and state store)
    #[arg(short, long)]
    data: String,
}

#[tokio::main]
async fn main() {
    // Put logger at info level by default
    let env = Env::default().filter_or("RUST_LOG", "info");
    env_logger::init_from_env(env);

    info!("Starting jenga {}...", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let config = match Config::load(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load config file: {}", e);
            return;
        }
    };

    let bot = match Bot::new(config, &args.data).await {
        Ok(b) => b,
        Err(e) => {
            error!("Failed to initialize bot: {:?}", e);
            return;
        }
    };

    if let Err(e) = bot.start().await {
        error!("Bot stopped: {:?}", e);
    }
}
