//! gamebox: interactive console chatbot for the Gamebox store.
//!
//! Reads user lines from stdin and answers on stdout. Diagnostics go to
//! stderr and are enabled with RUST_LOG (e.g. `RUST_LOG=gamebox_chatbot=debug`).

use clap::Parser;
use gamebox_chatbot::console::StdConsole;
use gamebox_chatbot::{Chatbot, ChatbotError, Cli};
use tracing::{debug, error};

fn main() {
    // Initialize tracing if RUST_LOG is set
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        error!("Error: {}", e);
        eprintln!("gamebox: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), ChatbotError> {
    let cli = Cli::parse();
    if cli.no_color {
        colored::control::set_override(false);
    }

    let config = cli.into_config()?;
    debug!(
        "Data dir: {}, preferences: {}",
        config.data_dir.display(),
        config.preferences_path.display()
    );

    let mut bot = Chatbot::new(config);
    bot.verify()?;

    let mut console = StdConsole::new(bot.config().bot_name.clone(), bot.config().user_label.clone());
    bot.run(&mut console)
}
