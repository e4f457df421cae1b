//! helpdesk-bot CLI: run the relay, inspect topic bindings. Config from env and optional CLI args.

use anyhow::Result;
use clap::Parser;
use helpdesk_bot::{load_config, print_topics, run_bot, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token } => {
            let config = load_config(token)?;
            run_bot(config).await
        }
        Commands::Topics { user_id } => print_topics(user_id).await,
    }
}
