use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

mod command;
pub mod core;

use crate::command::batch::{command_batch, BatchParameters};
use crate::command::demo::command_demo;
use crate::command::single::{command_single, SingleParameters};
use crate::core::{Error, Fmt, Verbosity};

#[derive(Parser)]
struct Cli {
    #[clap(long, value_enum, default_value_t = Verbosity::Info, global = true)]
    verbosity: Verbosity,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run a single simulated unit bounded by a timeout")]
    Single(SingleParameters),

    #[command(about = "Run several simulated units against a shared timeout")]
    Batch(BatchParameters),

    #[command(about = "Replay the reference single and batch scenarios")]
    Demo,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let cli = Cli::parse();

    let subscriber = Registry::default().with(Fmt::layer(cli.verbosity));
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("could not install tracing subscriber: {}", e);
    }

    match cli.command {
        Commands::Single(params) => command_single(params).await?,
        Commands::Batch(params) => command_batch(params).await?,
        Commands::Demo => command_demo().await?,
    }

    Ok(())
}
