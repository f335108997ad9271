use clap::{Parser, Subcommand};

use crate::domain::{DeliveryMode, SourceType};

#[derive(Parser)]
#[command(name = "dailypin")]
#[command(about = "Posts a random Pinterest pin or Raindrop.io article to a Telegram chat")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one scheduled delivery
    Run {
        /// Content source: pins or articles (defaults to DAILYPIN_SOURCE, then pins)
        #[arg(short, long)]
        source: Option<SourceType>,

        /// How to deliver: link, photo, list or album
        #[arg(short, long, default_value = "link")]
        mode: DeliveryMode,

        /// Number of items for list and album deliveries
        #[arg(short, long, default_value_t = 1)]
        count: usize,

        /// Schedule expression of the trigger that started this run
        #[arg(long)]
        cron: Option<String>,

        /// Dry run - print the message instead of sending it
        #[arg(long)]
        dry_run: bool,
    },

    /// Show how to trigger a delivery manually
    Hint,
}
