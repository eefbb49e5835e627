pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "margo",
    about = "Margo pricing engine CLI",
    long_about = "Offline margin simulation, configuration inspection, and approval rule validation.",
    after_help = "Examples:\n  margo simulate --base-cost 100 --offered-price 150 --region cluster_a\n  margo config\n  margo rules --file rules.toml"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Simulate margins for a single line item against the fallback config")]
    Simulate {
        #[arg(long, help = "Unit base cost")]
        base_cost: String,
        #[arg(long, help = "Offered price per unit")]
        offered_price: String,
        #[arg(long, help = "Region cluster (cluster_a|cluster_b)")]
        region: String,
        #[arg(long, default_value_t = 1, help = "Line item quantity")]
        quantity: u32,
        #[arg(long, help = "Apply the customer-segment special discount")]
        special_discount: bool,
    },
    #[command(about = "Inspect effective application configuration values")]
    Config,
    #[command(about = "Parse and validate an approval rule table from a TOML file")]
    Rules {
        #[arg(long, help = "Path to the rule table TOML file")]
        file: std::path::PathBuf,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Simulate { base_cost, offered_price, region, quantity, special_discount } => {
            commands::simulate::run(&base_cost, &offered_price, &region, quantity, special_discount)
        }
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Rules { file } => commands::rules::run(&file),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
