#![allow(clippy::print_stdout, clippy::print_stderr)]

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::Commands;
use config::Config;

#[derive(Parser, Debug)]
#[command(name = "tuna", version, about = "Lend and run leveraged liquidity positions on Tuna")]
struct Args {
    #[command(flatten)]
    config: Config,
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let code = usage_exit_code(&err);
            // Help and version go to stdout.
            let _ = err.print();
            std::process::exit(code);
        }
    };
    if let Err(error) = run(args).await {
        eprintln!("Error: {error:#}");
        std::process::exit(1);
    }
}

/// Usage errors exit 1 like runtime errors; `--help` and `--version` exit 0.
fn usage_exit_code(err: &clap::Error) -> i32 {
    if err.use_stderr() {
        1
    } else {
        0
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let output = args.command.run(&args.config).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
