pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cityinfo")]
#[command(about = "CityInfo API - cities, points of interest, and the tools to serve them")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, conflicts_with = "json", help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP API (default when no command is given)")]
    Serve(commands::serve::ServeArgs),

    #[command(about = "Mint a bearer token for local testing")]
    Token(commands::token::TokenArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    /// Text unless `--json` is given; `--text` states the default explicitly.
    pub fn from_cli(cli: &Cli) -> Self {
        match (cli.text, cli.json) {
            (false, true) => OutputFormat::Json,
            _ => OutputFormat::Text,
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Some(Commands::Serve(args)) => commands::serve::handle(args).await,
        Some(Commands::Token(args)) => commands::token::handle(args, output_format),
        None => commands::serve::handle(commands::serve::ServeArgs::default()).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format_of(args: &[&str]) -> OutputFormat {
        OutputFormat::from_cli(&Cli::try_parse_from(args).unwrap())
    }

    #[test]
    fn output_format_follows_flags() {
        assert_eq!(format_of(&["cityinfo", "token"]), OutputFormat::Text);
        assert_eq!(format_of(&["cityinfo", "token", "--text"]), OutputFormat::Text);
        assert_eq!(format_of(&["cityinfo", "token", "--json"]), OutputFormat::Json);
        assert_eq!(format_of(&["cityinfo", "--json", "token"]), OutputFormat::Json);
    }

    #[test]
    fn text_and_json_are_exclusive() {
        assert!(Cli::try_parse_from(["cityinfo", "--text", "--json", "token"]).is_err());
    }
}
