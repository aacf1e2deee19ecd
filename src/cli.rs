//! Command-line interface.
//!
//! Two subcommands: `serve` starts the HTTP server, `run` processes a single
//! article from the terminal and prints the result.

use clap::{Parser, Subcommand};

/// link2social — turn articles into social posts and images.
#[derive(Debug, Parser)]
#[command(name = "link2social", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose (debug-level) logging.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the HTTP server.
    Serve {
        /// Address to bind.
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on.
        #[arg(long, default_value_t = 8000)]
        port: u16,
    },

    /// Process one article and print the result.
    Run {
        /// Article URL (requires --scrape for extraction).
        #[arg(long)]
        url: Option<String>,

        /// Pasted article text.
        #[arg(long)]
        text: Option<String>,

        /// Fetch and extract the URL via the provider's web scraping.
        #[arg(long, default_value_t = false)]
        scrape: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_serve_with_defaults() {
        let cli = Cli::parse_from(["link2social", "serve"]);
        match cli.command {
            Command::Serve { host, port } => {
                assert_eq!(host, "0.0.0.0");
                assert_eq!(port, 8000);
            }
            _ => panic!("expected Serve command"),
        }
    }

    #[test]
    fn cli_parses_run_with_url_and_scrape() {
        let cli = Cli::parse_from([
            "link2social",
            "run",
            "--url",
            "https://example.com/a",
            "--scrape",
        ]);
        match cli.command {
            Command::Run { url, text, scrape } => {
                assert_eq!(url.as_deref(), Some("https://example.com/a"));
                assert!(text.is_none());
                assert!(scrape);
            }
            _ => panic!("expected Run command"),
        }
    }

    #[test]
    fn cli_parses_global_verbose() {
        let cli = Cli::parse_from(["link2social", "--verbose", "serve"]);
        assert!(cli.verbose);
    }

    #[test]
    fn cli_verify() {
        Cli::command().debug_assert();
    }
}
