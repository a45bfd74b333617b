use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Editorial review of pediatric clinical case reports.
///
/// Runs the HTTP session server, or analyzes a single case from the
/// terminal and prints the four result tabs.
#[derive(Parser, Debug)]
#[command(name = "pedscribe", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Bind address (overrides PEDSCRIBE_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Listen port (overrides PEDSCRIBE_PORT)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Analyze one case and print the result
    Analyze(AnalyzeArgs),

    /// Print the response schema sent to the AI service
    Schema,
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Manuscript file (.pdf, .txt, .md)
    #[arg(conflicts_with_all = ["text", "example"])]
    pub path: Option<PathBuf>,

    /// Case text given inline
    #[arg(long, conflicts_with = "example")]
    pub text: Option<String>,

    /// Analyze the built-in sample case
    #[arg(long)]
    pub example: bool,

    /// Print the session view as JSON instead of formatted tabs
    #[arg(long)]
    pub json: bool,

    /// API key (overrides GEMINI_API_KEY / API_KEY)
    #[arg(long, env = "PEDSCRIBE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_serve_overrides() {
        let cli = Cli::try_parse_from(["pedscribe", "serve", "--port", "8080"]).unwrap();
        match cli.command {
            Command::Serve { host, port } => {
                assert_eq!(host, None);
                assert_eq!(port, Some(8080));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn analyze_path_and_example_conflict() {
        let err = Cli::try_parse_from(["pedscribe", "analyze", "case.pdf", "--example"]);
        assert!(err.is_err());
    }

    #[test]
    fn parses_inline_text() {
        let cli =
            Cli::try_parse_from(["pedscribe", "analyze", "--text", "Lactante de 3 meses", "--json"])
                .unwrap();
        let Command::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.text.as_deref(), Some("Lactante de 3 meses"));
        assert!(args.json);
        assert!(args.path.is_none());
    }
}
