use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pedscribe_core::config::CredentialSource;
use pedscribe_ingest::{extract_case_text, DocumentKind, PdfExtractor};
use pedscribe_llm::CaseAnalyzer;
use pedscribe_server::cli::{AnalyzeArgs, Cli, Command};
use pedscribe_server::{build_router, render, AppState};
use pedscribe_session::Session;

fn load_config() -> pedscribe_core::Config {
    pedscribe_core::config::load_dotenv();
    pedscribe_core::Config::from_env()
}

fn build_session(config: &pedscribe_core::Config, api_key: Option<String>) -> Session {
    let mut analyzer = CaseAnalyzer::from_config(&config.llm);
    if let Some(key) = api_key {
        analyzer = analyzer.with_credential(CredentialSource::Fixed(Some(key)));
    }
    Session::new(Arc::new(analyzer), Arc::new(PdfExtractor))
}

async fn serve(
    mut config: pedscribe_core::Config,
    host: Option<String>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    config.log_summary();

    if config.llm.credential().resolve().is_none() {
        tracing::warn!("no API key in GEMINI_API_KEY or API_KEY; analyses will fail until one is set");
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let session = build_session(&config, None);
    let state = Arc::new(AppState { session, config });
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);
    info!("API docs at http://{}/docs", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn analyze(config: pedscribe_core::Config, args: AnalyzeArgs) -> anyhow::Result<ExitCode> {
    let session = build_session(&config, args.api_key);

    if let Some(path) = &args.path {
        let name = path.to_string_lossy();
        let kind = DocumentKind::from_filename(&name)?;
        let bytes = std::fs::read(path).with_context(|| format!("failed to read {name}"))?;
        info!(file = %name, kind = ?kind, size = bytes.len(), "reading manuscript");
        let text = tokio::task::spawn_blocking(move || {
            extract_case_text(&PdfExtractor, &bytes, kind)
        })
        .await??;
        session.set_text(text).await?;
    } else if let Some(text) = args.text {
        session.set_text(text).await?;
    } else if args.example {
        session.load_example().await?;
    } else {
        bail!("nothing to analyze: pass a file path, --text, or --example");
    }

    let view = session.analyze().await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        render::render_view(&mut io::stdout(), &view)?;
    }

    Ok(render::exit_code(&view))
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config();

    match cli.command {
        Command::Serve { host, port } => serve(config, host, port).await?,
        Command::Analyze(args) => return analyze(config, args).await,
        Command::Schema => {
            println!(
                "{}",
                serde_json::to_string_pretty(&pedscribe_llm::response_schema())?
            );
        }
    }

    Ok(ExitCode::SUCCESS)
}
