use anyhow::{Context, Result};
use clap::Parser;
use nl2sparql::config::ConfigLoader;
use nl2sparql::strategy::render::to_plain;
use nl2sparql::{logging, FusekiClient, SessionRegistry, SparqlGraphClient};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// SPARQL query endpoint (overrides config file)
    #[arg(long, env = "NL2SPARQL_ENDPOINT")]
    endpoint: Option<String>,

    /// Log level or filter directive (overrides config file)
    #[arg(long)]
    log_level: Option<String>,

    /// Print answers as plain text instead of HTML fragments
    #[arg(long)]
    plain: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args.config.as_ref().map(|p| p.to_string_lossy().into_owned());
    let config = ConfigLoader::new()
        .load_from_file(config_path.as_deref())
        .load_from_env()
        .with_endpoint(args.endpoint.as_deref())
        .with_log_level(args.log_level.as_deref())
        .build()?;

    let _guard = logging::init_logging(&config.logging)?;

    let fuseki = FusekiClient::new(&config.endpoint).context("Failed to create SPARQL client")?;
    info!(endpoint = fuseki.endpoint(), "using SPARQL endpoint");
    let client = Arc::new(SparqlGraphClient::new(fuseki));

    let registry = Arc::new(SessionRegistry::new(
        client,
        config.ontology.default_namespace.clone(),
    ));

    let idle_timeout = i64::try_from(config.session.idle_timeout_seconds)
        .ok()
        .and_then(chrono::Duration::try_seconds)
        .context("session.idle_timeout_seconds is out of range")?;
    let purger = registry.clone();
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(std::time::Duration::from_secs(60));
        loop {
            tick.tick().await;
            purger.purge_idle(idle_timeout).await;
        }
    });

    let session = registry.open().await;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!(error = %e, "failed to read input");
                break;
            }
        };
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if matches!(question, "quit" | "exit") {
            break;
        }

        let reply = registry.submit(&session, question).await;
        let text = if args.plain {
            to_plain(&reply.response)
        } else {
            reply.response
        };
        stdout.write_all(text.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
    }

    registry.close(&session).await;
    info!("goodbye");
    Ok(())
}
