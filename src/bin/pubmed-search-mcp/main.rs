use anyhow::{Context, Result};
use clap::Parser;
use pubmed_search_mcp::{ClientConfig, EutilsClient, SearchOrchestrator};
use rmcp::{ServiceExt, transport::stdio};
use tracing::info;

mod server;
use server::PubMedSearchServer;

#[derive(Parser)]
#[command(
    name = "pubmed-search-mcp",
    about = "PubMed and PMC search MCP server over stdio",
    disable_version_flag = true
)]
struct Args {
    /// Print version information and exit
    #[arg(short = 'v', long = "version")]
    version: bool,

    /// API key for NCBI E-utilities (raises the rate limit to 10 requests/s)
    #[arg(long, env = "NCBI_API_KEY")]
    api_key: Option<String>,

    /// Contact email sent with NCBI requests
    #[arg(long, env = "NCBI_EMAIL")]
    email: Option<String>,

    /// Override the E-utilities base URL
    #[arg(long, env = "NCBI_BASE_URL")]
    base_url: Option<String>,
}

impl Args {
    fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new();
        if let Some(api_key) = &self.api_key {
            config = config.with_api_key(api_key);
        }
        if let Some(email) = &self.email {
            config = config.with_email(email);
        }
        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url);
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.version {
        println!("pubmed-search-mcp {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // stdout carries JSON-RPC, so logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    info!("Starting PubMed Search MCP Server");

    let client = EutilsClient::with_config(args.client_config())
        .context("failed to build E-utilities client")?;
    let orchestrator = SearchOrchestrator::new(client);

    let service = PubMedSearchServer::new(orchestrator)
        .serve(stdio())
        .await
        .context("failed to start MCP server on stdio")?;
    info!("MCP server initialized, waiting for requests");
    service.waiting().await?;

    Ok(())
}
