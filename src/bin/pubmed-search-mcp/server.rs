//! MCP server wiring for the search tools

use std::sync::Arc;

use pubmed_search_mcp::tools::{self, ToolReply};
use pubmed_search_mcp::{Database, SearchOrchestrator};
use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    schemars, tool, tool_handler, tool_router,
};
use serde::Deserialize;
use serde_json::Value;

/// Search request parameters shared by the PubMed and PMC tools
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchRequest {
    #[schemars(description = "Search query in PubMed syntax (e.g., 'CRISPR[Title] AND 2023[PDAT]')")]
    pub query: String,

    #[schemars(
        description = "Maximum number of results (default: 10; clamped to 1-500 for PubMed, 1-50 for PMC)"
    )]
    pub max_results: Option<Value>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FetchArticleRequest {
    #[schemars(description = "PubMed ID, numeric (e.g., 35504917)")]
    pub pmid: Value,
}

/// PubMed search MCP server
#[derive(Clone)]
pub struct PubMedSearchServer {
    orchestrator: Arc<SearchOrchestrator>,
    tool_router: ToolRouter<Self>,
}

impl PubMedSearchServer {
    pub fn new(orchestrator: SearchOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            tool_router: Self::tool_router(),
        }
    }
}

fn into_call_result(reply: ToolReply) -> CallToolResult {
    match reply {
        ToolReply::Text(text) => CallToolResult::success(vec![Content::text(text)]),
        ToolReply::InvalidInput(text) => CallToolResult::error(vec![Content::text(text)]),
    }
}

#[tool_router]
impl PubMedSearchServer {
    #[tool(
        description = "Search PubMed for biomedical articles. Returns titles, authors, journal, identifiers, an abstract preview and a PubMed link for each hit."
    )]
    async fn search_pubmed(
        &self,
        Parameters(params): Parameters<SearchRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        let reply = tools::search(
            &self.orchestrator,
            Database::PubMed,
            &params.query,
            params.max_results.as_ref(),
        )
        .await;
        Ok(into_call_result(reply))
    }

    #[tool(
        description = "Fetch a single PubMed article by PMID, including its full abstract, keywords and MeSH terms."
    )]
    async fn fetch_article(
        &self,
        Parameters(params): Parameters<FetchArticleRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        let reply = tools::fetch_article(&self.orchestrator, &params.pmid).await;
        Ok(into_call_result(reply))
    }

    #[tool(
        description = "Search PubMed Central for open-access full-text articles. Returns PMC summaries with PMCID, DOI and a PubMed link."
    )]
    async fn search_pmc(
        &self,
        Parameters(params): Parameters<SearchRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        let reply = tools::search(
            &self.orchestrator,
            Database::Pmc,
            &params.query,
            params.max_results.as_ref(),
        )
        .await;
        Ok(into_call_result(reply))
    }

    #[tool(description = "Show usage information for the PubMed search tools.")]
    async fn help(&self) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::text(
            tools::help_text(),
        )]))
    }
}

#[tool_handler]
impl ServerHandler for PubMedSearchServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "pubmed-search-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                description: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "PubMed Search MCP Server - Search PubMed and PubMed Central and fetch article abstracts. Call `help` for usage.".to_string(),
            ),
        }
    }
}
