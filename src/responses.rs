//! JSON bodies returned by ESearch and ESummary with `retmode=json`

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct ESearchResult {
    pub esearchresult: ESearchData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ESearchData {
    /// Set by NCBI on malformed queries, alongside a 200 status
    #[serde(default, rename = "ERROR")]
    pub error: Option<String>,
    #[serde(default)]
    count: Option<String>,
    #[serde(default)]
    pub idlist: Vec<String>,
}

impl ESearchData {
    /// Total hits for the query; NCBI sends the count as a string
    pub fn total_count(&self) -> usize {
        self.count
            .as_deref()
            .and_then(|c| c.trim().parse().ok())
            .unwrap_or(0)
    }
}

/// ESummary returns a JSON object with "result" containing a "uids" array and
/// one object per UID. The per-UID keys are dynamic, so the payload stays a
/// `serde_json::Value` and is read with optional accessors.
#[derive(Debug, Deserialize)]
pub(crate) struct ESummaryResponse {
    #[serde(default)]
    pub result: serde_json::Value,
    #[serde(default)]
    pub error: Option<String>,
}
