use crate::display::{BillOrdering, VoteChoice};
use crate::models::{AiAnalysisResponse, Bill, BillStats, BillVoteResponse, Page};
use crate::Result;
use log::debug;
use puls_obywateli_http::ApiClient;
use serde::Serialize;
use serde_json::json;

const BILLS_PATH: &str = "/bills/";

/// Filters of the bill list
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BillQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ordering: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl BillQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ordering(mut self, ordering: BillOrdering) -> Self {
        self.ordering = Some(ordering.as_str());
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Blank search text is dropped
    pub fn search(mut self, text: &str) -> Self {
        let text = text.trim();
        self.search = (!text.is_empty()).then(|| text.to_string());
        self
    }

    pub fn status(mut self, status: &str) -> Self {
        self.status = Some(status.to_string());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Client for `/bills/`
#[derive(Debug, Clone)]
pub struct BillsApi {
    api: ApiClient,
}

impl BillsApi {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self, query: &BillQuery) -> Result<Page<Bill>> {
        Ok(self.api.get_with_query(BILLS_PATH, query).await?)
    }

    pub async fn get(&self, id: i64) -> Result<Bill> {
        Ok(self.api.get(&format!("/bills/{}/", id)).await?)
    }

    pub async fn featured(&self) -> Result<Page<Bill>> {
        Ok(self.api.get("/bills/featured/").await?)
    }

    pub async fn trending(&self) -> Result<Page<Bill>> {
        Ok(self.api.get("/bills/trending/").await?)
    }

    pub async fn stats(&self) -> Result<BillStats> {
        Ok(self.api.get("/bills/stats/").await?)
    }

    /// Cast or change the signed-in user's vote
    pub async fn vote(&self, id: i64, choice: VoteChoice) -> Result<BillVoteResponse> {
        debug!("voting {} on bill {}", choice.as_str(), id);
        let body = json!({ "vote": choice });
        Ok(self.api.post(&format!("/bills/{}/vote/", id), &body).await?)
    }

    /// Retract the signed-in user's vote
    pub async fn delete_vote(&self, id: i64) -> Result<BillVoteResponse> {
        debug!("retracting vote on bill {}", id);
        Ok(self.api.delete(&format!("/bills/{}/vote/delete/", id)).await?)
    }

    pub async fn ai_analysis(&self, id: i64) -> Result<AiAnalysisResponse> {
        Ok(self.api.get(&format!("/bills/{}/ai-analysis/", id)).await?)
    }
}
