use crate::display::{PollStatus, PollType};
use crate::models::{Page, Poll, PollStats, PollVoteResponse};
use crate::{CivicError, Result};
use log::debug;
use puls_obywateli_http::ApiClient;
use serde::Serialize;
use serde_json::json;

/// Filters of the poll list
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PollQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poll_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ordering: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl PollQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: &str) -> Self {
        let text = text.trim();
        self.search = (!text.is_empty()).then(|| text.to_string());
        self
    }

    pub fn poll_type(mut self, poll_type: &PollType) -> Self {
        self.poll_type = Some(poll_type.as_str().to_string());
        self
    }

    pub fn status(mut self, status: PollStatus) -> Self {
        self.status = Some(status.as_str());
        self
    }

    pub fn ordering(mut self, ordering: &str) -> Self {
        self.ordering = Some(ordering.to_string());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Client for `/polls/`
#[derive(Debug, Clone)]
pub struct PollsApi {
    api: ApiClient,
}

impl PollsApi {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self, query: &PollQuery) -> Result<Page<Poll>> {
        Ok(self.api.get_with_query("/polls/", query).await?)
    }

    pub async fn get(&self, id: i64) -> Result<Poll> {
        Ok(self.api.get(&format!("/polls/{}/", id)).await?)
    }

    pub async fn featured(&self) -> Result<Page<Poll>> {
        Ok(self.api.get("/polls/featured/").await?)
    }

    pub async fn stats(&self) -> Result<PollStats> {
        Ok(self.api.get("/polls/stats/").await?)
    }

    /// Vote for one of the poll's options
    pub async fn vote(&self, id: i64, option: &str) -> Result<PollVoteResponse> {
        if option.trim().is_empty() {
            return Err(CivicError::InvalidInput("no option selected".to_string()));
        }
        debug!("voting in poll {}", id);
        let body = json!({ "selected_option": option });
        Ok(self.api.post(&format!("/polls/{}/vote/", id), &body).await?)
    }

    pub async fn delete_vote(&self, id: i64) -> Result<PollVoteResponse> {
        debug!("retracting vote in poll {}", id);
        Ok(self.api.delete(&format!("/polls/{}/vote/delete/", id)).await?)
    }
}
