use crate::models::{Comment, Page};
use crate::{CivicError, Result};
use puls_obywateli_http::ApiClient;
use serde_json::{json, Value};

/// Client for bill comments and their likes
#[derive(Debug, Clone)]
pub struct CommentsApi {
    api: ApiClient,
}

impl CommentsApi {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn for_bill(&self, bill_id: i64) -> Result<Page<Comment>> {
        Ok(self.api.get(&format!("/comments/bills/{}/", bill_id)).await?)
    }

    /// Post a comment; blank content is refused before any request
    pub async fn add(&self, bill_id: i64, content: &str) -> Result<Comment> {
        let content = content.trim();
        if content.is_empty() {
            return Err(CivicError::InvalidInput("comment is empty".to_string()));
        }
        let body = json!({ "content": content });
        Ok(self
            .api
            .post(&format!("/comments/bills/{}/", bill_id), &body)
            .await?)
    }

    pub async fn like(&self, comment_id: i64) -> Result<()> {
        self.react(comment_id, true).await
    }

    pub async fn dislike(&self, comment_id: i64) -> Result<()> {
        self.react(comment_id, false).await
    }

    async fn react(&self, comment_id: i64, is_like: bool) -> Result<()> {
        let body = json!({ "is_like": is_like });
        let _: Value = self
            .api
            .post(&format!("/comments/{}/like/", comment_id), &body)
            .await?;
        Ok(())
    }

    /// Remove the signed-in user's like or dislike
    pub async fn unlike(&self, comment_id: i64) -> Result<()> {
        let _: Value = self
            .api
            .delete(&format!("/comments/{}/like/delete/", comment_id))
            .await?;
        Ok(())
    }
}
