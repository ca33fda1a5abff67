//! View models decoded from the civic endpoints
//!
//! Fields the backend may omit default instead of failing the decode.

use crate::display::{BillStatus, PollType, ProjectType, VoteChoice};
use crate::tally::VoteTally;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Sejm identifiers arrive as either strings or integers depending on the importer
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(text)) if !text.is_empty() => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}

/// A bill together with citizen and Sejm vote counts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bill {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub number: Option<String>,
    pub status: String,
    pub authors: Option<String>,
    pub submission_date: Option<String>,
    pub source_url: Option<String>,
    pub document_url: Option<String>,
    pub support_votes: u64,
    pub against_votes: u64,
    pub neutral_votes: u64,
    pub total_votes: u64,
    pub support_percentage: Option<f64>,
    pub against_percentage: Option<f64>,
    pub neutral_percentage: Option<f64>,
    pub user_vote: Option<VoteChoice>,
    pub is_featured: bool,
    pub tags_list: Vec<String>,
    pub project_type: Option<String>,
    pub data_source: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub sejm_id: Option<String>,
    pub eli: Option<String>,
    pub passed: Option<bool>,
    pub attachments: Option<Vec<String>>,
    pub attachment_files: Option<Vec<AttachmentFile>>,
    pub voting_date: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub voting_number: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub session_number: Option<String>,
    pub voting_topic: Option<String>,
    pub voting_results: Option<SejmVotingResults>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Bill {
    pub fn status(&self) -> BillStatus {
        BillStatus::parse(&self.status)
    }

    pub fn project_type(&self) -> ProjectType {
        ProjectType::parse(self.project_type.as_deref().unwrap_or_default())
    }

    /// Citizen votes cast on the platform
    pub fn tally(&self) -> VoteTally {
        VoteTally::from_bill(self)
    }

    /// Result of the parliamentary vote, when the bill was voted in the Sejm
    pub fn sejm_tally(&self) -> Option<VoteTally> {
        self.voting_results.as_ref().map(VoteTally::from_sejm)
    }

    /// "Posiedzenie 12, głosowanie 34" style reference, when both numbers are known
    pub fn voting_reference(&self) -> Option<String> {
        match (&self.session_number, &self.voting_number) {
            (Some(session), Some(voting)) => {
                Some(format!("Posiedzenie {}, głosowanie {}", session, voting))
            }
            _ => None,
        }
    }
}

/// Overall Sejm voting result stored with a bill
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SejmVotingResults {
    pub total_voted: u64,
    pub za: u64,
    pub przeciw: u64,
    pub wstrzymali: u64,
    pub nie_glosowalo: u64,
    pub majority_votes: Option<u64>,
    pub majority_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttachmentFile {
    pub name: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub size: Option<u64>,
}

/// Answer of the vote and vote-retraction endpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BillVoteResponse {
    pub message: Option<String>,
    pub bill: Option<Bill>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BillStats {
    pub total_bills: u64,
    pub active_bills: u64,
    pub total_votes: u64,
    pub most_supported_bill: Option<Bill>,
    pub most_controversial_bill: Option<Bill>,
    /// Raw status value to number of active bills
    pub status_distribution: BTreeMap<String, u64>,
    pub recent_bills: Vec<Bill>,
}

/// Changes, risks and benefits of a bill as summarised by the AI service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiAnalysis {
    pub changes: Vec<String>,
    pub risks: Vec<String>,
    pub benefits: Vec<String>,
    pub error: Option<String>,
}

impl AiAnalysis {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.risks.is_empty() && self.benefits.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiAnalysisResponse {
    pub analysis: AiAnalysis,
    pub analysis_date: Option<String>,
    pub bill_id: Option<i64>,
    pub bill_title: Option<String>,
}

/// An opinion poll with per-option results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Poll {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub poll_type: String,
    pub options: Vec<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub is_featured: bool,
    pub total_votes: u64,
    pub unique_voters: u64,
    pub is_ongoing: bool,
    pub is_expired: bool,
    pub results: BTreeMap<String, PollResult>,
    pub tags_list: Vec<String>,
    pub user_vote: Option<String>,
    pub comments_count: u64,
    pub created_at: Option<String>,
}

impl Poll {
    pub fn poll_type(&self) -> PollType {
        PollType::parse(&self.poll_type)
    }

    /// Results in the order the options were defined; missing entries count as zero
    pub fn results_in_order(&self) -> Vec<(&str, PollResult)> {
        self.options
            .iter()
            .map(|option| {
                let result = self.results.get(option).cloned().unwrap_or_default();
                (option.as_str(), result)
            })
            .collect()
    }

    pub fn has_voted(&self) -> bool {
        self.user_vote.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollResult {
    pub votes: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollVoteResponse {
    pub message: Option<String>,
    pub poll: Option<Poll>,
}

/// Counters of the poll statistics endpoint; the backend adds keys freely
pub type PollStats = Map<String, Value>;

/// A comment under a bill
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Comment {
    pub id: i64,
    pub content: String,
    pub user: Option<CommentAuthor>,
    pub user_nickname: Option<String>,
    pub user_avatar: Option<String>,
    pub is_edited: bool,
    pub likes_count: u64,
    pub dislikes_count: u64,
    pub replies_count: u64,
    pub replies: Vec<Comment>,
    pub user_like: Option<Value>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Comment {
    pub fn author_nickname(&self) -> Option<&str> {
        self.user
            .as_ref()
            .map(|user| user.nickname.as_str())
            .or(self.user_nickname.as_deref())
    }

    /// `Some(true)` for a like, `Some(false)` for a dislike
    ///
    /// The backend reports either `"like"`/`"dislike"` or a boolean.
    pub fn liked(&self) -> Option<bool> {
        match self.user_like.as_ref()? {
            Value::Bool(liked) => Some(*liked),
            Value::String(kind) if kind == "like" => Some(true),
            Value::String(kind) if kind == "dislike" => Some(false),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentAuthor {
    pub id: i64,
    pub nickname: String,
}

/// Paging block some list endpoints attach next to `results`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pagination {
    pub count: u64,
    pub page_size: Option<u64>,
    pub num_pages: Option<u64>,
    pub next: Option<String>,
    pub previous: Option<String>,
}

/// A list endpoint answer: either paginated or a bare array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Page<T> {
    Paginated {
        results: Vec<T>,
        #[serde(default)]
        count: Option<u64>,
        #[serde(default)]
        next: Option<String>,
        #[serde(default)]
        previous: Option<String>,
        #[serde(default)]
        pagination: Option<Pagination>,
    },
    List(Vec<T>),
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Page::List(Vec::new())
    }
}

impl<T> Page<T> {
    pub fn items(&self) -> &[T] {
        match self {
            Page::Paginated { results, .. } => results,
            Page::List(items) => items,
        }
    }

    pub fn into_items(self) -> Vec<T> {
        match self {
            Page::Paginated { results, .. } => results,
            Page::List(items) => items,
        }
    }

    /// Total number of records across all pages
    pub fn count(&self) -> u64 {
        match self {
            Page::Paginated {
                results,
                count,
                pagination,
                ..
            } => count
                .or_else(|| pagination.as_ref().map(|p| p.count))
                .unwrap_or(results.len() as u64),
            Page::List(items) => items.len() as u64,
        }
    }

    pub fn has_next(&self) -> bool {
        match self {
            Page::Paginated {
                next, pagination, ..
            } => {
                next.is_some()
                    || pagination
                        .as_ref()
                        .map_or(false, |p| p.next.is_some())
            }
            Page::List(_) => false,
        }
    }

    pub fn has_previous(&self) -> bool {
        match self {
            Page::Paginated {
                previous,
                pagination,
                ..
            } => {
                previous.is_some()
                    || pagination
                        .as_ref()
                        .map_or(false, |p| p.previous.is_some())
            }
            Page::List(_) => false,
        }
    }

    /// 1-based `(first, last)` positions shown on `page` for a page size
    pub fn showing_range(&self, page: u32, page_size: u32) -> Option<(u64, u64)> {
        let shown = self.items().len() as u64;
        if shown == 0 {
            return None;
        }
        let first = u64::from(page.saturating_sub(1)) * u64::from(page_size) + 1;
        Some((first, first + shown - 1))
    }
}
