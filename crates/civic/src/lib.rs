//! PulsObywateli civic endpoints
//!
//! Typed clients for bills, polls and comments, the models they decode
//! into, and the display taxonomy shared by every view.

mod bills;
mod comments;
pub mod display;
pub mod models;
mod polls;
mod tally;

pub use bills::{BillQuery, BillsApi};
pub use comments::CommentsApi;
pub use display::{
    format_date, format_datetime, BillOrdering, BillStatus, PollStatus, PollType, ProjectType,
    Tone, VoteChoice,
};
pub use models::*;
pub use polls::{PollQuery, PollsApi};
pub use tally::VoteTally;

use puls_obywateli_http::{ErrorKind, HttpError};
use thiserror::Error;

/// Error type for civic endpoint calls
#[derive(Error, Debug)]
pub enum CivicError {
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CivicError {
    pub fn server_message(&self) -> Option<&str> {
        match self {
            CivicError::Http(err) => err.server_message(),
            CivicError::InvalidInput(_) => None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CivicError::Http(err) => err.kind(),
            CivicError::InvalidInput(_) => ErrorKind::Validation,
        }
    }
}

pub type Result<T> = std::result::Result<T, CivicError>;
