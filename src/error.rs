//! Error handling for the PulsObywateli client

use puls_obywateli_auth::{AuthError, StorageError};
use puls_obywateli_civic::CivicError;
use puls_obywateli_http::{ErrorKind, HttpError};
use std::fmt;
use thiserror::Error;

/// Unified error type for the PulsObywateli client
#[derive(Error, Debug)]
pub enum Error {
    /// Transport, status and decode failures of the REST API
    #[error(transparent)]
    Http(#[from] HttpError),

    /// Session and account errors
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Bill, poll and comment errors
    #[error(transparent)]
    Civic(#[from] CivicError),

    /// Token store errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config<T: fmt::Display>(msg: T) -> Self {
        Error::Config(msg.to_string())
    }

    /// The message the server sent with its rejection, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Error::Http(err) => err.server_message(),
            Error::Auth(err) => err.server_message(),
            Error::Civic(err) => err.server_message(),
            _ => None,
        }
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Error::Http(err) => Some(err.kind()),
            Error::Auth(err) => err.kind(),
            Error::Civic(err) => Some(err.kind()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
