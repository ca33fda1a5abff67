//! Cached reads and view lifetimes
//!
//! [`QueryClient`] keeps the latest decoded answer of each read under a
//! [`QueryKey`] and hands it out while it is fresh. Mutations invalidate
//! keys by prefix. [`ViewScope`] ties reads to a mounted view so results
//! that arrive after the view moved on are dropped.

mod client;
mod scope;

pub use client::QueryClient;
pub use scope::{InFlight, InFlightGuard, QueryState, ViewScope};

use std::fmt;

/// Ordered segments identifying a cached read, e.g. `["bill", "12"]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// A key with one more segment appended
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }

    pub fn bills(ordering: &str, page: u32) -> Self {
        Self::new(["bills".to_string(), ordering.to_string(), page.to_string()])
    }

    pub fn bill(id: i64) -> Self {
        Self::new(["bill".to_string(), id.to_string()])
    }

    pub fn comments(bill_id: i64) -> Self {
        Self::new(["comments".to_string(), bill_id.to_string()])
    }

    pub fn polls() -> Self {
        Self::new(["polls"])
    }

    pub fn poll(id: i64) -> Self {
        Self::new(["poll".to_string(), id.to_string()])
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for QueryKey {
    fn from(segments: [S; N]) -> Self {
        Self::new(segments)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}
