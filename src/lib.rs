//! PulsObywateli Rust Client Library
//!
//! A Rust client for the PulsObywateli civic platform: citizen sessions,
//! bills with their Sejm voting results, opinion polls and comments.
//!
//! [`PulsObywateli`] wires one shared [`ApiClient`], the
//! [`SessionManager`], the endpoint clients and a [`QueryClient`] cache,
//! and keeps the cache consistent with the mutations made through it.

pub mod config;
pub mod error;
pub mod query;

use log::debug;
use std::sync::Arc;

pub use puls_obywateli_auth as auth;
pub use puls_obywateli_civic as civic;
pub use puls_obywateli_http as http;

use crate::auth::{
    AccountApi, FileStorage, LogNotifier, MemoryStorage, Navigator, NoopNavigator, Notifier,
    RegisterData, SessionManager, SessionOptions, SessionStatus, TokenStorage, User,
};
use crate::civic::{
    Bill, BillQuery, BillVoteResponse, BillsApi, Comment, CommentsApi, Page, Poll, PollQuery,
    PollVoteResponse, PollsApi, VoteChoice,
};
use crate::config::ClientOptions;
use crate::error::Result;
use crate::http::ApiClient;
use crate::query::{QueryClient, QueryKey, ViewScope};

/// The main entry point for the PulsObywateli client
pub struct PulsObywateli {
    options: ClientOptions,
    api: ApiClient,
    session: Arc<SessionManager>,
    bills: BillsApi,
    polls: PollsApi,
    comments: CommentsApi,
    queries: Arc<QueryClient>,
}

impl PulsObywateli {
    /// Create a client that reports to the log and does not navigate
    ///
    /// # Example
    ///
    /// ```
    /// use puls_obywateli::{PulsObywateli, config::ClientOptions};
    ///
    /// let options = ClientOptions::default().with_origin("http://localhost:8000");
    /// let client = PulsObywateli::new(options).unwrap();
    /// assert!(client.session().is_loading());
    /// ```
    pub fn new(options: ClientOptions) -> Result<Self> {
        Self::with_hooks(options, Arc::new(LogNotifier), Arc::new(NoopNavigator))
    }

    /// Create a client with the view's own notification and navigation hooks
    pub fn with_hooks(
        options: ClientOptions,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let base_url = options.api_base_url()?;
        let api = ApiClient::new(base_url.as_str(), options.http_client()?)?;

        let storage: Arc<dyn TokenStorage> = match &options.storage_dir {
            Some(dir) => Arc::new(FileStorage::new(dir)?),
            None => Arc::new(MemoryStorage::new()),
        };

        let session = SessionManager::new(api.clone(), storage)
            .with_notifier(notifier)
            .with_navigator(navigator)
            .with_options(SessionOptions {
                revoke_on_logout: options.revoke_on_logout,
            });

        debug!("client configured for {}", base_url);
        Ok(Self {
            bills: BillsApi::new(api.clone()),
            polls: PollsApi::new(api.clone()),
            comments: CommentsApi::new(api.clone()),
            queries: Arc::new(QueryClient::new(options.query_stale_time)),
            session: Arc::new(session),
            api,
            options,
        })
    }

    /// Create a client from `PULS_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(ClientOptions::from_env()?)
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    pub fn account(&self) -> AccountApi {
        AccountApi::new(Arc::clone(&self.session))
    }

    pub fn bills(&self) -> &BillsApi {
        &self.bills
    }

    pub fn polls(&self) -> &PollsApi {
        &self.polls
    }

    pub fn comments(&self) -> &CommentsApi {
        &self.comments
    }

    pub fn queries(&self) -> &Arc<QueryClient> {
        &self.queries
    }

    /// A fresh scope for a view that reads through the shared cache
    pub fn view<T>(&self) -> ViewScope<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        ViewScope::new(Arc::clone(&self.queries))
    }

    /// Restore the persisted session; see [`SessionManager::bootstrap`]
    pub async fn bootstrap(&self) -> SessionStatus {
        self.session.bootstrap().await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let user = self.session.login(email, password).await?;
        self.queries.invalidate_all();
        Ok(user)
    }

    pub async fn register(&self, data: &RegisterData) -> Result<User> {
        let user = self.session.register(data).await?;
        self.queries.invalidate_all();
        Ok(user)
    }

    pub async fn logout(&self) {
        self.session.logout().await;
        self.queries.invalidate_all();
    }

    /// One page of the bill list, cached per filter combination
    pub async fn bill_list(&self, query: &BillQuery) -> Result<Page<Bill>> {
        let key = QueryKey::bills(query.ordering.unwrap_or_default(), query.page.unwrap_or(1))
            .child(query.search.clone().unwrap_or_default())
            .child(query.status.clone().unwrap_or_default())
            .child(optional(query.limit));
        Ok(self.queries.fetch(&key, || self.bills.list(query)).await?)
    }

    pub async fn bill(&self, id: i64) -> Result<Bill> {
        Ok(self
            .queries
            .fetch(&QueryKey::bill(id), || self.bills.get(id))
            .await?)
    }

    pub async fn bill_comments(&self, bill_id: i64) -> Result<Page<Comment>> {
        Ok(self
            .queries
            .fetch(&QueryKey::comments(bill_id), || self.comments.for_bill(bill_id))
            .await?)
    }

    pub async fn poll_list(&self, query: &PollQuery) -> Result<Page<Poll>> {
        let key = QueryKey::polls()
            .child(query.status.unwrap_or_default())
            .child(query.poll_type.clone().unwrap_or_default())
            .child(query.search.clone().unwrap_or_default())
            .child(query.ordering.clone().unwrap_or_default())
            .child(optional(query.limit));
        Ok(self.queries.fetch(&key, || self.polls.list(query)).await?)
    }

    pub async fn poll(&self, id: i64) -> Result<Poll> {
        Ok(self
            .queries
            .fetch(&QueryKey::poll(id), || self.polls.get(id))
            .await?)
    }

    pub async fn vote_on_bill(&self, id: i64, choice: VoteChoice) -> Result<BillVoteResponse> {
        let response = self.bills.vote(id, choice).await?;
        self.queries.invalidate(&QueryKey::bill(id));
        Ok(response)
    }

    pub async fn retract_bill_vote(&self, id: i64) -> Result<BillVoteResponse> {
        let response = self.bills.delete_vote(id).await?;
        self.queries.invalidate(&QueryKey::bill(id));
        Ok(response)
    }

    pub async fn add_comment(&self, bill_id: i64, content: &str) -> Result<Comment> {
        let comment = self.comments.add(bill_id, content).await?;
        self.queries.invalidate(&QueryKey::comments(bill_id));
        Ok(comment)
    }

    pub async fn vote_in_poll(&self, id: i64, option: &str) -> Result<PollVoteResponse> {
        let response = self.polls.vote(id, option).await?;
        self.invalidate_poll(id);
        Ok(response)
    }

    pub async fn retract_poll_vote(&self, id: i64) -> Result<PollVoteResponse> {
        let response = self.polls.delete_vote(id).await?;
        self.invalidate_poll(id);
        Ok(response)
    }

    fn invalidate_poll(&self, id: i64) {
        self.queries.invalidate(&QueryKey::poll(id));
        self.queries.invalidate(&QueryKey::polls());
    }
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|value| value.to_string()).unwrap_or_default()
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::auth::{RegisterData, SessionStatus, User, UserPatch};
    pub use crate::civic::{BillOrdering, BillQuery, PollQuery, PollStatus, VoteChoice};
    pub use crate::config::ClientOptions;
    pub use crate::error::{Error, Result};
    pub use crate::query::{QueryKey, ViewScope};
    pub use crate::PulsObywateli;
}
