// ABOUTME: Fetch-on-mount view state shared by the profile, public profile and task screens
// Loading -> Ready | Failed, with tickets so late or superseded responses are dropped

use crate::api::ApiError;
use crate::session::SessionStore;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Loading,
    Ready(T),
    Failed(ApiError),
}

/// Identifies one fetch: which key it was for, which request it was and
/// which session it was made under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket<K> {
    pub key: K,
    seq: u64,
    epoch: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// The view now shows the result
    Applied,
    /// The result belonged to an old mount, key or session and was dropped
    Stale,
    /// The backend rejected the session; data was dropped
    RedirectToLogin,
}

#[derive(Debug, Clone)]
pub struct ResourceView<K, T> {
    key: Option<K>,
    state: ViewState<T>,
    seq: u64,
    protected: bool,
}

impl<K: Clone + PartialEq, T> ResourceView<K, T> {
    /// A view whose data requires a signed-in session
    pub const fn protected() -> Self {
        Self {
            key: None,
            state: ViewState::Loading,
            seq: 0,
            protected: true,
        }
    }

    pub const fn public() -> Self {
        Self {
            key: None,
            state: ViewState::Loading,
            seq: 0,
            protected: false,
        }
    }

    pub const fn state(&self) -> &ViewState<T> {
        &self.state
    }

    pub const fn data(&self) -> Option<&T> {
        match &self.state {
            ViewState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub const fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    pub const fn is_mounted(&self) -> bool {
        self.key.is_some()
    }

    pub const fn is_loading(&self) -> bool {
        matches!(self.state, ViewState::Loading)
    }

    /// Show the view for `key`. A fetch ticket is returned only when the view
    /// was not already mounted for that key.
    pub fn mount(&mut self, key: K, session: &SessionStore) -> Option<FetchTicket<K>> {
        if self.key.as_ref() == Some(&key) {
            return None;
        }
        self.key = Some(key);
        self.issue(session)
    }

    /// Re-fetch the current key
    pub fn refresh(&mut self, session: &SessionStore) -> Option<FetchTicket<K>> {
        self.issue(session)
    }

    /// Leave the view; outstanding results are ignored and data is dropped
    pub fn unmount(&mut self) {
        self.key = None;
        self.state = ViewState::Loading;
        self.seq += 1;
    }

    fn issue(&mut self, session: &SessionStore) -> Option<FetchTicket<K>> {
        let key = self.key.clone()?;
        self.seq += 1;
        self.state = ViewState::Loading;
        Some(FetchTicket {
            key,
            seq: self.seq,
            epoch: session.epoch(),
        })
    }

    pub fn resolve(
        &mut self,
        ticket: &FetchTicket<K>,
        result: Result<T, ApiError>,
        session: &SessionStore,
    ) -> ResolveOutcome {
        if ticket.seq != self.seq || self.key.as_ref() != Some(&ticket.key) {
            debug!("Dropping superseded resource result (seq {})", ticket.seq);
            return ResolveOutcome::Stale;
        }

        // The gateway has already cleared the session by the time this arrives
        if matches!(result, Err(ApiError::Unauthenticated)) {
            self.unmount();
            return ResolveOutcome::RedirectToLogin;
        }

        if self.protected && !(session.is_authenticated() && session.epoch() == ticket.epoch) {
            debug!("Dropping resource result fetched under a previous session");
            return ResolveOutcome::Stale;
        }

        self.state = match result {
            Ok(data) => ViewState::Ready(data),
            Err(e) => ViewState::Failed(e),
        };
        ResolveOutcome::Applied
    }
}
