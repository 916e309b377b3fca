//! Latest-wins guard for interactive searches.
//!
//! Every request takes a new generation number before it goes out. When it
//! completes, its result is only reported as current if no newer request
//! has started in the meantime, so a slow response can never overwrite the
//! result of a query the user issued later.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use kafe_core::Venue;

use crate::finder::{CafeFinder, NearbyQuery};

/// Monotonic request number issued by [`SearchSession::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

/// Outcome of a guarded request.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionResult<T> {
    /// No newer request started while this one was in flight.
    Current(T),
    /// A newer request started; the result was discarded.
    Superseded {
        generation: Generation,
        latest: Generation,
    },
}

impl<T> SessionResult<T> {
    #[must_use]
    pub fn into_current(self) -> Option<T> {
        match self {
            SessionResult::Current(value) => Some(value),
            SessionResult::Superseded { .. } => None,
        }
    }

    #[must_use]
    pub fn is_current(&self) -> bool {
        matches!(self, SessionResult::Current(_))
    }
}

pub struct SearchSession {
    finder: Arc<CafeFinder>,
    latest: AtomicU64,
}

impl SearchSession {
    #[must_use]
    pub fn new(finder: Arc<CafeFinder>) -> Self {
        Self {
            finder,
            latest: AtomicU64::new(0),
        }
    }

    /// Starts a new request, superseding every earlier one.
    pub fn begin(&self) -> Generation {
        Generation(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    #[must_use]
    pub fn is_current(&self, generation: Generation) -> bool {
        self.latest.load(Ordering::SeqCst) == generation.0
    }

    fn finish<T>(&self, generation: Generation, value: T) -> SessionResult<T> {
        let latest = Generation(self.latest.load(Ordering::SeqCst));
        if latest == generation {
            SessionResult::Current(value)
        } else {
            tracing::debug!(
                generation = generation.0,
                latest = latest.0,
                "discarding superseded result"
            );
            SessionResult::Superseded { generation, latest }
        }
    }

    /// Guarded [`CafeFinder::fetch_nearby`]. The generation is taken when
    /// this future is first polled; use [`Self::search_at`] when requests
    /// are issued before they are spawned.
    pub async fn search(&self, query: &NearbyQuery) -> SessionResult<Vec<Venue>> {
        let generation = self.begin();
        self.search_at(generation, query).await
    }

    /// Runs a search under a generation already taken from [`Self::begin`].
    pub async fn search_at(
        &self,
        generation: Generation,
        query: &NearbyQuery,
    ) -> SessionResult<Vec<Venue>> {
        let venues = self.finder.fetch_nearby(query).await;
        self.finish(generation, venues)
    }

    /// Guarded [`CafeFinder::resolve_detail`].
    pub async fn resolve(&self, id: &str) -> SessionResult<Option<Venue>> {
        let generation = self.begin();
        self.resolve_at(generation, id).await
    }

    pub async fn resolve_at(&self, generation: Generation, id: &str) -> SessionResult<Option<Venue>> {
        let venue = self.finder.resolve_detail(id).await;
        self.finish(generation, venue)
    }
}
