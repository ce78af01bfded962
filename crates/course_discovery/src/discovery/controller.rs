//! Async orchestration around [`CourseDiscoveryState`].
//!
//! Loads are tagged with a generation number; only the newest load may write
//! its result back, so a slow response that lost a race is dropped. The
//! cancellation token represents the lifetime of the owning view: once it is
//! cancelled nothing in flight touches the state again.

use super::client::CourseApi;
use super::error::DiscoveryError;
use super::query::QueryParams;
use super::state::CourseDiscoveryState;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, MutexGuard};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// How a call to [`DiscoveryController::load`] ended.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// Fresh list stored and view re-derived
    Applied { count: usize },
    /// Load failed; error stored, previous list untouched
    Failed(DiscoveryError),
    /// A newer load started meanwhile; result discarded
    Superseded,
    /// View torn down; result discarded
    Cancelled,
}

/// Owns the discovery state and the API it is loaded from.
pub struct DiscoveryController {
    api: Arc<dyn CourseApi>,
    state: Mutex<CourseDiscoveryState>,
    generation: AtomicU64,
    lifetime: CancellationToken,
}

impl DiscoveryController {
    pub fn new(api: Arc<dyn CourseApi>, state: CourseDiscoveryState) -> Self {
        Self {
            api,
            state: Mutex::new(state),
            generation: AtomicU64::new(0),
            lifetime: CancellationToken::new(),
        }
    }

    /// Builds a controller whose state starts from a page address's query.
    pub fn with_query(api: Arc<dyn CourseApi>, page_size: usize, query: QueryParams) -> Self {
        Self::new(api, CourseDiscoveryState::with_query(page_size, query))
    }

    /// Locks the state for reading or filter mutations.
    pub async fn lock(&self) -> MutexGuard<'_, CourseDiscoveryState> {
        self.state.lock().await
    }

    /// Runs `f` against the locked state.
    pub async fn with_state<R>(&self, f: impl FnOnce(&mut CourseDiscoveryState) -> R) -> R {
        let mut guard = self.state.lock().await;
        f(&mut guard)
    }

    /// Discards every in-flight and future load.
    pub fn shutdown(&self) {
        info!("Discovery view shut down, discarding pending loads");
        self.lifetime.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.lifetime.is_cancelled()
    }

    /// Fetches the full course list and stores it if this is still the newest load.
    pub async fn load(&self) -> LoadOutcome {
        if self.lifetime.is_cancelled() {
            return LoadOutcome::Cancelled;
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.lock().await.mark_loading();

        let start = Instant::now();
        debug!(generation, "Starting course load");

        let result = tokio::select! {
            _ = self.lifetime.cancelled() => Err(DiscoveryError::Cancelled),
            result = self.api.fetch_courses() => result,
        };

        let mut state = self.state.lock().await;

        // Checked under the lock so a shutdown or newer load can't slip in between
        if self.lifetime.is_cancelled() {
            debug!(generation, "Dropping load result for closed view");
            return LoadOutcome::Cancelled;
        }
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "Dropping stale load result");
            return LoadOutcome::Superseded;
        }

        match result {
            Ok(courses) => {
                let count = courses.len();
                state.apply_loaded(courses);
                info!(
                    generation,
                    count,
                    matched = state.filtered().len(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Courses loaded"
                );
                LoadOutcome::Applied { count }
            }
            Err(e) => {
                warn!(
                    generation,
                    error = %e,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Course load failed"
                );
                state.apply_load_failure(e.clone());
                LoadOutcome::Failed(e)
            }
        }
    }

    /// Fetches the instructor list for the filter sidebar. A failure keeps the old list.
    pub async fn load_instructors(&self) -> Result<usize, DiscoveryError> {
        let result = tokio::select! {
            _ = self.lifetime.cancelled() => Err(DiscoveryError::Cancelled),
            result = self.api.fetch_instructors() => result,
        };

        match result {
            Ok(instructors) => {
                let mut state = self.state.lock().await;
                // same rule as `load`: a shutdown that won the lock wins
                if self.lifetime.is_cancelled() {
                    debug!("Dropping instructor list for closed view");
                    return Err(DiscoveryError::Cancelled);
                }
                let count = instructors.len();
                state.set_instructors(instructors);
                Ok(count)
            }
            Err(e) => {
                warn!(error = %e, "Failed to load instructors");
                Err(e)
            }
        }
    }

    /// Loads courses and instructors concurrently, as a view does on mount.
    pub async fn mount(&self) -> LoadOutcome {
        let (outcome, _) = futures::join!(self.load(), self.load_instructors());
        outcome
    }
}

impl Drop for DiscoveryController {
    fn drop(&mut self) {
        self.lifetime.cancel();
    }
}
