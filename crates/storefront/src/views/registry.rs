//! Registry of live cart views.
//!
//! Every page load of the cart view mounts a fresh view under a new
//! [`MountId`]. Later requests from that page address the view by id. Views
//! that sit idle past the configured timeout are evicted, which tears them
//! down: in-flight requests for them finish without applying their result.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use moka::policy::EvictionPolicy;
use serde::Deserialize;
use uuid::Uuid;

const MAX_LIVE_VIEWS: u64 = 10_000;

/// Identifier of one mounted view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct MountId(Uuid);

impl MountId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for MountId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Live views keyed by mount id.
///
/// Holds the only long-lived strong reference to each view. Handlers clone
/// the `Arc` out for the duration of a synchronous step and must not hold it
/// across a cart write, otherwise eviction could not tear the view down.
pub struct ViewRegistry<V> {
    views: Cache<MountId, Arc<V>>,
}

impl<V> Clone for ViewRegistry<V> {
    fn clone(&self) -> Self {
        Self {
            views: self.views.clone(),
        }
    }
}

impl<V: Send + Sync + 'static> ViewRegistry<V> {
    /// Create a registry evicting views idle for longer than `idle_timeout`.
    #[must_use]
    pub fn new(idle_timeout: Duration) -> Self {
        Self::with_capacity(idle_timeout, MAX_LIVE_VIEWS)
    }

    /// Create a registry holding at most `capacity` views.
    ///
    /// A new mount is always admitted; past capacity the least recently
    /// used view is torn down to make room.
    #[must_use]
    pub fn with_capacity(idle_timeout: Duration, capacity: u64) -> Self {
        let views = Cache::builder()
            .max_capacity(capacity)
            .eviction_policy(EvictionPolicy::lru())
            .time_to_idle(idle_timeout)
            .eviction_listener(|id: Arc<MountId>, _view, cause| {
                tracing::debug!(mount_id = %id, ?cause, "View unmounted");
            })
            .build();

        Self { views }
    }

    /// Register a view under a fresh id.
    pub async fn mount(&self, view: V) -> (MountId, Arc<V>) {
        let id = MountId::new();
        let view = Arc::new(view);
        self.views.insert(id, Arc::clone(&view)).await;
        tracing::debug!(mount_id = %id, "View mounted");
        (id, view)
    }

    /// Look up a live view. Refreshes its idle timer.
    pub async fn get(&self, id: &MountId) -> Option<Arc<V>> {
        self.views.get(id).await
    }

    /// Tear a view down immediately.
    pub async fn unmount(&self, id: &MountId) {
        self.views.invalidate(id).await;
        self.views.run_pending_tasks().await;
    }
}
