//! # Single-Flight Coordination
//!
//! At most one fan-out per quote key per process. Concurrent callers of
//! the same key wait (bounded) for the leader to finish, then re-probe
//! the cache; on timeout they proceed independently rather than queue
//! forever.

use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

/// Outcome of attempting to lead a key.
pub enum Flight {
    /// This caller leads; the guard releases the key on drop.
    Leader(FlightGuard),
    /// Another caller leads; wait on the handle, then re-probe.
    Follower(FollowerHandle),
}

/// Leadership guard. Dropping it wakes all waiting followers and frees
/// the key, including on panic or cancellation paths.
pub struct FlightGuard {
    key: String,
    inflight: Arc<DashMap<String, Arc<Notify>>>,
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        if let Some((_, notify)) = self.inflight.remove(&self.key) {
            notify.notify_waiters();
        }
    }
}

/// Follower side of a flight.
pub struct FollowerHandle {
    notify: Arc<Notify>,
}

impl FollowerHandle {
    /// Waits for the leader to finish, up to `max_wait`.
    ///
    /// Returns true when woken by the leader, false on timeout. Either
    /// way the caller re-probes the cache and may proceed on its own.
    pub async fn wait(&self, max_wait: Duration) -> bool {
        tokio::time::timeout(max_wait, self.notify.notified())
            .await
            .is_ok()
    }
}

/// Per-process single-flight table keyed by cache key.
#[derive(Debug, Default)]
pub struct SingleFlight {
    inflight: Arc<DashMap<String, Arc<Notify>>>,
}

impl SingleFlight {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tries to take leadership of `key`.
    #[must_use]
    pub fn begin(&self, key: &str) -> Flight {
        match self.inflight.entry(key.to_string()) {
            dashmap::mapref::entry::Entry::Occupied(existing) => Flight::Follower(FollowerHandle {
                notify: Arc::clone(existing.get()),
            }),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(Arc::new(Notify::new()));
                Flight::Leader(FlightGuard {
                    key: key.to_string(),
                    inflight: Arc::clone(&self.inflight),
                })
            }
        }
    }

    /// Number of keys currently in flight.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.inflight.len()
    }
}
