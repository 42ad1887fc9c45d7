//! Explicit metrics collaborator.
//!
//! Components that want to report counters take an `Arc<Metrics>` at
//! construction time.  Counters are relaxed atomics: they are statistics,
//! not synchronisation.

use std::sync::atomic::{AtomicU64, Ordering};

/// Shared counters for routing and simulation activity.
#[derive(Debug, Default)]
pub struct Metrics {
    routes_computed:    AtomicU64,
    labels_settled:     AtomicU64,
    vehicles_spawned:   AtomicU64,
    vehicles_despawned: AtomicU64,
    crossings_granted:  AtomicU64,
}

/// Plain copy of every counter at one instant.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub routes_computed:    u64,
    pub labels_settled:     u64,
    pub vehicles_spawned:   u64,
    pub vehicles_despawned: u64,
    pub crossings_granted:  u64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record_route(&self, labels_settled: u64) {
        self.routes_computed.fetch_add(1, Ordering::Relaxed);
        self.labels_settled.fetch_add(labels_settled, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_spawn(&self) {
        self.vehicles_spawned.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_despawn(&self) {
        self.vehicles_despawned.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_crossings(&self, n: u64) {
        self.crossings_granted.fetch_add(n, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            routes_computed:    self.routes_computed.load(Ordering::Relaxed),
            labels_settled:     self.labels_settled.load(Ordering::Relaxed),
            vehicles_spawned:   self.vehicles_spawned.load(Ordering::Relaxed),
            vehicles_despawned: self.vehicles_despawned.load(Ordering::Relaxed),
            crossings_granted:  self.crossings_granted.load(Ordering::Relaxed),
        }
    }
}
