//! Payment dashboard caching using Moka.
//!
//! Dashboards are cached per academic year and dropped whenever bills are
//! generated or payments are logged, so the next read is recomputed.
//!
//! Every invalidation bumps an epoch. A reader takes the epoch before it
//! queries the database and hands it back on insert; a dashboard computed
//! across an invalidation is returned to its caller but never cached.

use moka::sync::Cache;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tadika_shared::types::AcademicYearId;

use super::types::PaymentDashboard;

/// Default cache capacity (number of academic years).
const DEFAULT_CACHE_CAPACITY: u64 = 16;

/// Cache for payment dashboards.
#[derive(Clone)]
pub struct DashboardCache {
    cache: Cache<AcademicYearId, Arc<PaymentDashboard>>,
    epoch: Arc<AtomicU64>,
}

impl DashboardCache {
    /// Creates a cache whose entries live for `ttl_secs`.
    #[must_use]
    pub fn new(ttl_secs: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(DEFAULT_CACHE_CAPACITY)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self {
            cache,
            epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Current invalidation epoch. Read it before computing a dashboard.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    /// Returns the cached dashboard for a year.
    #[must_use]
    pub fn get(&self, academic_year_id: AcademicYearId) -> Option<Arc<PaymentDashboard>> {
        self.cache.get(&academic_year_id)
    }

    /// Stores a dashboard computed after `epoch` was read and returns the
    /// shared handle.
    ///
    /// Nothing is cached when an invalidation happened in the meantime.
    pub fn insert(&self, epoch: u64, dashboard: PaymentDashboard) -> Arc<PaymentDashboard> {
        let dashboard = Arc::new(dashboard);
        if self.epoch() != epoch {
            return dashboard;
        }

        let year = dashboard.academic_year_id;
        self.cache.insert(year, Arc::clone(&dashboard));

        // An invalidation can land between the check and the insert.
        if self.epoch() != epoch {
            self.cache.invalidate(&year);
        }
        dashboard
    }

    /// Drops every cached dashboard and starts a new epoch.
    pub fn invalidate_all(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.cache.invalidate_all();
    }
}

impl std::fmt::Debug for DashboardCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardCache")
            .field("entries", &self.cache.entry_count())
            .field("epoch", &self.epoch())
            .finish()
    }
}
