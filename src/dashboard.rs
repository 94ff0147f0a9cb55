// dashboard.rs
use crate::bookings::{ApiClient, BookingFetcher, FetchError};
use crate::config::Config;
use crate::domain::{
    ComplaintSummary, DashboardState, DashboardView, LoadOutcome, LoadTicket, MonthKey,
};
use crate::errors::ServerError;
use chrono::{Datelike, Utc};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::thread::JoinHandle;
use tracing::{debug, info, warn};

/// Where a dashboard load gets its data from.
pub trait DataSource: Send + Sync {
    fn load(&self) -> LoadOutcome;
}

/// Live source: the paginated bookings endpoint plus the complaints list.
pub struct ApiSource {
    fetcher: BookingFetcher<ApiClient>,
}

impl ApiSource {
    pub fn new(client: ApiClient, page_size: u32, max_pages: u32) -> Self {
        Self {
            fetcher: BookingFetcher::new(client, page_size, max_pages),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        let client = ApiClient::new(
            config.api_base.clone(),
            config.api_token.clone(),
            config.http_timeout,
        )?;
        Ok(Self::new(client, config.page_size, config.max_pages))
    }
}

impl DataSource for ApiSource {
    fn load(&self) -> LoadOutcome {
        let records = match self.fetcher.fetch_all() {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "bookings unavailable, dashboard will show zeroes");
                return LoadOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        };

        // Complaints are secondary; losing them does not fail the load.
        let complaints = self.fetcher.source().fetch_complaints().unwrap_or_else(|e| {
            warn!(error = %e, "complaints unavailable");
            ComplaintSummary::default()
        });

        LoadOutcome::Loaded {
            records,
            complaints,
        }
    }
}

/// Shared handle over one dashboard session.
#[derive(Clone)]
pub struct Dashboard {
    state: Arc<RwLock<DashboardState>>,
    source: Arc<dyn DataSource>,
}

impl Dashboard {
    pub fn new(state: DashboardState, source: Arc<dyn DataSource>) -> Self {
        Self {
            state: Arc::new(RwLock::new(state)),
            source,
        }
    }

    pub fn snapshot(&self) -> Arc<DashboardView> {
        self.read().snapshot()
    }

    /// Select a month (0–11) of the current year.
    pub fn select_month(&self, month0: u32) -> Result<Arc<DashboardView>, ServerError> {
        let month = MonthKey::new(Utc::now().year(), month0)
            .ok_or_else(|| ServerError::BadRequest(format!("month must be 0-11, got {month0}")))?;

        let mut state = self.write();
        state.select_month(month);
        Ok(state.snapshot())
    }

    /// Load on the calling thread. Returns whether the result was applied;
    /// `false` without loading when another load is already running.
    pub fn refresh_blocking(&self) -> bool {
        match self.begin_load() {
            Some(ticket) => self.run_load(ticket),
            None => false,
        }
    }

    /// Load on a background thread. `None` when a load is already running;
    /// that load's result serves this request too.
    pub fn spawn_refresh(&self) -> Option<JoinHandle<bool>> {
        let ticket = self.begin_load()?;
        let dashboard = self.clone();
        Some(std::thread::spawn(move || dashboard.run_load(ticket)))
    }

    fn begin_load(&self) -> Option<LoadTicket> {
        let ticket = self.write().begin_load();
        if ticket.is_none() {
            debug!("dashboard load already in flight");
        }
        ticket
    }

    fn run_load(&self, ticket: LoadTicket) -> bool {
        // The lock is not held while the source does network I/O.
        let outcome = self.source.load();
        let applied = self.write().finish_load(ticket, outcome);

        if !applied {
            info!("discarded stale dashboard load");
        }
        applied
    }

    pub fn close(&self) {
        self.write().close();
    }

    // Poisoning is ignored: every mutation ends by swapping in a whole snapshot.
    fn read(&self) -> RwLockReadGuard<'_, DashboardState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, DashboardState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
