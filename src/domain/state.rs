// src/domain/state.rs
//
// Dashboard state container.
//
//   idle ──begin_load──▶ loading ──finish_load──▶ loaded | failed
//                           ▲                          │
//                           └──────begin_load──────────┘
//
// Only one load runs at a time; `begin_load` while loading hands out nothing.
// Selecting a month recomputes the snapshot from the cached bookings and
// never refetches. Consumers only ever see `Arc<DashboardView>` snapshots.

use crate::bookings::BookingRecord;
use crate::domain::aggregate::{
    aggregate_month, recent_activity, status_totals, ActivityEntry, MonthKey, StatusCounts,
};
use crate::domain::complaints::ComplaintSummary;
use crate::domain::normalize::{normalize_all, NormalizedBooking};
use crate::domain::status::StatusTable;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// Identifies one load. Completing a load with an outdated ticket is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

pub enum LoadOutcome {
    Loaded {
        records: Vec<BookingRecord>,
        complaints: ComplaintSummary,
    },
    Failed {
        reason: String,
    },
}

/// Immutable view model handed to templates and the JSON endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub year: i32,
    pub month: u32,
    pub month_name: &'static str,
    pub load_state: LoadState,
    pub total_this_month: usize,
    pub counts: StatusCounts,
    pub all_time: StatusCounts,
    pub recent: Vec<ActivityEntry>,
    pub complaints: ComplaintSummary,
    pub error: Option<String>,
}

pub struct DashboardState {
    table: StatusTable,
    recent_limit: usize,
    load_state: LoadState,
    generation: u64,
    closed: bool,
    bookings: Vec<NormalizedBooking>,
    complaints: ComplaintSummary,
    error: Option<String>,
    selected: MonthKey,
    snapshot: Arc<DashboardView>,
}

impl DashboardState {
    pub fn new(table: StatusTable, recent_limit: usize, selected: MonthKey) -> Self {
        let mut state = Self {
            table,
            recent_limit,
            load_state: LoadState::Idle,
            generation: 0,
            closed: false,
            bookings: Vec::new(),
            complaints: ComplaintSummary::default(),
            error: None,
            selected,
            snapshot: Arc::new(empty_view(selected)),
        };
        state.recompute();
        state
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    pub fn selected_month(&self) -> MonthKey {
        self.selected
    }

    pub fn snapshot(&self) -> Arc<DashboardView> {
        Arc::clone(&self.snapshot)
    }

    /// Start a new load. `None` while another load is in flight or after
    /// the dashboard was closed.
    pub fn begin_load(&mut self) -> Option<LoadTicket> {
        if self.closed || self.load_state == LoadState::Loading {
            return None;
        }
        self.generation += 1;
        self.load_state = LoadState::Loading;
        self.recompute();
        Some(LoadTicket(self.generation))
    }

    /// Apply a load result. Returns `false` when the result was discarded
    /// because the ticket is outdated or the dashboard was closed.
    pub fn finish_load(&mut self, ticket: LoadTicket, outcome: LoadOutcome) -> bool {
        if self.closed || ticket.0 != self.generation {
            return false;
        }

        match outcome {
            LoadOutcome::Loaded {
                records,
                complaints,
            } => {
                self.bookings = normalize_all(&records, &self.table);
                self.complaints = complaints;
                self.error = None;
                self.load_state = LoadState::Loaded;
            }
            LoadOutcome::Failed { reason } => {
                // Failure means no data, never a partial history.
                self.bookings.clear();
                self.complaints = ComplaintSummary::default();
                self.error = Some(reason);
                self.load_state = LoadState::Failed;
            }
        }

        self.recompute();
        true
    }

    pub fn select_month(&mut self, month: MonthKey) {
        if month != self.selected {
            self.selected = month;
            self.recompute();
        }
    }

    /// Tear the dashboard down; pending loads will be dropped on arrival.
    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn recompute(&mut self) {
        let bucket = aggregate_month(&self.bookings, self.selected);

        self.snapshot = Arc::new(DashboardView {
            year: self.selected.year,
            month: self.selected.month0,
            month_name: self.selected.name(),
            load_state: self.load_state,
            total_this_month: bucket.total,
            counts: bucket.counts,
            all_time: status_totals(&self.bookings),
            recent: recent_activity(&self.bookings, self.recent_limit),
            complaints: self.complaints,
            error: self.error.clone(),
        });
    }
}

fn empty_view(month: MonthKey) -> DashboardView {
    DashboardView {
        year: month.year,
        month: month.month0,
        month_name: month.name(),
        load_state: LoadState::Idle,
        total_this_month: 0,
        counts: StatusCounts::default(),
        all_time: StatusCounts::default(),
        recent: Vec::new(),
        complaints: ComplaintSummary::default(),
        error: None,
    }
}
