pub mod aggregate;
pub mod complaints;
pub mod dates;
pub mod normalize;
pub mod state;
pub mod status;

pub use aggregate::{aggregate_month, recent_activity, status_totals, MonthBucket, MonthKey};
pub use complaints::{summarize_complaints, ComplaintSummary};
pub use normalize::{normalize_all, NormalizedBooking};
pub use state::{DashboardState, DashboardView, LoadOutcome, LoadState, LoadTicket};
pub use status::{CanonicalStatus, StatusTable};
