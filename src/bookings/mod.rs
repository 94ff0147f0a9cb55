mod client;
mod fetch_error;
mod fetcher;
mod models;

pub use client::{parse_complaints, ApiClient};
pub use fetch_error::FetchError;
pub use fetcher::{BookingFetcher, Page, PageSource};
pub use models::BookingRecord;
