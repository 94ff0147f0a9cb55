pub mod bookings;
pub mod config;
pub mod dashboard;
pub mod domain;
pub mod errors;
pub mod responses;
pub mod router;
pub mod templates;

#[cfg(test)]
mod tests;
