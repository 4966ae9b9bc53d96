//! Vacancy intake engine: zone classification, requirement-to-taxonomy matching and
//! point allocation, with a thin axum service on top.

pub mod analysis;
pub mod classification;
pub mod config;
pub mod errors;
pub mod intake;
pub mod llm_client;
pub mod oracle;
pub mod routes;
pub mod state;
pub mod taxonomy;
pub mod vacancy;
