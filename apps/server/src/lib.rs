//! Imaging Records - patient and imaging exam records over HTTP
//!
//! - Paginated patient and exam listings
//! - Ordered field validation with stable error messages
//! - Unique patient documents and exam-to-patient references
//! - PostgreSQL or in-memory storage behind one store trait

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{Error, Result};
pub use state::AppState;
