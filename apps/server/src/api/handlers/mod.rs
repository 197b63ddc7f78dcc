//! Request handlers for API endpoints
//!
//! Handlers extract the request, call the matching service and shape the
//! response; validation and error mapping live in the services.

pub mod exams;
pub mod health;
pub mod patients;

pub use exams::*;
pub use health::*;
pub use patients::*;
