//! Wire schema for the prediction API
//!
//! This module defines the survey request accepted by the service, its shape
//! validation, and the error payload returned when a prediction cannot be made.

mod response;
mod survey;

pub use response::*;
pub use survey::*;
