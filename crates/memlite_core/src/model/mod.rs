//! Value and report types shared by the session and its callers.
//!
//! # Responsibility
//! - Define the scalar variant used for bind parameters and result cells.
//! - Define the status snapshot shape.

pub mod status;
pub mod value;
