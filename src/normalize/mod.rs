//! Reconciles heterogeneous backend reservation records into one model.

pub mod reservation;
pub mod status;

pub use reservation::{dedupe_by_id, normalize_all, normalize_record};
pub use status::normalize_status;
