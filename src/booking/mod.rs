//! The quote-then-book workflow.
//!
//! [`QuoteRequester`] prices a slot and caches its total; [`ReservationSubmitter`]
//! books either a quoted slot or a slot directly.

pub mod cache;
pub mod requester;
pub mod submitter;

pub use cache::QuoteCache;
pub use requester::QuoteRequester;
pub use submitter::{NextStep, ReservationSubmitter, ReviewHandoff, Submission};
