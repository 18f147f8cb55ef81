//! Wire adapters between the backend's JSON and the canonical models.

pub mod amount;
pub mod datetime;
pub mod envelope;
pub mod fields;
pub mod requests;
pub mod responses;

pub use envelope::{unwrap_object, ListEnvelope};
pub use requests::{LoginBody, RegisterBody, ReservationBody, ReviewBody, ReviewPatchBody};
pub use responses::{
    decode_availability, decode_court, decode_quote, decode_review, decode_user, decode_venue,
    LoginResponse,
};
