pub mod availability;
pub mod quote;
pub mod reservation;
pub mod review;
pub mod user;
pub mod venue;

pub use availability::{Availability, TimeSlot};
pub use quote::{CachedQuote, Quote, QuoteKey, SlotRequest};
pub use reservation::{CourtRef, Holder, Reservation, ReservationAction, ReservationStatus, VenueRef};
pub use review::{Review, ReviewDraft};
pub use user::{Registration, User};
pub use venue::{Court, Venue, VenuePage, VenueQuery};
