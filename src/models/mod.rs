pub mod appointment;
pub mod booking;
pub mod conversation;

pub use appointment::{Appointment, AppointmentStatus};
pub use booking::{BookingDraft, ConfirmedBooking, HalfDay, AFTERNOON_START_HOUR};
pub use conversation::ConversationState;
