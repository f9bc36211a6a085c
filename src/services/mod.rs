pub mod appointments;
pub mod chat;
pub mod conversation;
pub mod normalize;
pub mod session_store;
