pub mod date;
pub mod phone;
pub mod time;

pub use date::normalize_date;
pub use phone::is_valid_phone;
pub use time::{format_time, normalize_time};
