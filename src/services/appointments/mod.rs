pub mod sqlite;

use async_trait::async_trait;

use crate::models::{Appointment, AppointmentStatus, ConfirmedBooking};

/// Storage for confirmed bookings and the read side that reports on them.
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn save(&self, booking: &ConfirmedBooking, session_id: &str) -> anyhow::Result<Appointment>;

    /// Newest first.
    async fn list(
        &self,
        status: Option<AppointmentStatus>,
        limit: i64,
    ) -> anyhow::Result<Vec<Appointment>>;

    async fn get(&self, id: &str) -> anyhow::Result<Option<Appointment>>;

    async fn update_status(&self, id: &str, status: AppointmentStatus) -> anyhow::Result<bool>;
}
