use std::sync::{Arc, Mutex};

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::Connection;

use super::AppointmentRepository;
use crate::db::queries;
use crate::models::{Appointment, AppointmentStatus, ConfirmedBooking};

pub struct SqliteAppointments {
    db: Arc<Mutex<Connection>>,
}

impl SqliteAppointments {
    pub fn new(db: Arc<Mutex<Connection>>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AppointmentRepository for SqliteAppointments {
    async fn save(&self, booking: &ConfirmedBooking, session_id: &str) -> anyhow::Result<Appointment> {
        let appointment = Appointment {
            id: uuid::Uuid::new_v4().to_string(),
            session_id: session_id.to_string(),
            name: booking.name.clone(),
            phone: booking.phone.clone(),
            reason: booking.reason.clone(),
            date: booking.date,
            time: booking.time,
            half_day: booking.half_day,
            status: AppointmentStatus::Confirmed,
            created_at: Utc::now().naive_utc(),
        };

        let db = self.db.lock().unwrap();
        queries::create_appointment(&db, &appointment).context("failed to insert appointment")?;
        Ok(appointment)
    }

    async fn list(
        &self,
        status: Option<AppointmentStatus>,
        limit: i64,
    ) -> anyhow::Result<Vec<Appointment>> {
        let db = self.db.lock().unwrap();
        queries::list_appointments(&db, status, limit)
    }

    async fn get(&self, id: &str) -> anyhow::Result<Option<Appointment>> {
        let db = self.db.lock().unwrap();
        queries::get_appointment_by_id(&db, id)
    }

    async fn update_status(&self, id: &str, status: AppointmentStatus) -> anyhow::Result<bool> {
        let db = self.db.lock().unwrap();
        queries::update_appointment_status(&db, id, status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::HalfDay;
    use chrono::{NaiveDate, NaiveTime};

    fn repo() -> SqliteAppointments {
        let conn = db::init_db(":memory:").unwrap();
        SqliteAppointments::new(Arc::new(Mutex::new(conn)))
    }

    fn booking() -> ConfirmedBooking {
        ConfirmedBooking {
            name: "Ana".to_string(),
            phone: "699123456".to_string(),
            reason: "dolor de muelas".to_string(),
            date_text: "mañana".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            half_day: HalfDay::Morning,
            time_text: "10".to_string(),
            time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_save_then_get() {
        let repo = repo();
        let saved = repo.save(&booking(), "sess-1").await.unwrap();
        assert_eq!(saved.status, AppointmentStatus::Confirmed);

        let loaded = repo.get(&saved.id).await.unwrap().unwrap();
        assert_eq!(loaded.session_id, "sess-1");
        assert_eq!(loaded.reason, "dolor de muelas");
        assert_eq!(loaded.date, NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
    }

    #[tokio::test]
    async fn test_update_status() {
        let repo = repo();
        let saved = repo.save(&booking(), "sess-1").await.unwrap();
        assert!(repo.update_status(&saved.id, AppointmentStatus::Completed).await.unwrap());

        let loaded = repo.get(&saved.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, AppointmentStatus::Completed);
        assert_eq!(repo.list(None, 10).await.unwrap().len(), 1);
    }
}
