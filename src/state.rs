use crate::config::AppConfig;
use crate::services::appointments::AppointmentRepository;
use crate::services::session_store::SessionStore;

pub struct AppState {
    pub config: AppConfig,
    pub sessions: SessionStore,
    pub appointments: Box<dyn AppointmentRepository>,
}
