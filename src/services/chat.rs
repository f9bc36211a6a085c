use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::services::conversation::{self, TurnEvent};
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

/// Processes one chat turn for `session_id`.
///
/// A confirmed booking is persisted before the new state is committed: if the
/// write fails the session stays in confirmation and the error is returned.
pub async fn handle_message(
    state: &Arc<AppState>,
    session_id: &str,
    message: &str,
) -> Result<ChatReply, AppError> {
    let handle = state.sessions.get_context(session_id);
    let mut draft = handle.lock().await;

    let turn = conversation::step(&draft, message, state.config.today());

    tracing::info!(
        session_id,
        from = draft.state.as_str(),
        to = turn.draft.state.as_str(),
        "processed turn"
    );

    if let Some(TurnEvent::BookingConfirmed(booking)) = &turn.event {
        let appointment = state
            .appointments
            .save(booking, session_id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, session_id, "failed to persist appointment");
                AppError::Persistence(e.to_string())
            })?;

        tracing::info!(
            session_id,
            appointment_id = %appointment.id,
            date = %appointment.date,
            "appointment booked"
        );
    }

    *draft = turn.draft;

    Ok(ChatReply {
        reply: turn.reply,
        session_id: session_id.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::config::AppConfig;
    use crate::models::{Appointment, AppointmentStatus, ConfirmedBooking, ConversationState};
    use crate::services::appointments::AppointmentRepository;
    use crate::services::session_store::SessionStore;

    struct FlakyRepo {
        fail: bool,
        saves: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl AppointmentRepository for FlakyRepo {
        async fn save(
            &self,
            booking: &ConfirmedBooking,
            session_id: &str,
        ) -> anyhow::Result<Appointment> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("disk full");
            }
            Ok(Appointment {
                id: "appt-1".to_string(),
                session_id: session_id.to_string(),
                name: booking.name.clone(),
                phone: booking.phone.clone(),
                reason: booking.reason.clone(),
                date: booking.date,
                time: booking.time,
                half_day: booking.half_day,
                status: AppointmentStatus::Confirmed,
                created_at: chrono::Utc::now().naive_utc(),
            })
        }

        async fn list(
            &self,
            _status: Option<AppointmentStatus>,
            _limit: i64,
        ) -> anyhow::Result<Vec<Appointment>> {
            Ok(vec![])
        }

        async fn get(&self, _id: &str) -> anyhow::Result<Option<Appointment>> {
            Ok(None)
        }

        async fn update_status(&self, _id: &str, _status: AppointmentStatus) -> anyhow::Result<bool> {
            Ok(false)
        }
    }

    fn test_state(fail: bool) -> (Arc<AppState>, Arc<AtomicUsize>) {
        let saves = Arc::new(AtomicUsize::new(0));
        let state = Arc::new(AppState {
            config: AppConfig {
                port: 3000,
                database_url: ":memory:".to_string(),
                admin_token: "test-token".to_string(),
                timezone: chrono_tz::Europe::Madrid,
                session_ttl_minutes: 30,
            },
            sessions: SessionStore::new(chrono::Duration::minutes(30)),
            appointments: Box::new(FlakyRepo {
                fail,
                saves: Arc::clone(&saves),
            }),
        });
        (state, saves)
    }

    async fn send_all(state: &Arc<AppState>, session_id: &str, messages: &[&str]) -> ChatReply {
        let mut last = None;
        for msg in messages {
            last = Some(handle_message(state, session_id, msg).await.unwrap());
        }
        last.unwrap()
    }

    const TO_CONFIRMATION: &[&str] = &[
        "hola",
        "Ana",
        "699123456",
        "dolor de muelas",
        "mañana",
        "mañana",
        "10",
    ];

    async fn current_state(state: &Arc<AppState>, session_id: &str) -> ConversationState {
        let handle = state.sessions.get_context(session_id);
        let current = handle.lock().await.state;
        current
    }

    #[tokio::test]
    async fn test_confirmation_persists_once() {
        let (state, saves) = test_state(false);
        send_all(&state, "s1", TO_CONFIRMATION).await;
        assert_eq!(saves.load(Ordering::SeqCst), 0);

        let reply = handle_message(&state, "s1", "sí").await.unwrap();
        assert!(reply.reply.contains("Cita confirmada"));
        assert_eq!(reply.session_id, "s1");
        assert_eq!(saves.load(Ordering::SeqCst), 1);
        assert_eq!(current_state(&state, "s1").await, ConversationState::Confirmed);

        // Further messages fall back without persisting again
        handle_message(&state, "s1", "sí").await.unwrap();
        assert_eq!(saves.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_save_keeps_confirmation() {
        let (state, saves) = test_state(true);
        send_all(&state, "s1", TO_CONFIRMATION).await;

        let err = handle_message(&state, "s1", "sí").await.unwrap_err();
        assert!(matches!(err, AppError::Persistence(_)));
        assert_eq!(saves.load(Ordering::SeqCst), 1);

        let handle = state.sessions.get_context("s1");
        let draft = handle.lock().await;
        assert_eq!(draft.state, ConversationState::Confirmation);
        assert_eq!(draft.name.as_deref(), Some("Ana"));
        assert!(draft.time_24h.is_some());
    }

    #[tokio::test]
    async fn test_sessions_do_not_share_drafts() {
        let (state, _) = test_state(false);
        send_all(&state, "a", &["hola", "Ana"]).await;
        send_all(&state, "b", &["hola"]).await;

        assert_eq!(current_state(&state, "a").await, ConversationState::AskPhone);
        assert_eq!(current_state(&state, "b").await, ConversationState::AskName);
    }

    #[tokio::test]
    async fn test_concurrent_turns_same_session_are_serialized() {
        let (state, _) = test_state(false);
        handle_message(&state, "s1", "hola").await.unwrap();

        let a = {
            let state = Arc::clone(&state);
            tokio::spawn(async move { handle_message(&state, "s1", "Ana").await })
        };
        let b = {
            let state = Arc::clone(&state);
            tokio::spawn(async move { handle_message(&state, "s1", "Luis").await })
        };
        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();

        // One turn took the name, the other was judged as a phone number
        let handle = state.sessions.get_context("s1");
        let draft = handle.lock().await;
        assert_eq!(draft.state, ConversationState::AskPhone);
        assert!(draft.phone.is_none());
        assert!(matches!(draft.name.as_deref(), Some("Ana") | Some("Luis")));
    }
}
