use chrono::NaiveDate;

use crate::models::{BookingDraft, ConfirmedBooking, ConversationState, HalfDay};
use crate::services::normalize::{format_time, is_valid_phone, normalize_date, normalize_time};

const MIN_NAME_LEN: usize = 2;
const MIN_REASON_LEN: usize = 3;

const DATE_EXAMPLES: &str = "Indícame una fecha válida 😊\n\n\
     Ejemplos:\n\
     - mañana\n\
     - el viernes\n\
     - 20/01\n\
     - 20 de enero";

const CHANGE_MENU: &str = "1️⃣ Fecha\n2️⃣ Hora\n3️⃣ Motivo";

const CONFIRM_QUESTION: &str = "¿Confirmamos la cita? (**sí / no**)";

pub const FALLBACK_REPLY: &str = "Algo no ha ido bien, vamos a empezar de nuevo 😊";

/// Side effect requested by a turn; performed by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnEvent {
    BookingConfirmed(ConfirmedBooking),
}

/// Result of feeding one message into the machine.
#[derive(Debug, Clone)]
pub struct Turn {
    pub draft: BookingDraft,
    pub reply: String,
    pub event: Option<TurnEvent>,
}

/// Runs one turn. `input` is the raw message; `today` anchors relative dates.
///
/// The passed draft is never mutated: the caller commits `Turn::draft` once any
/// requested event has been handled.
pub fn step(draft: &BookingDraft, input: &str, today: NaiveDate) -> Turn {
    let text = input.trim();
    let mut next = draft.clone();
    let mut event = None;

    let reply = match draft.state {
        ConversationState::Start => {
            next.state = ConversationState::AskName;
            "Hola 😊 ¿Cómo te llamas?".to_string()
        }

        ConversationState::AskName => {
            if text.chars().count() < MIN_NAME_LEN {
                "Necesito tu nombre para continuar 😊".to_string()
            } else {
                next.name = Some(text.to_string());
                next.state = ConversationState::AskPhone;
                format!("Encantado, {text}. ¿Me indicas tu teléfono?")
            }
        }

        ConversationState::AskPhone => {
            if !is_valid_phone(text) {
                "El teléfono debe tener 9 dígitos y empezar por 6 o 9 📞".to_string()
            } else {
                next.phone = Some(text.to_string());
                next.state = ConversationState::AskReason;
                "Perfecto 👍 ¿Cuál es el motivo de la consulta?".to_string()
            }
        }

        ConversationState::AskReason => {
            if text.chars().count() < MIN_REASON_LEN {
                "¿Podrías indicarme brevemente el motivo de la consulta?".to_string()
            } else {
                next.reason = Some(text.to_string());
                next.state = ConversationState::AskDate;
                "Perfecto 😊 ¿Para qué día te gustaría la cita?".to_string()
            }
        }

        ConversationState::AskDate => match normalize_date(text, today) {
            Some(date) => {
                next.date_text = Some(text.to_string());
                next.date_iso = Some(date);
                next.state = ConversationState::AskHalfDay;
                "Genial 😊 ¿Prefieres **por la mañana** o **por la tarde**?".to_string()
            }
            None => DATE_EXAMPLES.to_string(),
        },

        ConversationState::AskHalfDay => match HalfDay::parse(&text.to_lowercase()) {
            Some(half_day) => {
                next.half_day = Some(half_day);
                next.state = ConversationState::AskTime;
                format!(
                    "Perfecto 👍 Por la **{}**.\n\n⏰ ¿A qué **hora** te vendría bien?",
                    half_day.as_str()
                )
            }
            None => "Por favor, elige una opción válida 👇\n\n🟢 **mañana**\n🟣 **tarde**".to_string(),
        },

        ConversationState::AskTime => match normalize_time(text) {
            None => "Indícame una **hora válida** ⏰\n\n\
                     Ejemplos:\n\
                     • 10\n\
                     • 10:30\n\
                     • 17:15"
                .to_string(),
            Some(time) => match draft.half_day {
                Some(half_day) if !half_day.contains(&time) => match half_day {
                    HalfDay::Morning => {
                        "Esa hora parece de **tarde** 😊 Elige una hora de mañana.".to_string()
                    }
                    HalfDay::Afternoon => {
                        "Esa hora parece de **mañana** 😊 Elige una hora de tarde.".to_string()
                    }
                },
                Some(_) => {
                    next.time_text = Some(text.to_string());
                    next.time_24h = Some(time);
                    next.state = ConversationState::Confirmation;
                    format!(
                        "Perfecto 👍 Aquí tienes el resumen de tu cita:\n\n{}\n\n{CONFIRM_QUESTION}",
                        summary(&next)
                    )
                }
                // Half-day is always chosen before AskTime; a draft without it is corrupt.
                None => FALLBACK_REPLY.to_string(),
            },
        },

        ConversationState::Confirmation => match text.to_lowercase().as_str() {
            "sí" | "si" | "s" => match draft.to_confirmed() {
                Some(booking) => {
                    next.state = ConversationState::Confirmed;
                    event = Some(TurnEvent::BookingConfirmed(booking));
                    "✅ **Cita confirmada**\n\n\
                     Gracias 😊 Hemos registrado tu solicitud y en breve nos pondremos en \
                     contacto contigo para confirmar la disponibilidad.\n\n\
                     ¡Que tengas un buen día!"
                        .to_string()
                }
                None => FALLBACK_REPLY.to_string(),
            },
            "no" | "n" => {
                next.state = ConversationState::ChangeWhat;
                format!(
                    "De acuerdo 👍 ¿Qué te gustaría cambiar?\n\n{CHANGE_MENU}\n\n\
                     Escribe el número de la opción."
                )
            }
            _ => "Respóndeme solo con **sí** o **no** 😊".to_string(),
        },

        ConversationState::ChangeWhat => match text {
            "1" => {
                next.state = ConversationState::AskDateEdit;
                "📅 De acuerdo. ¿Para qué fecha te vendría mejor la cita?".to_string()
            }
            "2" => {
                next.state = ConversationState::AskTimeEdit;
                "⏰ Perfecto. ¿Qué hora prefieres?".to_string()
            }
            "3" => {
                next.state = ConversationState::AskReasonEdit;
                "📝 Entendido. ¿Cuál sería ahora el motivo de la consulta?".to_string()
            }
            _ => format!("Por favor, elige una opción válida:\n\n{CHANGE_MENU}"),
        },

        ConversationState::AskDateEdit => match normalize_date(text, today) {
            Some(date) => {
                next.date_text = Some(text.to_string());
                next.date_iso = Some(date);
                next.state = ConversationState::Confirmation;
                updated_summary("la **fecha**", &next)
            }
            None => DATE_EXAMPLES.to_string(),
        },

        ConversationState::AskTimeEdit => match normalize_time(text) {
            Some(time) => {
                next.time_text = Some(text.to_string());
                next.time_24h = Some(time);
                next.state = ConversationState::Confirmation;
                updated_summary("la **hora**", &next)
            }
            None => "Indícame una hora válida ⏰ (por ejemplo 10 o 10:30)".to_string(),
        },

        ConversationState::AskReasonEdit => {
            if text.chars().count() < MIN_REASON_LEN {
                "Indícame un motivo válido, por favor 😊".to_string()
            } else {
                next.reason = Some(text.to_string());
                next.state = ConversationState::Confirmation;
                updated_summary("el **motivo**", &next)
            }
        }

        ConversationState::Confirmed => FALLBACK_REPLY.to_string(),
    };

    Turn {
        draft: next,
        reply,
        event,
    }
}

/// Newline separated `label: value` lines for every collected field.
pub fn summary(draft: &BookingDraft) -> String {
    let field = |v: &Option<String>| v.clone().unwrap_or_default();
    let date_iso = draft
        .date_iso
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    let time_24h = draft.time_24h.as_ref().map(format_time).unwrap_or_default();

    format!(
        "👤 Nombre: {}\n\
         📞 Teléfono: {}\n\
         📝 Motivo: {}\n\
         📅 Fecha: {} ({})\n\
         🕒 Hora: {} ({})",
        field(&draft.name),
        field(&draft.phone),
        field(&draft.reason),
        field(&draft.date_text),
        date_iso,
        field(&draft.time_text),
        time_24h,
    )
}

fn updated_summary(what: &str, draft: &BookingDraft) -> String {
    format!(
        "Perfecto 👍 He actualizado {what}.\n\n📋 **Resumen de tu cita:**\n{}\n\n{CONFIRM_QUESTION}",
        summary(draft)
    )
}
