use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConversationState {
    #[default]
    Start,
    AskName,
    AskPhone,
    AskReason,
    AskDate,
    AskHalfDay,
    AskTime,
    Confirmation,
    Confirmed,
    ChangeWhat,
    AskDateEdit,
    AskTimeEdit,
    AskReasonEdit,
}

impl ConversationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationState::Start => "start",
            ConversationState::AskName => "ask_name",
            ConversationState::AskPhone => "ask_phone",
            ConversationState::AskReason => "ask_reason",
            ConversationState::AskDate => "ask_date",
            ConversationState::AskHalfDay => "ask_half_day",
            ConversationState::AskTime => "ask_time",
            ConversationState::Confirmation => "confirmation",
            ConversationState::Confirmed => "confirmed",
            ConversationState::ChangeWhat => "change_what",
            ConversationState::AskDateEdit => "ask_date_edit",
            ConversationState::AskTimeEdit => "ask_time_edit",
            ConversationState::AskReasonEdit => "ask_reason_edit",
        }
    }
}

