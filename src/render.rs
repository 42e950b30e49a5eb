//! Default chat texts for outbound actions
//!
//! Bridges are free to ignore this and render from the structured action.
//! Texts use Telegram-style HTML with `tg://user` mentions. Every mention in
//! an action names the user who caused it, so one display name per event is
//! enough; any other user is shown by id.

use crate::protocol::{
    OutboundAction, RejectReason, CALLBACK_CHANGE_WORD, CALLBACK_PASS_TURN, CALLBACK_SHOW_WORD,
};
use crate::types::UserId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Button {
    pub label: String,
    pub data: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Rendered {
    /// None for pure retractions
    pub text: Option<String>,
    /// One button per row
    pub buttons: Vec<Button>,
    /// Show only to the acting user (alert / ephemeral reply)
    pub private: bool,
}

/// Display name of the user whose event produced the actions
#[derive(Debug, Clone, Copy)]
pub struct Actor<'a> {
    pub user_id: UserId,
    pub name: &'a str,
}

/// Escape text for Telegram HTML, including quotes for attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn mention(user_id: UserId, actor: Option<Actor<'_>>) -> String {
    let label = match actor {
        Some(a) if a.user_id == user_id && !a.name.trim().is_empty() => {
            escape_html(a.name.trim())
        }
        _ => user_id.to_string(),
    };
    format!("<a href='tg://user?id={}'>{}</a>", user_id, label)
}

fn prompt_buttons() -> Vec<Button> {
    [
        ("🔎 Показать слово", CALLBACK_SHOW_WORD),
        ("🔄 Сменить слово", CALLBACK_CHANGE_WORD),
        ("⏭ Не хочу быть ведущим", CALLBACK_PASS_TURN),
    ]
    .into_iter()
    .map(|(label, data)| Button {
        label: label.to_string(),
        data: data.to_string(),
    })
    .collect()
}

fn public(text: String) -> Rendered {
    Rendered {
        text: Some(text),
        ..Default::default()
    }
}

fn private(text: String) -> Rendered {
    Rendered {
        text: Some(text),
        private: true,
        ..Default::default()
    }
}

pub fn render(action: &OutboundAction, actor: Option<Actor<'_>>) -> Rendered {
    match action {
        OutboundAction::Greeting => public(
            "🎭 Привет! Я бот для игры в Крокодила.\n\
             🔹 Чтобы начать игру, используйте команду /play\n\
             🔹 Когда слово угадано, просто напишите его в чат!"
                .to_string(),
        ),
        OutboundAction::ShowTurnPrompt { leader_id, .. } => Rendered {
            text: Some(format!(
                "🎨 {} начинает объяснять слово!",
                mention(*leader_id, actor)
            )),
            buttons: prompt_buttons(),
            private: false,
        },
        OutboundAction::RevealWord { word, changed, .. } => {
            if *changed {
                private(format!("🔄 Слово изменено на: {}", escape_html(word)))
            } else {
                private(format!("🔐 Ваше слово: {}", escape_html(word)))
            }
        }
        OutboundAction::RetractPrompt { .. } | OutboundAction::RetractMessage { .. } => {
            Rendered::default()
        }
        OutboundAction::PassAcknowledged { .. } => {
            private("✅ Вы передали ход следующему участнику.".to_string())
        }
        OutboundAction::AnnouncePassed { user_id } => public(format!(
            "⏭ {} передал ход.\n🎭 Следующий участник может начать с /play",
            mention(*user_id, actor)
        )),
        OutboundAction::AnnounceGuessCorrect {
            user_id,
            word,
            phrase,
        } => public(format!(
            "🎉🎉🎉 {who} угадал(а) слово «{word}»!\n\n🌟 {phrase}\n\n🏆 Теперь {who} становится ведущим!",
            who = mention(*user_id, actor),
            word = escape_html(word),
            phrase = escape_html(phrase)
        )),
        OutboundAction::Rejected { reason, .. } => private(
            match reason {
                RejectReason::GameInProgress => {
                    "❗ Игра уже идет! Дождитесь окончания или ведущий должен передать ход."
                }
                RejectReason::NotLeader => "⛔ Только ведущий может использовать кнопки!",
                RejectReason::NoGameInProgress => "❌ Игра не начата. Используйте /play",
            }
            .to_string(),
        ),
        OutboundAction::Rebroadcast { user_id, text } => public(format!(
            "❗❗❗ {}:\n{}",
            mention(*user_id, actor),
            escape_html(text)
        )),
    }
}
