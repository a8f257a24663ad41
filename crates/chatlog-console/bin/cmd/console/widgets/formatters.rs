use chatlog_console::{fragments, Fragment, LogMessage};
use chrono::{DateTime, Utc};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

pub(crate) fn truncate_message(msg: &str, max_len: usize) -> String {
    if msg.chars().count() <= max_len {
        msg.to_string()
    } else {
        let truncated: String = msg.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

/// Formats a log timestamp as YYYY-MM-DD HH:MM:SS (UTC)
pub(crate) fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Formats a message count as "1,234"
pub(crate) fn format_count(count: usize) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub(crate) fn emote_style() -> Style {
    Style::default()
        .fg(Color::Magenta)
        .add_modifier(Modifier::BOLD)
}

/// Builds the message column with emotes highlighted, cut to `max_width` chars.
pub(crate) fn message_line(msg: &LogMessage, max_width: usize) -> Line<'static> {
    let mut spans = Vec::new();
    let mut remaining = max_width;

    for fragment in fragments(&msg.text, &msg.emotes) {
        if remaining == 0 {
            break;
        }
        let (text, style) = match fragment {
            Fragment::Text(text) => (text, Style::default()),
            Fragment::Emote(emote) => (emote.code.clone(), emote_style()),
        };
        let width = text.chars().count();
        if width > remaining {
            // Too narrow for an ellipsis, so cut the text instead.
            let cut = if remaining < 3 {
                text.chars().take(remaining).collect()
            } else {
                truncate_message(&text, remaining)
            };
            spans.push(Span::styled(cut, style));
            break;
        }
        remaining -= width;
        spans.push(Span::styled(text, style));
    }

    Line::from(spans)
}
