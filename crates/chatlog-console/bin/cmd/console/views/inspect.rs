use crate::cmd::console::widgets::formatters::{emote_style, format_timestamp};
use chatlog_console::LogMessage;
use ratatui::{
    layout::Rect,
    style::{Color, Style, Stylize},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Wrap},
    Frame,
};

fn field<'a>(label: &'a str, value: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{:<9}", label), Style::default().fg(Color::Yellow)),
        Span::raw(value),
    ])
}

/// Renders a centered popup with the full message, its emotes and tags
pub(crate) fn render_inspect_popup(msg: &LogMessage, area: Rect, frame: &mut Frame) {
    // Center the popup at 80% of screen size
    let popup_width = (area.width as f32 * 0.8) as u16;
    let popup_height = (area.height as f32 * 0.8) as u16;
    let x = (area.width.saturating_sub(popup_width)) / 2;
    let y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect {
        x: area.x + x,
        y: area.y + y,
        width: popup_width,
        height: popup_height,
    };

    // Clear the area to create a complete overlay
    frame.render_widget(Clear, popup_area);

    let timestamp = format_timestamp(&msg.timestamp);
    let block = Block::bordered()
        .title(format!(" Message ({} UTC) ", timestamp))
        .border_set(border::DOUBLE);

    let mut lines = vec![field("User", msg.author().unwrap_or("-"))];
    if let Some(channel) = msg.channel.as_deref() {
        lines.push(field("Channel", channel));
    }
    if let Some(id) = msg.id.as_deref() {
        lines.push(field("Id", id));
    }
    lines.push(Line::from(""));
    lines.extend(msg.text.lines().map(Line::from));

    if !msg.emotes.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from("Emotes".bold()));
        for emote in &msg.emotes {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(emote.code.as_str(), emote_style()),
                Span::raw(format!(
                    "  id {} [{}..{})",
                    emote.id, emote.start_index, emote.end_index
                )),
            ]));
        }
    }

    if !msg.tags.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from("Tags".bold()));
        for (key, value) in &msg.tags {
            lines.push(Line::from(vec![
                Span::styled(format!("  {}=", key), Style::default().fg(Color::DarkGray)),
                Span::raw(value.as_str()),
            ]));
        }
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, popup_area);
}
