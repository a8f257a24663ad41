use ratatui::{
    layout::Rect,
    style::Stylize,
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

use crate::cmd::console::state::Focus;

fn keybindings(focus: Focus) -> &'static [(&'static str, &'static str)] {
    match focus {
        Focus::Logs => &[
            ("Quit", "q"),
            ("Navigate", "↑↓/jk PgUp PgDn g/G"),
            ("Search", "/"),
            ("Inspect", "i/Enter"),
        ],
        Focus::Search => &[
            ("Type to filter", ""),
            ("Clear", "Ctrl-u"),
            ("Back to logs", "Esc/Enter"),
        ],
        Focus::Inspect => &[
            ("Quit", "q"),
            ("Prev/next message", "↑↓/jk"),
            ("Close", "i/Esc"),
        ],
    }
}

/// Renders the keybindings available in the focused panel
pub fn render_bottom_bar(frame: &mut Frame, area: Rect, focus: Focus) {
    let mut spans: Vec<Span> = Vec::new();
    for (i, (label, keys)) in keybindings(focus).iter().enumerate() {
        let separator = if i == 0 { " " } else { " | " };
        spans.push(format!("{}{} ", separator, label).into());
        if !keys.is_empty() {
            spans.push(format!("<{}> ", keys).blue().bold());
        }
    }

    let block = Block::bordered()
        .title(" Controls ")
        .border_set(border::PLAIN);

    frame.render_widget(
        Paragraph::new(Line::from(spans)).block(block).left_aligned(),
        area,
    );
}
