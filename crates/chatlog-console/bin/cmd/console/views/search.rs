use chatlog_console::LogPager;
use ratatui::{
    layout::Rect,
    style::{Color, Style, Stylize},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

const PROMPT: &str = "🔍 ";

/// Paging state shown in the search bar title
fn load_status(pager: &LogPager) -> Span<'static> {
    if pager.is_loading() {
        " loading… ".yellow()
    } else if pager.last_error().is_some() {
        " load failed ".red().bold()
    } else if pager.has_next_page() {
        " more available ".dark_gray()
    } else {
        " all loaded ".green()
    }
}

/// Renders the search field above the logs table
pub(crate) fn render_search_bar(
    frame: &mut Frame,
    area: Rect,
    input: &str,
    pager: &LogPager,
    is_focused: bool,
) {
    let status = load_status(pager);

    let block = Block::bordered()
        .title(" Search ")
        .title(Line::from(status).right_aligned())
        .border_set(if is_focused {
            border::THICK
        } else {
            border::PLAIN
        });

    let content = if input.is_empty() && !is_focused {
        Line::from(vec![
            Span::raw(PROMPT),
            Span::styled("press / to search", Style::default().fg(Color::DarkGray)),
        ])
    } else {
        Line::from(vec![Span::raw(PROMPT), Span::raw(input.to_string())])
    };

    let inner_area = block.inner(area);
    frame.render_widget(Paragraph::new(content).block(block), area);

    if is_focused {
        let prompt_width = Span::raw(PROMPT).width() as u16;
        let cursor_x = inner_area.x + prompt_width + input.chars().count() as u16;
        let max_x = inner_area.x + inner_area.width.saturating_sub(1);
        frame.set_cursor_position((cursor_x.min(max_x), inner_area.y));
    }
}
