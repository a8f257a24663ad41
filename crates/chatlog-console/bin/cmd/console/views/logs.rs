use crate::cmd::console::widgets::formatters::{
    format_count, format_timestamp, message_line, truncate_message,
};
use chatlog_console::{LogPager, Row as LogRow, VirtualWindow};
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style, Stylize},
    symbols::border,
    text::{Line, Text},
    widgets::{Block, HighlightSpacing, Row, Table, TableState},
    Frame,
};

const TIMESTAMP_WIDTH: u16 = 19;
const AUTHOR_WIDTH: u16 = 16;

/// Red bottom title reporting a failed load; paging stops after one.
fn error_title(error: Option<&str>) -> Option<Line<'static>> {
    error.map(|e| Line::from(format!(" Load failed: {} ", e)).red().bold())
}

fn with_error(block: Block<'static>, error: Option<&str>) -> Block<'static> {
    match error_title(error) {
        Some(title) => block.title_bottom(title),
        None => block,
    }
}

/// Renders a placeholder when there are no rows to show
pub(crate) fn render_logs_placeholder(
    title: &str,
    message: &str,
    error: Option<&str>,
    area: Rect,
    frame: &mut Frame,
) {
    let block = Block::bordered()
        .title(title.to_string())
        .border_set(border::THICK);
    let block = with_error(block, error);

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let message_width = message.chars().count() as u16;
    let x = inner_area.x + (inner_area.width.saturating_sub(message_width)) / 2;
    let y = inner_area.y + inner_area.height / 2;

    if x < inner_area.x + inner_area.width && y < inner_area.y + inner_area.height {
        frame
            .buffer_mut()
            .set_string(x, y, message, Style::default().fg(Color::DarkGray));
    }
}

/// Renders the rows of `pager` that fall inside `window`.
///
/// Only the visible slice is turned into table rows; the window height is
/// updated from the area so paging follows terminal resizes.
pub(crate) fn render_logs_panel(
    pager: &LogPager,
    window: &mut VirtualWindow,
    title: &str,
    error: Option<&str>,
    area: Rect,
    frame: &mut Frame,
    is_focused: bool,
) {
    let border_set = if is_focused {
        border::THICK
    } else {
        border::PLAIN
    };

    let counts = if pager.search().is_empty() {
        format!(" {} loaded ", format_count(pager.loaded_len()))
    } else {
        format!(
            " {} of {} match ",
            format_count(pager.filtered_len()),
            format_count(pager.loaded_len())
        )
    };

    let block = Block::bordered()
        .title(title.to_string())
        .title(Line::from(counts).right_aligned())
        .border_set(border_set);
    let block = with_error(block, error);

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    // header takes one line
    window.set_height(inner_area.height.saturating_sub(1) as usize);

    let item_count = pager.item_count();
    let range = window.visible_range(item_count);
    let offset = range.start;

    let msg_width = inner_area
        .width
        .saturating_sub(TIMESTAMP_WIDTH + AUTHOR_WIDTH + 6) as usize;

    let header_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let header = Row::new(vec!["Timestamp", "User", "Message"])
        .style(header_style)
        .height(1);

    let rows: Vec<Row> = range
        .filter_map(|index| pager.row(index))
        .map(|row| match row {
            LogRow::Message(msg) => {
                let author = truncate_message(msg.author().unwrap_or(""), AUTHOR_WIDTH as usize);
                Row::new(vec![
                    Line::from(format_timestamp(&msg.timestamp)),
                    Line::from(author).style(Style::default().fg(Color::Cyan)),
                    message_line(msg, msg_width.max(1)),
                ])
            }
            LogRow::Loading => Row::new(vec![
                Line::from(""),
                Line::from(""),
                Line::from("Loading..."),
            ])
            .style(Style::default().fg(Color::DarkGray)),
        })
        .collect();

    let widths = [
        Constraint::Length(TIMESTAMP_WIDTH),
        Constraint::Length(AUTHOR_WIDTH),
        Constraint::Min(20),
    ];

    let selected_row_style = Style::default()
        .add_modifier(Modifier::REVERSED)
        .bg(Color::DarkGray);

    let table = Table::new(rows, widths)
        .header(header)
        .row_highlight_style(selected_row_style)
        .highlight_symbol(Text::from(">"))
        .highlight_spacing(HighlightSpacing::Always);

    let mut table_state = TableState::default()
        .with_selected(window.selected().and_then(|s| s.checked_sub(offset)));

    frame.render_stateful_widget(table, inner_area, &mut table_state);
}
