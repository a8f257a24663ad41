use chatlog_console::{LogMessage, LogPager, VirtualWindow};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Stylize,
    symbols::border,
    text::Line,
    widgets::{Block, Paragraph},
    Frame,
};
use std::time::Duration;

use crate::cmd::console::state::Focus;

use super::bottom_bar::render_bottom_bar;
use super::inspect::render_inspect_popup;
use super::logs::{render_logs_panel, render_logs_placeholder};
use super::search::render_search_bar;

/// Everything the main view reads from the app for one frame
pub(crate) struct MainView<'a> {
    pub title: &'a str,
    pub pager: &'a LogPager,
    pub focus: Focus,
    pub search_input: &'a str,
    pub inspected: Option<&'a LogMessage>,
    pub error: Option<&'a str>,
    #[cfg_attr(not(feature = "dev"), allow(dead_code))]
    pub last_render_duration: Duration,
}

/// Renders the search bar, logs panel, controls and error states
pub(crate) fn render_main_view(
    frame: &mut Frame,
    area: Rect,
    view: MainView<'_>,
    window: &mut VirtualWindow,
) {
    let title = Line::from(" Chatlog Console ".bold());

    #[cfg(feature = "dev")]
    let block = {
        let render_time_ms = view.last_render_duration.as_millis();
        Block::bordered()
            .title(title.centered())
            .title_bottom(Line::from(format!(" {}ms ", render_time_ms)).cyan().right_aligned())
            .border_set(border::THICK)
    };

    #[cfg(not(feature = "dev"))]
    let block = Block::bordered()
        .title(title.centered())
        .border_set(border::THICK);

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let [search_area, logs_area, controls_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(3),
        Constraint::Length(3),
    ])
    .areas(inner_area);

    render_search_bar(
        frame,
        search_area,
        view.search_input,
        view.pager,
        view.focus == Focus::Search,
    );

    let error = view.error.or(view.pager.last_error());
    if let Some(error_msg) = error {
        if view.pager.loaded_len() == 0 {
            let error_text = vec![
                Line::from(""),
                Line::from("Error").red().bold().centered(),
                Line::from(""),
                Line::from(error_msg).red().centered(),
                Line::from(""),
                Line::from("Check the API base URL, channel, user and month")
                    .yellow()
                    .centered(),
            ];

            let block = Block::bordered().border_set(border::THICK);
            frame.render_widget(Paragraph::new(error_text).block(block), logs_area);
            render_bottom_bar(frame, controls_area, view.focus);
            return;
        }
    }

    if view.pager.item_count() == 0 {
        let message = if view.pager.search().is_empty() {
            "(no messages this month)"
        } else {
            "(no matching messages)"
        };
        render_logs_placeholder(view.title, message, error, logs_area, frame);
    } else {
        render_logs_panel(
            view.pager,
            window,
            view.title,
            error,
            logs_area,
            frame,
            view.focus != Focus::Search,
        );
    }

    render_bottom_bar(frame, controls_area, view.focus);

    // Render inspect popup on top of everything if open
    if view.focus == Focus::Inspect {
        if let Some(msg) = view.inspected {
            render_inspect_popup(msg, area, frame);
        }
    }
}
