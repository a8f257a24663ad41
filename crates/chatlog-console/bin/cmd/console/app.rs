use chatlog_console::{
    LogFetcher, LogMessage, LogPager, LogQuery, PageCompletion, PageRequest, Row, ViewContext,
    VirtualWindow, CHUNK_SIZE, LOAD_THRESHOLD,
};
use clap::Args;
use crossbeam_channel::{unbounded, Receiver, Sender};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use eyre::Result;
use ratatui::{DefaultTerminal, Frame};
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{error, info};

use super::http::spawn_fetch;
use super::state::{Focus, SearchInput};
use super::views::main_view::{render_main_view, MainView};
use crate::cmd::LogSource;
use crate::logging;

#[derive(Debug, Args)]
pub struct ConsoleArgs {
    #[command(flatten)]
    pub source: LogSource,

    /// Messages per page
    #[arg(long, default_value_t = CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Write tracing output to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

pub(crate) struct App {
    context: ViewContext,
    fetcher: LogFetcher,
    month: LogQuery,
    title: String,
    pager: LogPager,
    window: VirtualWindow,
    focus: Focus,
    search_input: SearchInput,
    inspected: Option<LogMessage>,
    completions_tx: Sender<PageCompletion>,
    completions_rx: Receiver<PageCompletion>,
    error: Option<String>,
    exit: bool,
    last_render_duration: Duration,
}

impl ConsoleArgs {
    pub fn run(&self) -> Result<()> {
        if let Some(path) = &self.log_file {
            logging::init_file(path)?;
        }

        let mut context = self.source.context();
        let fetcher = self.source.fetcher(&context);
        let month = self.source.month_query(&context);
        let title = format!(
            " {} / {} · {}-{} ",
            self.source.channel, self.source.user, self.source.year, self.source.month
        );

        let pager = LogPager::with_chunk_size(self.chunk_size);
        pager.mount(&mut context);

        let (completions_tx, completions_rx) = unbounded();

        let mut app = App {
            context,
            fetcher,
            month,
            title,
            pager,
            window: VirtualWindow::new(),
            focus: Focus::Logs,
            search_input: SearchInput::default(),
            inspected: None,
            completions_tx,
            completions_rx,
            error: None,
            exit: false,
            last_render_duration: Duration::from_millis(0),
        };

        info!(base_url = app.fetcher.base_url(), "starting console");

        let mut terminal = ratatui::init();
        let app_result = app.run(&mut terminal);
        ratatui::restore();
        app_result.map_err(|e| eyre::eyre!("TUI error: {}", e))
    }
}

impl App {
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> io::Result<()> {
        while !self.exit {
            self.drain_completions();
            self.load_visible_rows();

            let render_start = Instant::now();
            terminal.draw(|frame| self.draw(frame))?;
            self.last_render_duration = render_start.elapsed();

            self.handle_events()?;
        }
        Ok(())
    }

    /// Applies finished requests in arrival order.
    fn drain_completions(&mut self) {
        while let Ok(completion) = self.completions_rx.try_recv() {
            self.pager.apply(completion);

            let item_count = self.pager.item_count();
            self.window.clamp(item_count);
            if self.window.selected().is_none() && self.pager.filtered_len() > 0 {
                self.window.select_first(item_count);
            }
        }
    }

    fn load_visible_rows(&mut self) {
        if self.window.needs_more(&self.pager, LOAD_THRESHOLD) {
            if let Some(request) = self.pager.request_page() {
                self.dispatch(request);
            }
        }
    }

    fn dispatch(&mut self, request: PageRequest) {
        let spawned = spawn_fetch(
            self.fetcher.clone(),
            &self.month,
            request,
            self.completions_tx.clone(),
        );

        if let Err(e) = spawned {
            error!(error = %e, "failed to spawn log request");
            self.error = Some(format!("Failed to start log request: {}", e));
            // Counts as an empty page so the loading gate is released.
            self.pager.apply(PageCompletion {
                request,
                result: Ok(Vec::new()),
            });
        }
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let view = MainView {
            title: &self.title,
            pager: &self.pager,
            focus: self.focus,
            search_input: self.search_input.as_str(),
            inspected: self.inspected.as_ref(),
            error: self.error.as_deref(),
            last_render_duration: self.last_render_duration,
        };
        render_main_view(frame, area, view, &mut self.window);
    }

    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind == KeyEventKind::Press {
                    self.handle_key_event(key_event);
                }
            }
        }
        Ok(())
    }

    fn handle_key_event(&mut self, key_event: KeyEvent) {
        if key_event.modifiers.contains(KeyModifiers::CONTROL)
            && key_event.code == KeyCode::Char('c')
        {
            self.exit();
            return;
        }

        match self.focus {
            Focus::Search => self.handle_search_key(key_event),
            Focus::Logs => self.handle_logs_key(key_event),
            Focus::Inspect => self.handle_inspect_key(key_event),
        }
    }

    fn handle_logs_key(&mut self, key_event: KeyEvent) {
        let item_count = self.pager.item_count();
        match key_event.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => self.exit(),
            KeyCode::Char('/') | KeyCode::Char('s') => self.focus_search(),
            KeyCode::Up | KeyCode::Char('k') => self.window.select_previous(item_count),
            KeyCode::Down | KeyCode::Char('j') => self.window.select_next(item_count),
            KeyCode::PageUp => self.window.page_up(item_count),
            KeyCode::PageDown => self.window.page_down(item_count),
            KeyCode::Home | KeyCode::Char('g') => self.window.select_first(item_count),
            KeyCode::End | KeyCode::Char('G') => self.window.select_last(item_count),
            KeyCode::Enter | KeyCode::Char('i') | KeyCode::Char('I') => self.open_inspect(),
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Tab | KeyCode::Down => self.focus_logs(),
            KeyCode::Backspace => {
                if self.search_input.pop() {
                    self.on_search_changed();
                }
            }
            KeyCode::Char('u') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                if self.search_input.clear() {
                    self.on_search_changed();
                }
            }
            KeyCode::Char(c) if !key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                if self.search_input.push(c) {
                    self.on_search_changed();
                }
            }
            _ => {}
        }
    }

    fn handle_inspect_key(&mut self, key_event: KeyEvent) {
        let item_count = self.pager.item_count();
        match key_event.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => self.exit(),
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('i') | KeyCode::Char('I') => {
                self.close_inspect()
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.window.select_previous(item_count);
                self.refresh_inspected();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.window.select_next(item_count);
                self.refresh_inspected();
            }
            _ => {}
        }
    }

    fn on_search_changed(&mut self) {
        if let Some(request) = self.pager.set_search(self.search_input.as_str()) {
            self.dispatch(request);
        }
        self.window.select_first(self.pager.item_count());
    }

    /// Only the search field registered in the context can take focus.
    fn focus_search(&mut self) {
        if self.context.active_search_field() == Some(self.pager.search_field()) {
            self.focus = Focus::Search;
        }
    }

    fn focus_logs(&mut self) {
        self.focus = Focus::Logs;
        self.pager.mount(&mut self.context);
    }

    fn selected_message(&self) -> Option<&LogMessage> {
        let selected = self.window.selected()?;
        match self.pager.row(selected)? {
            Row::Message(msg) => Some(msg),
            Row::Loading => None,
        }
    }

    fn open_inspect(&mut self) {
        if let Some(msg) = self.selected_message().cloned() {
            self.inspected = Some(msg);
            self.focus = Focus::Inspect;
        }
    }

    fn refresh_inspected(&mut self) {
        if let Some(msg) = self.selected_message().cloned() {
            self.inspected = Some(msg);
        }
    }

    fn close_inspect(&mut self) {
        self.inspected = None;
        self.focus = Focus::Logs;
    }

    fn exit(&mut self) {
        self.exit = true;
    }
}
