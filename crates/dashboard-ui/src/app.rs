//! Main application state and TUI event loop for the bike dashboard.
//!
//! [`App`] owns the theme, labels, the per-session dashboard state and the
//! picker focus. It consumes [`LoadEvent`]s from the background loader and
//! turns key presses into date-range edits.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use tokio::sync::mpsc;

use dashboard_core::models::{RangeEndpoint, WeekdayConvention};
use dashboard_runtime::orchestrator::{LoadEvent, LoadHandle};
use dashboard_runtime::session::{DashboardSession, SessionConfig};

use crate::dashboard_view::{render_dashboard, RefreshNotice, ViewContext};
use crate::labels::{Labels, Language};
use crate::themes::Theme;

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Redraw on the next tick; nothing else.
    Continue,
    /// Ask the loader for a forced reload.
    Refresh,
    Quit,
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the dashboard TUI.
pub struct App {
    pub theme: Theme,
    pub labels: &'static Labels,
    pub convention: WeekdayConvention,
    /// Data source as shown in the header.
    pub source: String,
    pub session: DashboardSession,
    /// Which date picker the arrow keys move.
    pub focus: RangeEndpoint,
    pub show_help: bool,
    /// Outcome of the last `r` press; cleared by the next load event.
    pub refresh: Option<RefreshNotice>,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
}

impl App {
    pub fn new(
        theme_name: &str,
        language: Language,
        convention: WeekdayConvention,
        source: String,
        config: SessionConfig,
    ) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            labels: language.labels(),
            convention,
            source,
            session: DashboardSession::new(config),
            focus: RangeEndpoint::Start,
            show_help: false,
            refresh: None,
            should_quit: false,
        }
    }

    // ── Public event loop ─────────────────────────────────────────────────────

    /// Run the dashboard, receiving loaded tables from `rx`.
    ///
    /// Uses `crossterm::event::poll` (synchronous, with a 250 ms timeout) so
    /// that the terminal event loop stays on the current thread while load
    /// results arrive on the async channel via `try_recv`.
    ///
    /// The loop exits on `q`, `Q`, `Ctrl+C`, or when the loader stops.
    pub async fn run(mut self, mut rx: mpsc::Receiver<LoadEvent>, loader: LoadHandle) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => match self.handle_key(key) {
                        KeyOutcome::Quit => break Ok(()),
                        KeyOutcome::Refresh => {
                            tracing::info!("dataset refresh requested");
                            self.note_refresh(loader.request_refresh());
                        }
                        KeyOutcome::Continue => {}
                    },
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            // Drain any pending load results (non-blocking).
            loop {
                match rx.try_recv() {
                    Ok(event) => self.apply_load_event(event),
                    Err(mpsc::error::TryRecvError::Empty) => break,
                    Err(mpsc::error::TryRecvError::Disconnected) => {
                        tracing::warn!("dataset loader stopped");
                        self.should_quit = true;
                        break;
                    }
                }
            }

            if self.should_quit {
                break Ok(());
            }
        };

        loader.abort();

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    // ── State updates ─────────────────────────────────────────────────────────

    pub fn apply_load_event(&mut self, event: LoadEvent) {
        self.refresh = None;
        match event {
            LoadEvent::Loaded(table) => {
                tracing::info!(rows = table.len(), "dataset attached");
                self.session.attach_table(table);
            }
            LoadEvent::Failed(message) => {
                tracing::error!(error = %message, "dataset load failed");
                self.session.record_load_failure(message);
            }
        }
    }

    /// Record whether the loader accepted a refresh request.
    pub fn note_refresh(&mut self, queued: bool) {
        self.refresh = Some(if queued {
            RefreshNotice::Queued
        } else {
            RefreshNotice::NotQueued
        });
    }

    /// Map one key press onto the dashboard state.
    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if key.kind == KeyEventKind::Release {
            return KeyOutcome::Continue;
        }

        let focus = self.focus;
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return KeyOutcome::Quit;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => return KeyOutcome::Quit,
            KeyCode::Char('r') | KeyCode::Char('R') => return KeyOutcome::Refresh,
            KeyCode::Char('?') => self.show_help = !self.show_help,
            KeyCode::Esc => self.show_help = false,
            KeyCode::Tab | KeyCode::BackTab => self.focus = focus.toggle(),
            KeyCode::Left => {
                self.session.edit_range(|r| r.shift_days(focus, -1));
            }
            KeyCode::Right => {
                self.session.edit_range(|r| r.shift_days(focus, 1));
            }
            KeyCode::Up => {
                self.session.edit_range(|r| r.shift_months(focus, 1));
            }
            KeyCode::Down => {
                self.session.edit_range(|r| r.shift_months(focus, -1));
            }
            KeyCode::Home => {
                self.session.edit_range(|r| r.jump_to_min(focus));
            }
            KeyCode::End => {
                self.session.edit_range(|r| r.jump_to_max(focus));
            }
            _ => {}
        }
        KeyOutcome::Continue
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let ctx = ViewContext {
            session: &self.session,
            source: &self.source,
            focus: self.focus,
            show_help: self.show_help,
            refresh: self.refresh,
            convention: self.convention,
            labels: self.labels,
            theme: &self.theme,
        };
        render_dashboard(frame, area, &ctx);
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use dashboard_core::models::{NumericColumn, RentalTable};
    use dashboard_runtime::session::TrendView;
    use ratatui::backend::TestBackend;
    use std::sync::Arc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn table() -> Arc<RentalTable> {
        let dates = vec![date(2011, 1, 1), date(2011, 2, 1), date(2011, 3, 1)];
        Arc::new(
            RentalTable::new(
                "dteday",
                dates,
                vec![
                    NumericColumn::new("weekday", vec![6.0, 2.0, 2.0]),
                    NumericColumn::new("temp", vec![0.1, 0.2, 0.3]),
                    NumericColumn::new("cnt", vec![10.0, 20.0, 30.0]),
                ],
            )
            .unwrap(),
        )
    }

    fn app() -> App {
        App::new(
            "dark",
            Language::English,
            WeekdayConvention::SundayZero,
            "day.csv".to_string(),
            SessionConfig::default(),
        )
    }

    fn loaded_app() -> App {
        let mut app = app();
        app.apply_load_event(LoadEvent::Loaded(table()));
        app
    }

    fn press(app: &mut App, code: KeyCode) -> KeyOutcome {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    // ── App::new ──────────────────────────────────────────────────────────────

    #[test]
    fn test_app_creation_defaults() {
        let app = app();
        assert_eq!(app.focus, RangeEndpoint::Start);
        assert!(!app.show_help);
        assert!(!app.should_quit);
        assert!(!app.session.is_loaded());
        assert_eq!(app.labels.weekday, "Weekday");
    }

    #[test]
    fn test_app_creation_indonesian_unknown_theme() {
        let app = App::new(
            "neon",
            Language::Indonesian,
            WeekdayConvention::MondayZero,
            "day.csv".to_string(),
            SessionConfig::default(),
        );
        assert_eq!(app.labels.weekday, "Hari Kerja");
        assert_eq!(app.convention, WeekdayConvention::MondayZero);
    }

    // ── Load events ───────────────────────────────────────────────────────────

    #[test]
    fn test_loaded_event_attaches_table() {
        let app = loaded_app();
        assert!(app.session.is_loaded());
        assert!(matches!(app.session.trend(), TrendView::Ready { .. }));
    }

    #[test]
    fn test_failed_event_records_error() {
        let mut app = loaded_app();
        app.apply_load_event(LoadEvent::Failed("Dataset contains no rows".to_string()));
        assert_eq!(app.session.load_error(), Some("Dataset contains no rows"));
        assert!(!app.session.is_loaded());
    }

    // ── Keys ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        assert_eq!(press(&mut app, KeyCode::Char('q')), KeyOutcome::Quit);
        assert_eq!(press(&mut app, KeyCode::Char('Q')), KeyOutcome::Quit);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.handle_key(ctrl_c), KeyOutcome::Quit);
        assert_eq!(press(&mut app, KeyCode::Char('c')), KeyOutcome::Continue);
    }

    #[test]
    fn test_refresh_key() {
        let mut app = app();
        assert_eq!(press(&mut app, KeyCode::Char('r')), KeyOutcome::Refresh);
    }

    #[test]
    fn test_help_toggle() {
        let mut app = app();
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);
        press(&mut app, KeyCode::Char('?'));
        assert!(!app.show_help);
        press(&mut app, KeyCode::Char('?'));
        press(&mut app, KeyCode::Esc);
        assert!(!app.show_help);
    }

    #[test]
    fn test_tab_switches_focus() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, RangeEndpoint::End);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, RangeEndpoint::Start);
    }

    #[test]
    fn test_arrow_keys_move_focused_endpoint() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Right);
        let selection = app.session.selection().unwrap();
        assert_eq!(selection.start(), date(2011, 1, 2));
        assert_eq!(selection.end(), date(2011, 3, 1));

        press(&mut app, KeyCode::Up);
        assert_eq!(app.session.selection().unwrap().start(), date(2011, 2, 2));

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.session.selection().unwrap().end(), date(2011, 2, 1));
    }

    #[test]
    fn test_date_keys_only_recompute_trend() {
        let mut app = loaded_app();
        let before = app.session.compute_stats();
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::End);
        let after = app.session.compute_stats();
        assert_eq!(after.overview_runs, before.overview_runs);
        assert_eq!(after.trend_runs, before.trend_runs + 2);
    }

    #[test]
    fn test_start_past_end_shows_invalid_range() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::End);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Home);
        assert!(matches!(app.session.trend(), TrendView::InvalidRange { .. }));
        // Overview views are untouched by the bad range.
        assert!(matches!(app.session.overview(), Some(Ok(_))));
    }

    #[test]
    fn test_release_events_are_ignored() {
        let mut app = loaded_app();
        let mut key = KeyEvent::new(KeyCode::Right, KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        app.handle_key(key);
        assert_eq!(app.session.selection().unwrap().start(), date(2011, 1, 1));
    }

    #[test]
    fn test_keys_before_load_do_nothing() {
        let mut app = app();
        assert_eq!(press(&mut app, KeyCode::Left), KeyOutcome::Continue);
        assert!(app.session.selection().is_none());
    }

    // ── Refresh notice ────────────────────────────────────────────────────────

    fn footer_text(app: &App) -> String {
        let backend = TestBackend::new(120, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
        let buffer = terminal.backend().buffer();
        (0..120).map(|x| buffer[(x, 39)].symbol()).collect()
    }

    #[test]
    fn test_rejected_refresh_shows_in_footer() {
        let mut app = loaded_app();
        app.note_refresh(false);
        assert_eq!(app.refresh, Some(RefreshNotice::NotQueued));
        assert!(footer_text(&app).contains("Refresh not queued"));
    }

    #[test]
    fn test_queued_refresh_cleared_by_next_load() {
        let mut app = loaded_app();
        app.note_refresh(true);
        assert!(footer_text(&app).contains("Refreshing dataset..."));

        app.apply_load_event(LoadEvent::Loaded(table()));
        assert_eq!(app.refresh, None);
        assert!(footer_text(&app).contains("r refresh"));
    }

    // ── Render ────────────────────────────────────────────────────────────────

    #[test]
    fn test_render_does_not_panic() {
        let backend = TestBackend::new(120, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut app = loaded_app();
        app.show_help = true;
        terminal.draw(|frame| app.render(frame)).unwrap();
    }
}
