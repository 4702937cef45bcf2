//! Main TUI application state machine.
//!
//! Handles:
//! - Input event handling
//! - Idle / Result Shown transitions
//! - Synchronous inference on Predict

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};

use crate::adapters::{ArtifactLoader, ScalerArtifact, VotingClassifier};
use crate::application::{InferenceService, ResultReport};
use crate::config::AppConfig;
use crate::ports::{Classifier, FeatureScaler};
use crate::CardioError;

use super::ui::{
    form::{render_input_form, InputFormState},
    reference::{render_reference_collapsed, render_reference_overlay},
    render_disclaimer, render_footer, render_header, render_predict_button,
    result::{render_result_panel, ViewState},
};

/// Main application state
pub struct App<S = ScalerArtifact, C = VotingClassifier>
where
    S: FeatureScaler,
    C: Classifier,
{
    /// Whether the app should quit
    should_quit: bool,

    inference_service: InferenceService<S, C>,

    form_state: InputFormState,

    view: ViewState,

    /// Reference overlay open
    show_reference: bool,
}

impl App {
    /// Create the application, loading artifacts from the configured paths.
    ///
    /// # Errors
    /// Returns error if either artifact is missing, malformed, incompatible
    /// or fails its digest pin. The terminal is untouched in that case.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let artifacts = ArtifactLoader::from_config(config)
            .load()
            .map_err(CardioError::from)?;

        Ok(Self::with_service(InferenceService::from_artifacts(artifacts)))
    }
}

impl<S, C> App<S, C>
where
    S: FeatureScaler,
    C: Classifier,
{
    /// Create application with an injected inference service.
    pub fn with_service(inference_service: InferenceService<S, C>) -> Self {
        Self {
            should_quit: false,
            inference_service,
            form_state: InputFormState::default(),
            view: ViewState::default(),
            show_reference: false,
        }
    }

    #[must_use]
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    #[must_use]
    pub fn reference_visible(&self) -> bool {
        self.show_reference
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| self.draw(f))?;

            // Short poll to stay responsive
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Draw the whole screen.
    pub fn draw(&self, f: &mut Frame) {
        let area = f.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),  // Header
                Constraint::Length(17), // Form
                Constraint::Length(3),  // Predict
                Constraint::Min(8),     // Result
                Constraint::Length(1),  // Reference expander
                Constraint::Length(3),  // Key hints
                Constraint::Length(2),  // Disclaimer
            ])
            .split(area);

        render_header(f, chunks[0]);
        render_input_form(f, chunks[1], &self.form_state);
        render_predict_button(f, chunks[2]);
        render_result_panel(f, chunks[3], &self.view);
        render_reference_collapsed(f, chunks[4]);
        render_footer(f, chunks[5], self.form_state.selected_control().hint);
        render_disclaimer(f, chunks[6]);

        if self.show_reference {
            render_reference_overlay(f, area);
        }
    }

    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        // Global quit handling
        if modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key, KeyCode::Char('q') | KeyCode::Char('c'))
        {
            self.should_quit = true;
            return;
        }

        if self.show_reference {
            self.handle_reference_key(key);
            return;
        }

        let changed = match key {
            KeyCode::Esc if self.form_state.is_editing() => {
                self.form_state.cancel_edit();
                false
            }
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
                false
            }
            KeyCode::Char('?') | KeyCode::F(1) => {
                self.show_reference = true;
                false
            }
            KeyCode::Enter | KeyCode::Char('p') | KeyCode::Char('P') => {
                self.predict();
                false
            }
            KeyCode::Up | KeyCode::BackTab => self.form_state.prev_control(),
            KeyCode::Down | KeyCode::Tab => self.form_state.next_control(),
            KeyCode::Left => self.form_state.step(-1.0),
            KeyCode::Right => self.form_state.step(1.0),
            KeyCode::PageDown => self.form_state.step(-10.0),
            KeyCode::PageUp => self.form_state.step(10.0),
            KeyCode::Home => self.form_state.jump_to_min(),
            KeyCode::End => self.form_state.jump_to_max(),
            KeyCode::Backspace => {
                self.form_state.delete_char();
                false
            }
            KeyCode::Char('r') | KeyCode::Char('R') => self.form_state.reset(),
            KeyCode::Char(c) => self.form_state.input_char(c),
            _ => false,
        };

        // A shown result belongs to the inputs it was computed from
        if changed {
            self.view = ViewState::Idle { error: None };
        }
    }

    fn handle_reference_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::F(1) => {
                self.show_reference = false;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            _ => {}
        }
    }

    fn predict(&mut self) {
        let features = self.form_state.snapshot();

        match self.inference_service.predict(&features) {
            Ok(result) => {
                self.view = ViewState::ResultShown {
                    report: ResultReport::from_prediction(&result),
                };
            }
            Err(e) => {
                tracing::error!("Prediction failed: {}", e);
                self.view = ViewState::Idle {
                    error: Some(e.to_string()),
                };
            }
        }
    }
}
