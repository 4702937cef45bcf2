//! Result panel: headline, celebratory cue, probability gauge and advice.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::application::ResultReport;
use crate::tui::styles::MedicalTheme;

const BALLOON_TOP: &str = " ( ) ";
const BALLOON_STRING: &str = "  |  ";
const BALLOON_COUNT: usize = 7;

/// What the result panel shows.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    /// Form only, with the error of the last failed Predict if any
    Idle { error: Option<String> },
    /// Form plus the result of the last successful Predict
    ResultShown { report: ResultReport },
}

impl Default for ViewState {
    fn default() -> Self {
        Self::Idle { error: None }
    }
}

/// Render the result panel for the current view state
pub fn render_result_panel(f: &mut Frame, area: Rect, view: &ViewState) {
    let block = Block::default()
        .title(Span::styled(" Results ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());
    let inner = block.inner(area);
    f.render_widget(block, area);

    match view {
        ViewState::Idle { error: None } => render_idle(f, inner),
        ViewState::Idle { error: Some(message) } => render_error(f, inner, message),
        ViewState::ResultShown { report } => render_report(f, inner, report),
    }
}

fn render_idle(f: &mut Frame, area: Rect) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "Adjust the patient details above, then press Predict",
            MedicalTheme::text_secondary(),
        )),
    ])
    .alignment(Alignment::Center);

    f.render_widget(content, area);
}

fn render_error(f: &mut Frame, area: Rect, message: &str) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("! ", MedicalTheme::danger()),
            Span::styled("Prediction failed: ", MedicalTheme::danger()),
            Span::styled(message.to_string(), MedicalTheme::text()),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "No result was produced. Adjust the inputs or check the model artifacts.",
            MedicalTheme::text_muted(),
        )),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });

    f.render_widget(content, area);
}

fn render_report(f: &mut Frame, area: Rect, report: &ResultReport) {
    let cue_height = if report.celebrate { 3 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),          // Headline
            Constraint::Length(cue_height), // Balloons
            Constraint::Length(3),          // Gauge
            Constraint::Min(0),             // Advice
        ])
        .split(area);

    let headline = Paragraph::new(Line::from(Span::styled(
        report.headline.text(),
        MedicalTheme::headline(report.headline),
    )))
    .alignment(Alignment::Center);
    f.render_widget(headline, chunks[0]);

    if report.celebrate {
        render_balloons(f, chunks[1]);
    }

    let percent = (report.probability * 100.0).round().clamp(0.0, 100.0) as u16;
    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(Span::styled(
                    " Probability of heart disease ",
                    MedicalTheme::text_secondary(),
                ))
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        )
        .gauge_style(MedicalTheme::probability(report.probability))
        .percent(percent)
        .label(format!("{:.1}%", report.probability * 100.0));
    f.render_widget(gauge, chunks[2]);

    let mut lines = vec![Line::from(Span::styled(
        ResultReport::ADVICE_TITLE,
        MedicalTheme::subtitle(),
    ))];
    lines.extend(report.advice().iter().map(|advice| {
        Line::from(vec![
            Span::styled("  - ", MedicalTheme::tier(report.tier)),
            Span::styled(*advice, MedicalTheme::text()),
        ])
    }));

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), chunks[3]);
}

fn render_balloons(f: &mut Frame, area: Rect) {
    let colors = MedicalTheme::BALLOONS;
    let tops: Vec<Span> = (0..BALLOON_COUNT)
        .map(|i| {
            Span::styled(
                BALLOON_TOP,
                ratatui::style::Style::default().fg(colors[i % colors.len()]),
            )
        })
        .collect();
    let strings: Vec<Span> = (0..BALLOON_COUNT)
        .map(|_| Span::styled(BALLOON_STRING, MedicalTheme::text_muted()))
        .collect();

    let balloons = Paragraph::new(vec![
        Line::from(tops),
        Line::from(strings),
        Line::from(Span::styled(
            "Celebrating a healthy heart!",
            MedicalTheme::success(),
        )),
    ])
    .alignment(Alignment::Center);

    f.render_widget(balloons, area);
}
