//! UI module: View components for the TUI.

pub mod form;
pub mod reference;
pub mod result;

use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::styles::{MedicalTheme, LOGO_SMALL};

pub fn render_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(" ", MedicalTheme::text()),
            Span::styled(LOGO_SMALL, MedicalTheme::title()),
            Span::styled(
                " │ Heart Disease Prediction",
                MedicalTheme::text_secondary(),
            ),
        ]),
        Line::from(vec![
            Span::styled(" This application uses a ", MedicalTheme::text_muted()),
            Span::styled("Voting Classifier", MedicalTheme::text()),
            Span::styled(
                " model to predict the likelihood of heart disease.",
                MedicalTheme::text_muted(),
            ),
        ]),
    ])
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

pub fn render_predict_button(f: &mut Frame, area: Rect) {
    let button = Paragraph::new(Line::from(vec![
        Span::styled(" [Enter] ", MedicalTheme::key_hint()),
        Span::styled(" Predict ", MedicalTheme::button()),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border_focused()),
    );

    f.render_widget(button, area);
}

/// Key hints, preceded by the focused control's hint when it has one.
pub fn render_footer(f: &mut Frame, area: Rect, hint: Option<&str>) {
    let hint_line = match hint {
        Some(hint) => Line::from(Span::styled(hint.to_string(), MedicalTheme::info())),
        None => Line::from(""),
    };

    let keys = Line::from(vec![
        Span::styled("[↑↓] ", MedicalTheme::key_hint()),
        Span::styled("Navigate ", MedicalTheme::key_desc()),
        Span::styled("[←→] ", MedicalTheme::key_hint()),
        Span::styled("Adjust ", MedicalTheme::key_desc()),
        Span::styled("[0-9] ", MedicalTheme::key_hint()),
        Span::styled("Type ", MedicalTheme::key_desc()),
        Span::styled("[Enter] ", MedicalTheme::key_hint()),
        Span::styled("Predict ", MedicalTheme::key_desc()),
        Span::styled("[R] ", MedicalTheme::key_hint()),
        Span::styled("Reset ", MedicalTheme::key_desc()),
        Span::styled("[?] ", MedicalTheme::key_hint()),
        Span::styled("Feature Guide ", MedicalTheme::key_desc()),
        Span::styled("[Q] ", MedicalTheme::key_hint()),
        Span::styled("Quit", MedicalTheme::key_desc()),
    ]);

    let footer = Paragraph::new(vec![hint_line, keys]).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}

pub fn render_disclaimer(f: &mut Frame, area: Rect) {
    let text = Line::from(Span::styled(
        "DISCLAIMER: This tool provides indicative estimates and does not replace professional medical evaluation.",
        MedicalTheme::text_muted(),
    ));

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(MedicalTheme::border());

    let p = Paragraph::new(text).block(block).wrap(Wrap { trim: true });

    f.render_widget(p, area);
}
