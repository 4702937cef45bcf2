//! Feature reference: collapsed expander line and full overlay.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::tui::styles::MedicalTheme;

pub const REFERENCE_TITLE: &str = "Learn More About Each Feature";

/// (term, description, coded values)
const ENTRIES: &[(&str, &str, &[&str])] = &[
    ("Age", "Age in years", &[]),
    ("Sex", "Female (0), Male (1)", &[]),
    (
        "Chest Pain Type",
        "",
        &[
            "0: Typical Angina",
            "1: Atypical Angina",
            "2: Non-Anginal Pain",
            "3: Asymptomatic",
        ],
    ),
    ("Resting Blood Pressure", "mm Hg", &[]),
    ("Cholesterol", "mg/dl", &[]),
    ("Fasting Blood Sugar", "> 120 mg/dl (1 = Yes)", &[]),
    (
        "Resting ECG",
        "",
        &[
            "0: Normal",
            "1: ST-T wave abnormality",
            "2: Left Ventricular Hypertrophy",
        ],
    ),
    ("Max Heart Rate Achieved", "", &[]),
    ("Exercise-Induced Angina", "", &[]),
    ("Oldpeak", "ST depression induced by exercise", &[]),
    ("Slope", "", &["0: Upsloping", "1: Flat", "2: Downsloping"]),
    ("CA", "Major vessels (0-4)", &[]),
    (
        "Thal",
        "",
        &[
            "0: Normal",
            "1: Fixed Defect",
            "2: Reversible Defect",
            "3: Unknown",
        ],
    ),
];

/// Reference text, one entry per line with indented codes.
#[must_use]
pub fn reference_lines() -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (term, description, codes) in ENTRIES {
        let mut spans = vec![
            Span::styled("- ", MedicalTheme::text_muted()),
            Span::styled(*term, MedicalTheme::focused()),
        ];
        if !description.is_empty() {
            spans.push(Span::styled(": ", MedicalTheme::text_secondary()));
            spans.push(Span::styled(*description, MedicalTheme::text()));
        }
        lines.push(Line::from(spans));

        for code in *codes {
            lines.push(Line::from(vec![
                Span::raw("    - "),
                Span::styled(*code, MedicalTheme::text_secondary()),
            ]));
        }
    }
    lines
}

/// One-line expander shown while the reference is collapsed
pub fn render_reference_collapsed(f: &mut Frame, area: Rect) {
    let line = Line::from(vec![
        Span::styled(" ▸ ", MedicalTheme::key_hint()),
        Span::styled(REFERENCE_TITLE, MedicalTheme::text_secondary()),
        Span::styled("  [?] ", MedicalTheme::key_hint()),
        Span::styled("expand", MedicalTheme::key_desc()),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

/// Reference overlay centered over `area`
pub fn render_reference_overlay(f: &mut Frame, area: Rect) {
    let popup = centered_rect(70, 80, area);

    let block = Block::default()
        .title(Span::styled(
            format!(" ▾ {REFERENCE_TITLE} "),
            MedicalTheme::subtitle(),
        ))
        .title_bottom(Line::from(vec![
            Span::styled(" [?/Esc] ", MedicalTheme::key_hint()),
            Span::styled("close ", MedicalTheme::key_desc()),
        ]))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border_focused());

    let content = Paragraph::new(reference_lines())
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup);
    f.render_widget(content, popup);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
