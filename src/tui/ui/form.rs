//! Heart disease input form: 13 bounded controls in three groups.

use std::ops::Range;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::domain::{Feature, FeatureDomain, FeatureVector, FEATURE_COUNT};
use crate::tui::styles::MedicalTheme;

/// Longest numeric entry accepted by the edit buffer
const MAX_EDIT_LEN: usize = 6;

/// Width of the slider track in cells
const SLIDER_WIDTH: usize = 20;

/// How a control is drawn and edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    Slider,
    NumberInput,
    Radio,
    Select,
}

impl ControlKind {
    fn accepts_typing(self) -> bool {
        matches!(self, Self::Slider | Self::NumberInput)
    }
}

/// One form control bound to a feature.
#[derive(Debug, Clone)]
pub struct FormControl {
    pub feature: Feature,
    pub label: &'static str,
    pub hint: Option<&'static str>,
    pub kind: ControlKind,
    value: f64,
    /// Uncommitted typed text
    edit: Option<String>,
}

impl FormControl {
    fn new(feature: Feature, label: &'static str, kind: ControlKind) -> Self {
        Self {
            feature,
            label,
            hint: None,
            kind,
            value: feature.default_value(),
            edit: None,
        }
    }

    fn with_hint(mut self, hint: &'static str) -> Self {
        self.hint = Some(hint);
        self
    }

    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    #[must_use]
    pub fn domain(&self) -> FeatureDomain {
        self.feature.domain()
    }

    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.edit.is_some()
    }

    /// Text shown in the control: the edit buffer while typing, the
    /// formatted value otherwise.
    #[must_use]
    pub fn display_value(&self) -> String {
        match &self.edit {
            Some(buffer) => buffer.clone(),
            None => self.domain().format(self.value),
        }
    }

    fn set(&mut self, value: f64) -> bool {
        let value = self.domain().clamp(value);
        let changed = value != self.value;
        self.value = value;
        changed
    }

    /// Parse the edit buffer into the value. Unparsable text is dropped.
    fn commit_edit(&mut self) -> bool {
        match self.edit.take() {
            Some(buffer) => match buffer.parse::<f64>() {
                Ok(value) => self.set(value),
                Err(_) => false,
            },
            None => false,
        }
    }

    fn step_by(&mut self, steps: f64) -> bool {
        let committed = self.commit_edit();
        let domain = self.domain();
        self.set(self.value + steps * domain.step()) || committed
    }

    fn input_char(&mut self, c: char) -> bool {
        if self.kind.accepts_typing() {
            let decimal = matches!(self.domain(), FeatureDomain::Decimal { .. });
            let buffer = self.edit.get_or_insert_with(String::new);
            let accepted =
                c.is_ascii_digit() || (c == '.' && decimal && !buffer.contains('.'));
            if accepted && buffer.len() < MAX_EDIT_LEN {
                buffer.push(c);
            }
            // Typed text only counts as a change once committed
            return false;
        }

        match c.to_digit(10) {
            Some(code) if self.domain().contains(f64::from(code)) => self.set(f64::from(code)),
            _ => false,
        }
    }

    fn delete_char(&mut self) {
        if !self.kind.accepts_typing() {
            return;
        }
        let current = self.display_value();
        let buffer = self.edit.get_or_insert(current);
        buffer.pop();
    }
}

/// Input form state
#[derive(Debug, Clone)]
pub struct InputFormState {
    pub controls: Vec<FormControl>,
    pub selected: usize,
}

impl Default for InputFormState {
    fn default() -> Self {
        use ControlKind::{NumberInput, Radio, Select, Slider};

        let controls = vec![
            // Vitals
            FormControl::new(Feature::Age, "Age", Slider),
            FormControl::new(Feature::RestingBp, "Resting Blood Pressure", Slider),
            FormControl::new(Feature::Cholesterol, "Cholesterol", Slider),
            FormControl::new(
                Feature::FastingBloodSugar,
                "Fasting Blood Sugar > 120 mg/dl?",
                Radio,
            ),
            // Symptoms
            FormControl::new(Feature::Sex, "Sex", Radio),
            FormControl::new(Feature::ChestPainType, "Chest Pain Type", Select),
            FormControl::new(Feature::MaxHeartRate, "Maximum Heart Rate Achieved", NumberInput)
                .with_hint("This is the highest heart rate you achieved during a stress test."),
            FormControl::new(Feature::ExerciseAngina, "Exercise-Induced Angina?", Radio),
            // Cardiac tests
            FormControl::new(Feature::RestingEcg, "Resting ECG Results", Select),
            FormControl::new(Feature::StDepression, "ST Depression", NumberInput).with_hint(
                "ST depression induced by exercise relative to rest. Higher values may indicate higher risk.",
            ),
            FormControl::new(Feature::StSlope, "Slope of ST Segment", Select),
            FormControl::new(Feature::VesselCount, "# of Major Vessels Colored", Select),
            FormControl::new(Feature::Thalassemia, "Thalassemia", Select),
        ];
        debug_assert_eq!(controls.len(), FEATURE_COUNT);

        Self {
            controls,
            selected: 0,
        }
    }
}

impl InputFormState {
    /// Group titles and the control indices they hold, left to right.
    #[must_use]
    pub fn groups() -> [(&'static str, Range<usize>); 3] {
        [
            ("Vitals", 0..4),
            ("Symptoms", 4..8),
            ("Cardiac Tests", 8..13),
        ]
    }

    #[must_use]
    pub fn selected_control(&self) -> &FormControl {
        &self.controls[self.selected]
    }

    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.selected_control().is_editing()
    }

    /// Move focus to the next control. Returns whether a value changed.
    pub fn next_control(&mut self) -> bool {
        let changed = self.controls[self.selected].commit_edit();
        self.selected = (self.selected + 1) % self.controls.len();
        changed
    }

    /// Move focus to the previous control. Returns whether a value changed.
    pub fn prev_control(&mut self) -> bool {
        let changed = self.controls[self.selected].commit_edit();
        if self.selected == 0 {
            self.selected = self.controls.len() - 1;
        } else {
            self.selected -= 1;
        }
        changed
    }

    /// Step the focused control by `steps` domain steps.
    pub fn step(&mut self, steps: f64) -> bool {
        self.controls[self.selected].step_by(steps)
    }

    /// Jump the focused control to its lowest value.
    pub fn jump_to_min(&mut self) -> bool {
        let control = &mut self.controls[self.selected];
        control.edit = None;
        let min = control.domain().min();
        control.set(min)
    }

    /// Jump the focused control to its highest value.
    pub fn jump_to_max(&mut self) -> bool {
        let control = &mut self.controls[self.selected];
        control.edit = None;
        let max = control.domain().max();
        control.set(max)
    }

    /// Type into the focused control.
    pub fn input_char(&mut self, c: char) -> bool {
        self.controls[self.selected].input_char(c)
    }

    /// Delete the last typed character of the focused control.
    pub fn delete_char(&mut self) {
        self.controls[self.selected].delete_char();
    }

    /// Drop uncommitted text in the focused control.
    pub fn cancel_edit(&mut self) {
        self.controls[self.selected].edit = None;
    }

    /// Restore every control to its default. Returns whether anything changed.
    pub fn reset(&mut self) -> bool {
        let mut changed = false;
        for control in &mut self.controls {
            control.edit = None;
            let default = control.feature.default_value();
            changed |= control.set(default);
        }
        changed
    }

    /// Commit pending edits and capture the current values.
    pub fn snapshot(&mut self) -> FeatureVector {
        for control in &mut self.controls {
            control.commit_edit();
        }

        let mut values = [0.0; FEATURE_COUNT];
        for control in &self.controls {
            values[control.feature.index()] = control.value;
        }
        FeatureVector::from_array(values)
    }
}

/// Render the input form
pub fn render_input_form(f: &mut Frame, area: Rect, state: &InputFormState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    for (column, (title, range)) in columns.iter().zip(InputFormState::groups()) {
        render_group(f, *column, title, range, state);
    }
}

fn render_group(f: &mut Frame, area: Rect, title: &str, range: Range<usize>, state: &InputFormState) {
    let block = Block::default()
        .title(Span::styled(format!(" {title} "), MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let constraints: Vec<Constraint> = range
        .clone()
        .map(|_| Constraint::Length(3))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (chunk, index) in chunks.iter().zip(range) {
        render_control(f, *chunk, &state.controls[index], index == state.selected);
    }
}

fn render_control(f: &mut Frame, area: Rect, control: &FormControl, focused: bool) {
    let (border_style, title_style) = if focused {
        (MedicalTheme::border_focused(), MedicalTheme::focused())
    } else {
        (MedicalTheme::border(), MedicalTheme::text_secondary())
    };

    let block = Block::default()
        .title(Span::styled(format!(" {} ", control.label), title_style))
        .borders(Borders::ALL)
        .border_style(border_style);

    let line = match control.kind {
        ControlKind::Slider => slider_line(control, focused),
        ControlKind::NumberInput => number_line(control, focused),
        ControlKind::Radio => radio_line(control),
        ControlKind::Select => select_line(control, focused),
    };

    f.render_widget(Paragraph::new(line).block(block), area);
}

fn slider_line(control: &FormControl, focused: bool) -> Line<'static> {
    let domain = control.domain();
    let span = domain.max() - domain.min();
    let fraction = if span > 0.0 {
        (control.value - domain.min()) / span
    } else {
        0.0
    };
    let filled = ((fraction * SLIDER_WIDTH as f64).round() as usize).min(SLIDER_WIDTH);

    let mut spans = value_spans(control, focused);
    spans.push(Span::raw(" "));
    spans.push(Span::styled("█".repeat(filled), MedicalTheme::focused()));
    spans.push(Span::styled(
        "░".repeat(SLIDER_WIDTH - filled),
        MedicalTheme::text_muted(),
    ));
    Line::from(spans)
}

fn number_line(control: &FormControl, focused: bool) -> Line<'static> {
    Line::from(value_spans(control, focused))
}

fn value_spans(control: &FormControl, focused: bool) -> Vec<Span<'static>> {
    let arrow = if focused {
        MedicalTheme::key_hint()
    } else {
        MedicalTheme::text_muted()
    };
    let mut spans = vec![
        Span::styled(" ◀ ", arrow),
        Span::styled(format!("{:>5}", control.display_value()), MedicalTheme::text()),
    ];
    if control.is_editing() {
        spans.push(Span::styled("▌", MedicalTheme::focused()));
    }
    spans.push(Span::styled(" ▶", arrow));
    spans
}

fn radio_line(control: &FormControl) -> Line<'static> {
    let FeatureDomain::Categorical(options) = control.domain() else {
        return Line::from(control.display_value());
    };

    let chosen = control.value.round() as usize;
    let mut spans = vec![Span::raw(" ")];
    for (code, label) in options.iter().enumerate() {
        let (marker, style) = if code == chosen {
            ("(•) ", MedicalTheme::focused())
        } else {
            ("( ) ", MedicalTheme::text_secondary())
        };
        spans.push(Span::styled(format!("{marker}{label}  "), style));
    }
    Line::from(spans)
}

fn select_line(control: &FormControl, focused: bool) -> Line<'static> {
    let domain = control.domain();
    let arrow = if focused {
        MedicalTheme::key_hint()
    } else {
        MedicalTheme::text_muted()
    };
    Line::from(vec![
        Span::styled(" ◀ ", arrow),
        Span::styled(control.display_value(), MedicalTheme::selected()),
        Span::styled(" ▶ ", arrow),
        Span::styled(
            format!("({}/{})", control.value as usize + 1, domain.max() as usize + 1),
            MedicalTheme::text_muted(),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn focus(form: &mut InputFormState, feature: Feature) {
        form.selected = form
            .controls
            .iter()
            .position(|c| c.feature == feature)
            .expect("feature has a control");
    }

    #[test]
    fn test_defaults_match_feature_defaults() {
        let mut form = InputFormState::default();
        assert_eq!(form.snapshot(), FeatureVector::default());

        // Every feature appears exactly once
        let mut seen: Vec<Feature> = form.controls.iter().map(|c| c.feature).collect();
        seen.sort_by_key(|f| f.index());
        assert_eq!(seen, Feature::ALL.to_vec());
    }

    #[test]
    fn test_step_clamps_at_bounds() {
        let mut form = InputFormState::default();
        focus(&mut form, Feature::Age);

        assert!(form.jump_to_max());
        assert!(!form.step(1.0));
        assert_eq!(form.snapshot().age, 120);

        assert!(form.step(-10.0));
        assert_eq!(form.snapshot().age, 110);

        assert!(form.jump_to_min());
        assert!(!form.step(-10.0));
        assert_eq!(form.snapshot().age, 1);
    }

    #[test]
    fn test_decimal_steps_stay_on_grid() {
        let mut form = InputFormState::default();
        focus(&mut form, Feature::StDepression);

        for _ in 0..3 {
            form.step(1.0);
        }
        assert!((form.snapshot().st_depression - 1.3).abs() < 1e-9);
        assert_eq!(form.selected_control().display_value(), "1.3");
    }

    #[test]
    fn test_typed_value_commits_clamped_on_focus_move() {
        let mut form = InputFormState::default();
        focus(&mut form, Feature::MaxHeartRate);

        for c in "999".chars() {
            assert!(!form.input_char(c));
        }
        assert!(form.is_editing());
        assert_eq!(form.selected_control().display_value(), "999");

        assert!(form.next_control());
        assert_eq!(form.snapshot().max_heart_rate, 250);
    }

    #[test]
    fn test_typed_decimal_rounds_to_step() {
        let mut form = InputFormState::default();
        focus(&mut form, Feature::StDepression);

        for c in "2.34".chars() {
            form.input_char(c);
        }
        // A second '.' is ignored
        form.input_char('.');
        assert_eq!(form.selected_control().display_value(), "2.34");
        assert!((form.snapshot().st_depression - 2.3).abs() < 1e-9);
    }

    #[test]
    fn test_unparsable_edit_is_discarded() {
        let mut form = InputFormState::default();
        focus(&mut form, Feature::Cholesterol);

        form.delete_char();
        form.delete_char();
        form.delete_char();
        assert_eq!(form.selected_control().display_value(), "");
        assert!(!form.next_control());
        assert_eq!(form.snapshot().cholesterol, 200);
    }

    #[test]
    fn test_digit_selects_valid_choice() {
        let mut form = InputFormState::default();
        focus(&mut form, Feature::Thalassemia);

        assert!(form.input_char('2'));
        assert_eq!(form.selected_control().display_value(), "Reversible Defect");
        assert!(!form.input_char('7'));
        assert!(!form.input_char('x'));
        assert_eq!(form.snapshot().thalassemia, 2);
    }

    #[test]
    fn test_choice_steps_do_not_wrap() {
        let mut form = InputFormState::default();
        focus(&mut form, Feature::Sex);

        assert!(!form.step(-1.0));
        assert!(form.step(1.0));
        assert!(!form.step(1.0));
        assert_eq!(form.snapshot().sex, 1);
    }

    #[test]
    fn test_navigation_wraps() {
        let mut form = InputFormState::default();
        form.prev_control();
        assert_eq!(form.selected, FEATURE_COUNT - 1);
        form.next_control();
        assert_eq!(form.selected, 0);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut form = InputFormState::default();
        assert!(!form.reset());

        focus(&mut form, Feature::VesselCount);
        form.input_char('3');
        focus(&mut form, Feature::Age);
        form.step(5.0);

        assert!(form.reset());
        assert_eq!(form.snapshot(), FeatureVector::default());
    }

    #[test]
    fn test_groups_cover_all_controls() {
        let covered: usize = InputFormState::groups().iter().map(|(_, r)| r.len()).sum();
        assert_eq!(covered, FEATURE_COUNT);
    }
}
