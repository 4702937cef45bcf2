//! Medical-themed color palette and styles.

use ratatui::style::{Color, Modifier, Style};

use crate::application::Headline;
use crate::domain::AdviceTier;

/// Medical theme color palette.
pub struct MedicalTheme;

impl MedicalTheme {
    /// Deep teal (trust, medical)
    pub const PRIMARY: Color = Color::Rgb(13, 148, 136); // #0D9488

    pub const PRIMARY_LIGHT: Color = Color::Rgb(45, 212, 191); // #2DD4BF

    /// Light slate for borders
    pub const SECONDARY_LIGHT: Color = Color::Rgb(148, 163, 184); // #94A3B8

    /// Emerald: healthy
    pub const SUCCESS: Color = Color::Rgb(16, 185, 129); // #10B981

    /// Amber: moderate risk
    pub const WARNING: Color = Color::Rgb(251, 191, 36); // #FBBF24

    /// Rose: disease / error
    pub const DANGER: Color = Color::Rgb(244, 63, 94); // #F43F5E

    pub const INFO: Color = Color::Rgb(59, 130, 246); // #3B82F6

    pub const BG_DARK: Color = Color::Rgb(15, 23, 42); // #0F172A

    pub const BG_SURFACE: Color = Color::Rgb(30, 41, 59); // #1E293B

    pub const TEXT_PRIMARY: Color = Color::Rgb(248, 250, 252); // #F8FAFC

    pub const TEXT_SECONDARY: Color = Color::Rgb(148, 163, 184); // #94A3B8

    pub const TEXT_MUTED: Color = Color::Rgb(100, 116, 139); // #64748B

    /// Balloon colors for the negative-result cue
    pub const BALLOONS: [Color; 5] = [
        Self::DANGER,
        Self::WARNING,
        Self::SUCCESS,
        Self::INFO,
        Self::PRIMARY_LIGHT,
    ];

    /// Style for titles
    #[must_use]
    pub fn title() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for subtitles
    #[must_use]
    pub fn subtitle() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    #[must_use]
    pub fn text_secondary() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    #[must_use]
    pub fn text_muted() -> Style {
        Style::default().fg(Self::TEXT_MUTED)
    }

    #[must_use]
    pub fn success() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    #[must_use]
    pub fn warning() -> Style {
        Style::default().fg(Self::WARNING)
    }

    #[must_use]
    pub fn danger() -> Style {
        Style::default().fg(Self::DANGER)
    }

    #[must_use]
    pub fn info() -> Style {
        Style::default().fg(Self::INFO)
    }

    /// Style for the chosen option of a choice control
    #[must_use]
    pub fn selected() -> Style {
        Style::default()
            .fg(Self::BG_DARK)
            .bg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for focused elements
    #[must_use]
    pub fn focused() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn border() -> Style {
        Style::default().fg(Self::SECONDARY_LIGHT)
    }

    #[must_use]
    pub fn border_focused() -> Style {
        Style::default().fg(Self::PRIMARY)
    }

    /// Style for the Predict button
    #[must_use]
    pub fn button() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .bg(Self::BG_SURFACE)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_desc() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    /// Headline style: danger for a positive prediction, success otherwise
    #[must_use]
    pub fn headline(headline: Headline) -> Style {
        let style = match headline {
            Headline::DiseaseDetected => Self::danger(),
            Headline::NoDiseaseDetected => Self::success(),
        };
        style.add_modifier(Modifier::BOLD)
    }

    /// Advice tier style
    #[must_use]
    pub fn tier(tier: AdviceTier) -> Style {
        match tier {
            AdviceTier::Healthy => Self::success(),
            AdviceTier::Mild => Self::info(),
            AdviceTier::Moderate => Self::warning(),
            AdviceTier::Urgent => Self::danger(),
        }
    }

    /// Gauge style for a positive-class probability
    #[must_use]
    pub fn probability(probability: f64) -> Style {
        if probability >= 0.7 {
            Self::danger()
        } else if probability >= 0.4 {
            Self::warning()
        } else {
            Self::success()
        }
    }
}

/// Inline logo for the header
pub const LOGO_SMALL: &str = "CardioPredict";
