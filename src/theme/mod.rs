//! Theme system for human-mode output.

use console::Style;

/// Visual theme for cheatx human-mode output.
///
/// Centralizes colors and styles for consistent rendering.
#[derive(Debug, Clone)]
pub struct CxTheme {
    // Brand colors
    pub accent: Style,
    pub success: Style,
    pub error: Style,
    pub warning: Style,
    pub muted: Style,

    // Component styles
    pub header: Style,
    pub label: Style,
    pub value: Style,
    pub path: Style,
    pub profile_id: Style,
    pub blocking: Style,
    pub advisory: Style,
}

impl Default for CxTheme {
    fn default() -> Self {
        Self {
            accent: Style::new().color256(33),
            success: Style::new().color256(41),
            error: Style::new().color256(203),
            warning: Style::new().color256(214),
            muted: Style::new().color256(245),
            header: Style::new().bold().color256(33),
            label: Style::new().dim(),
            value: Style::new().bold(),
            path: Style::new().cyan(),
            profile_id: Style::new().italic().color256(245),
            blocking: Style::new().bold().color256(203),
            advisory: Style::new().bold().color256(214),
        }
    }
}

impl CxTheme {
    /// Same layout with every style stripped (for `--no-color`).
    pub fn plain() -> Self {
        Self {
            accent: Style::new(),
            success: Style::new(),
            error: Style::new(),
            warning: Style::new(),
            muted: Style::new(),
            header: Style::new(),
            label: Style::new(),
            value: Style::new(),
            path: Style::new(),
            profile_id: Style::new(),
            blocking: Style::new(),
            advisory: Style::new(),
        }
    }
}
