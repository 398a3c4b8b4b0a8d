use ratatui::style::{Color, Modifier, Style};

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
    Unknown,
}

/// Detect terminal background type from the `COLORFGBG` environment variable.
///
/// The variable has the format `"foreground;background"`.  Background values
/// 0–6 are considered dark; 7–15 are considered light.  If the variable is
/// absent or unparseable, `BackgroundType::Dark` is returned.
pub fn detect_background() -> BackgroundType {
    if let Ok(val) = std::env::var("COLORFGBG") {
        if let Some(bg) = val.split(';').next_back() {
            if let Ok(bg_num) = bg.parse::<u8>() {
                return if bg_num <= 6 {
                    BackgroundType::Dark
                } else {
                    BackgroundType::Light
                };
            }
        }
    }
    BackgroundType::Dark
}

/// Every style the dashboard panels draw with.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Header ───────────────────────────────────────────────────────────────
    pub header: Style,
    pub header_accent: Style,
    pub separator: Style,
    pub border: Style,

    // ── Text ─────────────────────────────────────────────────────────────────
    pub text: Style,
    pub dim: Style,
    pub bold: Style,
    pub label: Style,
    pub value: Style,

    // ── Status ───────────────────────────────────────────────────────────────
    pub info: Style,
    pub success: Style,
    pub warning: Style,
    pub error: Style,

    // ── Charts ───────────────────────────────────────────────────────────────
    /// Bars of features that move with the target.
    pub positive: Style,
    /// Bars of features that move against it.
    pub negative: Style,
    pub weekday_bar: Style,
    pub weekend_bar: Style,
    pub trend_line: Style,
    pub axis: Style,

    // ── Date pickers ─────────────────────────────────────────────────────────
    pub picker_focused: Style,
    pub picker_idle: Style,
}

impl Theme {
    // ── Constructors ─────────────────────────────────────────────────────────

    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            header_accent: Style::default().fg(Color::Yellow),
            separator: Style::default().fg(Color::DarkGray),
            border: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            bold: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            label: Style::default().fg(Color::Gray),
            value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Cyan),
            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            positive: Style::default().fg(Color::Green),
            negative: Style::default().fg(Color::Red),
            weekday_bar: Style::default().fg(Color::Blue),
            weekend_bar: Style::default().fg(Color::LightRed),
            trend_line: Style::default().fg(Color::LightGreen),
            axis: Style::default().fg(Color::Gray),

            picker_focused: Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            picker_idle: Style::default().fg(Color::White),
        }
    }

    /// Light-background terminal theme.
    ///
    /// Uses dark colours for text and saturated accents so that content
    /// remains legible against a white/light-grey terminal canvas.
    pub fn light() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            header_accent: Style::default().fg(Color::Magenta),
            separator: Style::default().fg(Color::Gray),
            border: Style::default().fg(Color::Gray),

            text: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            bold: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            label: Style::default().fg(Color::DarkGray),
            value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Blue),
            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            positive: Style::default().fg(Color::Green),
            negative: Style::default().fg(Color::Red),
            weekday_bar: Style::default().fg(Color::Blue),
            weekend_bar: Style::default().fg(Color::Red),
            trend_line: Style::default().fg(Color::Green),
            axis: Style::default().fg(Color::DarkGray),

            picker_focused: Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            picker_idle: Style::default().fg(Color::Black),
        }
    }

    /// Classic terminal theme using only the basic 8-colour ANSI palette.
    ///
    /// Avoids bold modifiers to maximise compatibility with minimal terminal
    /// emulators.
    pub fn classic() -> Self {
        Self {
            header: Style::default().fg(Color::Cyan),
            header_accent: Style::default().fg(Color::White),
            separator: Style::default().fg(Color::DarkGray),
            border: Style::default().fg(Color::White),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            bold: Style::default().fg(Color::White),
            label: Style::default().fg(Color::Gray),
            value: Style::default().fg(Color::White),

            info: Style::default().fg(Color::Cyan),
            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            positive: Style::default().fg(Color::Green),
            negative: Style::default().fg(Color::Red),
            weekday_bar: Style::default().fg(Color::Blue),
            weekend_bar: Style::default().fg(Color::Red),
            trend_line: Style::default().fg(Color::Green),
            axis: Style::default().fg(Color::White),

            picker_focused: Style::default().fg(Color::Black).bg(Color::White),
            picker_idle: Style::default().fg(Color::White),
        }
    }

    /// Choose a theme automatically based on the detected terminal background.
    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Construct a theme by name.  Falls back to `auto_detect` for unknown
    /// names.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            "classic" => Self::classic(),
            _ => Self::auto_detect(),
        }
    }

    // ── Style helpers ────────────────────────────────────────────────────────

    /// Bar colour for a correlation coefficient. Zero and undefined values
    /// are drawn dim.
    pub fn correlation_style(&self, coefficient: Option<f64>) -> Style {
        match coefficient {
            Some(c) if c > 0.0 => self.positive,
            Some(c) if c < 0.0 => self.negative,
            _ => self.dim,
        }
    }

    pub fn picker_style(&self, focused: bool) -> Style {
        if focused {
            self.picker_focused
        } else {
            self.picker_idle
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
