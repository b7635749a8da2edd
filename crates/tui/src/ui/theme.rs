use ratatui::style::Color;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub surface: Color,
    pub text: Color,
    pub text_muted: Color,
    pub dim: Color,
    pub accent: Color,
    pub border: Color,
    pub border_focused: Color,
    pub positive: Color,
    pub negative: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            surface: Color::Rgb(20, 26, 32),
            text: Color::Rgb(220, 220, 220),
            text_muted: Color::Rgb(155, 155, 155),
            dim: Color::Rgb(120, 120, 120),
            accent: Color::Rgb(0, 173, 239),
            border: Color::Rgb(70, 80, 90),
            border_focused: Color::Rgb(0, 173, 239),
            positive: Color::Rgb(20, 207, 165),
            negative: Color::Rgb(232, 69, 34),
            error: Color::Rgb(254, 0, 66),
        }
    }
}
