use ratatui::style::Color;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Color,
    pub surface_bright: Color,
    pub text: Color,
    pub text_muted: Color,
    pub dim: Color,
    pub accent: Color,
    pub border: Color,
    pub border_focused: Color,
    pub positive: Color,
    pub negative: Color,
    pub error: Color,
    /// One color per chart slice, reused in order.
    pub palette: [Color; 5],
}

impl Theme {
    pub fn slice_color(&self, index: usize) -> Color {
        self.palette[index % self.palette.len()]
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::Rgb(8, 12, 16),
            surface_bright: Color::Rgb(20, 26, 32),
            text: Color::Rgb(220, 220, 220),
            text_muted: Color::Rgb(170, 170, 170),
            dim: Color::Rgb(140, 140, 140),
            accent: Color::Rgb(80, 160, 160),
            border: Color::Rgb(60, 70, 80),
            border_focused: Color::Rgb(80, 160, 160),
            positive: Color::Rgb(90, 180, 110),
            negative: Color::Rgb(210, 100, 90),
            error: Color::Rgb(200, 80, 80),
            palette: [
                Color::Rgb(0, 136, 254),
                Color::Rgb(0, 196, 159),
                Color::Rgb(255, 187, 40),
                Color::Rgb(255, 128, 66),
                Color::Rgb(168, 85, 247),
            ],
        }
    }
}
