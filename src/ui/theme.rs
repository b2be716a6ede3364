use ratatui::style::Color;

pub struct Theme {
    pub fg: Color,
    pub primary: Color,   // Blue
    pub secondary: Color, // Orange
    pub comment: Color,   // Grey
    pub success: Color,   // Green
    pub error: Color,     // Red
    pub border_focused: Color,
    pub current_line_bg: Color,
    pub header: Color,
    pub occupied: Color, // Programmed cells
    pub free: Color,     // Erased cells
}

pub const DEFAULT_THEME: Theme = Theme {
    fg: Color::Rgb(205, 214, 244),
    primary: Color::Rgb(137, 180, 250),   // Blue
    secondary: Color::Rgb(250, 179, 135), // Orange
    comment: Color::Rgb(108, 112, 134),
    success: Color::Rgb(166, 227, 161),
    error: Color::Rgb(243, 139, 168),
    border_focused: Color::Rgb(249, 226, 175), // Yellow border for focus
    current_line_bg: Color::Rgb(50, 50, 70),   // Slightly lighter BG for status bar
    header: Color::Rgb(249, 226, 175),         // Yellow for segment titles
    occupied: Color::Rgb(243, 139, 168),       // Red, space taken
    free: Color::Rgb(166, 227, 161),           // Green, space left
};
