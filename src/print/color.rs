//! ANSI colors for console output

/// Escape sequence that restores the terminal's default color
pub const RESET: &str = "\x1B[0m";

/// Console color of a message
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PrintColor {
    #[default]
    Normal,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl PrintColor {
    /// Escape sequence written before a message of this color
    pub fn ansi_code(&self) -> &'static str {
        match self {
            PrintColor::Normal => RESET,
            PrintColor::Red => "\x1B[31m",
            PrintColor::Green => "\x1B[32m",
            PrintColor::Yellow => "\x1B[33m",
            PrintColor::Blue => "\x1B[34m",
            PrintColor::Magenta => "\x1B[35m",
            PrintColor::Cyan => "\x1B[36m",
            PrintColor::White => "\x1B[37m",
        }
    }
}
