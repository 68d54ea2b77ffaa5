use colored::Color;

pub const PRIMARY: Color = Color::BrightGreen;
pub const ACCENT: Color = Color::Cyan;
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;
pub const IPV4_ADDR: Color = Color::BrightBlue;
pub const KNOWN_DEVICE: Color = Color::Green;
pub const UNKNOWN_DEVICE: Color = Color::Yellow;
pub const VANISHED: Color = Color::Red;
