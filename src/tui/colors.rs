//! Color constants for the terminal user interface.

use ratatui::style::Color;

/// Pie slice colours, in palette order (#ff9999, #99ff99, #9999ff).
pub const PIE_PALETTE: [Color; 3] = [
    Color::Rgb(0xff, 0x99, 0x99),
    Color::Rgb(0x99, 0xff, 0x99),
    Color::Rgb(0x99, 0x99, 0xff),
];

/// Border of the focused panel or field
pub const GOLD: Color = Color::Rgb(255, 215, 0);
/// Confirmation dialog background
pub const DARK_RED: Color = Color::Rgb(114, 0, 0);
/// Header and status bar background
pub const SIDEBAR_GREY: Color = Color::Rgb(0xf0, 0xf2, 0xf6);

/// Colour for a slice's palette index.
pub fn pie_color(index: usize) -> Color {
    PIE_PALETTE[index % PIE_PALETTE.len()]
}
