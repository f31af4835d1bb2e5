//! Color palette for the table UI.

use ratatui::style::Color;

// --- Background layers ---
pub const DEEPEST_BG: Color = Color::Black; // Terminal background
pub const CARD_BG: Color = Color::Black; // Panel/card backgrounds
pub const POPUP_BG: Color = Color::DarkGray; // Modal/popup backgrounds
pub const SHADOW: Color = Color::Black; // Modal drop shadow

// --- Borders ---
pub const BORDER_DIM: Color = Color::DarkGray;
pub const BORDER_ACTIVE: Color = Color::Cyan;

// --- Accent ---
pub const ACCENT: Color = Color::Cyan;

// --- Text ---
pub const TEXT_PRIMARY: Color = Color::White;
pub const TEXT_SECONDARY: Color = Color::Gray;
pub const TEXT_MUTED: Color = Color::DarkGray;
pub const TEXT_BRIGHT: Color = Color::White;
pub const CONTRAST_FG: Color = Color::Black; // Text on accent backgrounds

// --- Status ---
pub const STATUS_GREEN: Color = Color::Green; // Running/success
pub const STATUS_RED: Color = Color::Red; // Error/lost
pub const STATUS_YELLOW: Color = Color::Yellow; // Streaming/reconnecting

// --- Table ---
pub const ROW_CURSOR_BG: Color = Color::Rgb(30, 36, 48);
pub const LOCKED_CELL: Color = Color::Gray; // Non-editable columns
pub const SPARKLINE: Color = Color::Cyan;
