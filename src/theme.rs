//! Color palette based on Nord, with Timor red as the brand accent.

use ratatui::style::Color;

// === Nord base ===
pub const NORD_POLAR_NIGHT_1: Color = Color::Rgb(46, 52, 64);
pub const NORD_POLAR_NIGHT_3: Color = Color::Rgb(67, 76, 94);
pub const NORD_POLAR_NIGHT_4: Color = Color::Rgb(76, 86, 106);
pub const NORD_SNOW_STORM_1: Color = Color::Rgb(216, 222, 233);
pub const NORD_SNOW_STORM_3: Color = Color::Rgb(236, 239, 244);
pub const NORD_FROST_2: Color = Color::Rgb(136, 192, 208);
pub const NORD_FROST_3: Color = Color::Rgb(129, 161, 193);
pub const NORD_RED: Color = Color::Rgb(191, 97, 106);
pub const NORD_YELLOW: Color = Color::Rgb(235, 203, 139);
pub const NORD_GREEN: Color = Color::Rgb(163, 190, 140);
pub const NORD_PURPLE: Color = Color::Rgb(180, 142, 173);

// === Semantic ===
pub const ACCENT_PRIMARY: Color = Color::Rgb(220, 38, 38);
pub const ACCENT_SECONDARY: Color = NORD_FROST_2;
pub const SUCCESS: Color = NORD_GREEN;
pub const WARNING: Color = NORD_YELLOW;
pub const ERROR: Color = NORD_RED;
pub const VIP: Color = NORD_YELLOW;

pub const TEXT_PRIMARY: Color = NORD_SNOW_STORM_3;
pub const TEXT_SECONDARY: Color = NORD_SNOW_STORM_1;
pub const INACTIVE: Color = NORD_POLAR_NIGHT_4;

pub const BORDER_FOCUSED: Color = NORD_FROST_2;
pub const BORDER_DEFAULT: Color = NORD_POLAR_NIGHT_3;

pub const ROW_SELECTED_BG: Color = NORD_POLAR_NIGHT_3;
pub const ROW_SELECTED_FG: Color = NORD_SNOW_STORM_3;
pub const OVERLAY_BG: Color = NORD_POLAR_NIGHT_1;
