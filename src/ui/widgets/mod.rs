//! Reusable widgets shared by several pages.

pub mod ad_banner;
pub mod footer;
pub mod revenue;
