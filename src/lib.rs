//! AV Tutor: a quiz engine for the antivirus learning modules and the
//! Telegram presentation helpers that drive it.

pub mod config;
pub mod nav;
pub mod quiz;
pub mod render;
