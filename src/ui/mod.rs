pub mod app;
pub mod board;
pub mod config;
pub mod controls;
pub mod dialogs;
pub mod error;
pub mod hud;
pub mod records;
pub mod sound;
pub mod state;
