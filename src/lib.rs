pub mod app;
pub mod config;
pub mod cursor;
pub mod equalizer;
pub mod field;
pub mod governor;
pub mod nav;
pub mod prefs;
pub mod render;
pub mod surface;
pub mod terminal;
