pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod dirs;
pub mod display;
pub mod logs;
pub mod prefs;
pub mod session;
pub mod storage;
pub mod table;
