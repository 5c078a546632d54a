pub mod app;
pub mod i18n;
pub mod models;
pub mod screens;
pub mod services;
pub mod utils;
