pub mod history_screen;
pub mod home_screen;
pub mod learn_screen;
pub mod navigation;
pub mod settings_screen;
