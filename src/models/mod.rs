pub mod confidence;
pub mod config;
pub mod history_record;
pub mod language;
pub mod prediction;
