pub mod format_utils;
pub mod label_utils;
