//! String tables, startup language resolution and the locale context
//! handed to every screen.

pub mod catalog;
pub mod device;
pub mod locale_context;

pub use catalog::Catalog;
pub use device::{detect_device_language, resolve_language};
pub use locale_context::LocaleContext;
