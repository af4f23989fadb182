pub mod compact;
pub mod format;
