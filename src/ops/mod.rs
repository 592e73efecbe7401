pub mod clipboard;
pub mod compose;
