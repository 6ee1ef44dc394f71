//! Output formatting

pub mod console;
pub mod formatter;

/// Force colored output on or off for the rest of the process.
pub fn set_color_enabled(enabled: bool) {
    colored::control::set_override(enabled);
}
