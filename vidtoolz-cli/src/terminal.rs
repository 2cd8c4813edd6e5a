// ============================================================================
// vidtoolz-cli/src/terminal.rs
// ============================================================================
//
// TERMINAL OUTPUT: Styled result lines and aligned listings
//
// Result lines go to stdout. Styling is applied only when stdout is a
// terminal and NO_COLOR is unset, so piped output and test captures stay
// plain text.

use std::io::IsTerminal;

use owo_colors::OwoColorize;
use unicode_width::UnicodeWidthStr;

/// Styling constants for terminal output
pub mod styling {
    pub const SUCCESS_SYMBOL: &str = "✓";
    pub const ERROR_SYMBOL: &str = "✗";

    /// Width of the name column in the command listing
    pub const COMMAND_COLUMN_WIDTH: usize = 20;
}

/// Check if color should be used
pub fn should_use_color() -> bool {
    std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
}

/// Pads `text` with spaces to `width` display columns.
#[must_use]
pub fn pad_to_width(text: &str, width: usize) -> String {
    let current = UnicodeWidthStr::width(text);
    format!("{}{}", text, " ".repeat(width.saturating_sub(current)))
}

/// One line of the command listing: ` {name:<20} {description}`.
#[must_use]
pub fn command_line(name: &str, description: &str) -> String {
    format!(
        " {} {}",
        pad_to_width(name, styling::COMMAND_COLUMN_WIDTH),
        description
    )
    .trim_end()
    .to_string()
}

/// Prints a success line such as `Video clipped and saved to out.mp4`.
pub fn print_success(message: &str) {
    if should_use_color() {
        println!("{} {}", styling::SUCCESS_SYMBOL.green(), message);
    } else {
        println!("{message}");
    }
}

/// Prints an error line to stdout. Command failures are results, not crashes,
/// so they share the result stream.
pub fn print_error(message: &str) {
    if should_use_color() {
        println!("{} {}", styling::ERROR_SYMBOL.red(), message.red());
    } else {
        println!("{message}");
    }
}

/// Prints a bold heading line.
pub fn print_heading(title: &str) {
    if should_use_color() {
        println!("{}", title.bold());
    } else {
        println!("{title}");
    }
}

/// Prints captured tool output verbatim.
pub fn print_block(text: &str) {
    println!("{text}");
}
