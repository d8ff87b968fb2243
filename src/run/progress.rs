use colored::Colorize;
use indicatif::ProgressStyle;

/// Spinner style used while commits are being made.
/// - Yellow spinner with animated braille-style frames.
/// - Displays the current message (`{wide_msg}`) next to the spinner.
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.yellow} {wide_msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"])
}

/// Style used when a run finishes successfully.
/// - Green check mark followed by the final message.
pub fn ok_style() -> ProgressStyle {
    finished_style(&"✔".green().to_string())
}

/// Style used when a run stops on an error.
/// - Red cross followed by the error message.
pub fn err_style() -> ProgressStyle {
    finished_style(&"✘".red().to_string())
}

fn finished_style(mark: &str) -> ProgressStyle {
    ProgressStyle::with_template(&format!("{} {{wide_msg}}", mark))
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}
