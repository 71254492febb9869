use colored::Colorize;
use std::fmt::Display;
use std::path::Path;

const FALLBACK_PROGRAM_NAME: &str = "venv";

/// Basename of the name this program was invoked as.
pub fn program_name() -> String {
    std::env::args_os()
        .next()
        .as_deref()
        .and_then(|arg0| Path::new(arg0).file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| FALLBACK_PROGRAM_NAME.to_string())
}

/// Write a diagnostic line to stderr, prefixed with the program name.
pub fn notice(message: impl Display) {
    eprintln!("{}: {}", program_name(), message);
}

pub fn error(message: impl Display) {
    notice(format_args!("{} {}", "Error:".red().bold(), message));
}

pub fn fatal(message: impl Display) {
    notice(format_args!("{} {}", "Fatal:".red().bold(), message));
}
