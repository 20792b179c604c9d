//! Console output for the command handlers.

use colored::Colorize;

pub fn display(info: &str) {
    println!("{}", info);
}

pub fn display_notification(info: &str) {
    println!("{}", info.green());
}

pub fn display_warning(warning: &str) {
    println!("{}", warning.yellow());
}

pub fn display_error(error: &str) {
    eprintln!("{}", error.red());
}
