//! Terminal output for the CLI.
//!
//! Command results go to stdout; errors go to stderr so scripts can pipe
//! `tiller migrate status` without losing failures.

use std::fmt::Display;
use std::io::{self, BufRead, Write};

use owo_colors::OwoColorize;

/// Severity of a one-line message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Info,
    Warn,
    Error,
}

/// Print a one-line message prefixed with the tone's symbol.
pub fn message(tone: Tone, text: &str) {
    match tone {
        Tone::Success => println!("{} {}", "✔".green().bold(), text.green()),
        Tone::Info => println!("{} {}", "ℹ".blue().bold(), text),
        Tone::Warn => println!("{} {}", "⚠".yellow().bold(), text.yellow()),
        Tone::Error => eprintln!("{} {}", "✖".red().bold(), text.red()),
    }
}

/// Print a command title, underlined to its width.
pub fn title(text: &str) {
    println!();
    println!("{}", text.bold().cyan());
    println!("{}", "─".repeat(text.chars().count()).dimmed());
    println!();
}

/// Print a bold group label.
pub fn group(text: &str) {
    println!("{}", text.bold());
}

/// Print an indented `key: value` line.
pub fn field(key: &str, value: impl Display) {
    println!("  {}: {}", key.dimmed(), value);
}

/// Print a bulleted line.
pub fn item(text: &str) {
    println!("  {} {}", "•".dimmed(), text);
}

/// Print secondary, dimmed text.
pub fn note(text: &str) {
    println!("{}", text.dimmed());
}

/// Print an empty line.
pub fn blank() {
    println!();
}

/// Whether a unit is recorded in its ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitState {
    Applied,
    Pending,
}

/// Colored label for a unit's state.
pub fn badge(state: UnitState) -> String {
    match state {
        UnitState::Applied => "applied".green().to_string(),
        UnitState::Pending => "pending".yellow().to_string(),
    }
}

/// Ask a yes/no question on stdin. Anything but an explicit yes is a no.
pub fn confirm(prompt: &str) -> bool {
    print!("{} {} ", prompt, "[y/N]".dimmed());
    io::stdout().flush().ok();

    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => is_yes(&answer),
        Err(_) => false,
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
