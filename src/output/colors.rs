use colored::Colorize;

use crate::models::Grade;

/// Format an audit grade with appropriate color
pub fn format_grade(grade: Grade) -> String {
    let text = grade.as_str();
    match grade {
        Grade::A => text.bright_green().bold().to_string(),
        Grade::B => text.green().bold().to_string(),
        Grade::C => text.yellow().bold().to_string(),
        Grade::D => text.red().to_string(),
        Grade::F => text.bright_red().bold().to_string(),
    }
}

/// Color a 0-100 score on the same bands as the grade
pub fn format_score(score: u8) -> String {
    let text = score.to_string();
    match Grade::from_score(score) {
        Grade::A | Grade::B => text.green().to_string(),
        Grade::C | Grade::D => text.yellow().to_string(),
        Grade::F => text.red().to_string(),
    }
}

/// Format a boolean as check/cross symbol
pub fn format_check(value: bool) -> String {
    if value {
        "✓".green().to_string()
    } else {
        "✗".red().to_string()
    }
}

/// Format days remaining with appropriate color
pub fn format_days_remaining(days: i64) -> String {
    if days < 0 {
        format!("{} (EXPIRED)", days).bright_red().bold().to_string()
    } else if days <= 7 {
        format!("{}", days).bright_red().bold().to_string()
    } else if days <= 30 {
        format!("{}", days).yellow().to_string()
    } else {
        format!("{}", days).green().to_string()
    }
}

/// Create a section header
pub fn section_header(title: &str) -> String {
    let line = "─".repeat(60);
    format!("{}\n{}\n", title.bold(), line.dimmed())
}

/// Create a main header with box drawing
pub fn main_header(title: &str) -> String {
    let line = "═".repeat(60);
    format!("\n{}\n{}\n", title.bold().cyan(), line.cyan())
}
