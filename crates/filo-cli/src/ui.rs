//! Terminal output helpers
//!
//! Plain ANSI escapes behind small functions; color switches off for
//! non-TTY output or when NO_COLOR is set.

use std::io::{self, BufRead, IsTerminal, Write};

fn color_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal()
}

fn paint(code: &str, text: &str) -> String {
    if color_enabled() {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}

pub fn cyan(text: &str) -> String {
    paint("36", text)
}

pub fn green(text: &str) -> String {
    paint("32", text)
}

pub fn yellow(text: &str) -> String {
    paint("33", text)
}

pub fn red(text: &str) -> String {
    paint("31", text)
}

pub fn gray(text: &str) -> String {
    paint("90", text)
}

pub fn bold(text: &str) -> String {
    paint("1", text)
}

pub fn bold_cyan(text: &str) -> String {
    paint("1;36", text)
}

/// Startup banner
pub fn banner() {
    println!();
    println!("{}", cyan("  ███████╗██╗██╗      ██████╗ "));
    println!("{}", cyan("  ██╔════╝██║██║     ██╔═══██╗"));
    println!("{}", cyan("  █████╗  ██║██║     ██║   ██║"));
    println!("{}", cyan("  ██╔══╝  ██║██║     ██║   ██║"));
    println!("{}", cyan("  ██║     ██║███████╗╚██████╔╝"));
    println!("{}", cyan("  ╚═╝     ╚═╝╚══════╝ ╚═════╝ "));
    println!(
        "{}",
        gray(&format!(
            "  a file organizer that learns your habits  v{}",
            env!("CARGO_PKG_VERSION")
        ))
    );
    println!();
}

/// Titled section
pub fn title(icon: &str, text: &str) {
    println!("\n{} {}", icon, bold_cyan(text));
}

pub fn success(msg: &str) {
    println!("  {} {}", green("\u{2713}"), msg);
}

pub fn error(msg: &str) {
    println!("  {} {}", red("\u{2717}"), msg);
}

pub fn warning(msg: &str) {
    println!("  {} {}", yellow("\u{26a0}"), msg);
}

pub fn info(msg: &str) {
    println!("  {}", msg);
}

pub fn dim(msg: &str) {
    println!("  {}", gray(msg));
}

pub fn divider() {
    println!("{}", gray(&"\u{2500}".repeat(55)));
}

/// Boxed panel with a centered title
pub fn box_panel(title: &str, lines: &[String]) {
    const WIDTH: usize = 55;

    println!("{}", cyan(&format!("\u{256d}{}\u{256e}", "\u{2500}".repeat(WIDTH - 2))));

    let title_width = display_width(title);
    let left = (WIDTH - 4).saturating_sub(title_width) / 2;
    let right = (WIDTH - 4).saturating_sub(left + title_width);
    println!(
        "{}{}{}{}{}",
        cyan("\u{2502}"),
        " ".repeat(left + 1),
        bold(title),
        " ".repeat(right + 1),
        cyan("\u{2502}")
    );

    println!("{}", cyan(&format!("\u{251c}{}\u{2524}", "\u{2500}".repeat(WIDTH - 2))));

    for line in lines {
        let padding = (WIDTH - 4).saturating_sub(display_width(line));
        println!(
            "{} {}{} {}",
            cyan("\u{2502}"),
            line,
            " ".repeat(padding),
            cyan("\u{2502}")
        );
    }

    println!("{}", cyan(&format!("\u{2570}{}\u{256f}", "\u{2500}".repeat(WIDTH - 2))));
}

/// Display width: non-ASCII counts double (CJK-ish approximation)
fn display_width(s: &str) -> usize {
    s.chars().map(|c| if (c as u32) > 127 { 2 } else { 1 }).sum()
}

/// Icon for a classification source
pub fn source_icon(source: filo_core::Source) -> &'static str {
    match source {
        filo_core::Source::Rule => "\u{1f4cb}",
        filo_core::Source::Vector => "\u{1f9ed}",
        filo_core::Source::History => "\u{1f9e0}",
        filo_core::Source::Llm => "\u{1f916}",
        filo_core::Source::Error => "\u{2753}",
    }
}

/// Icon for a confidence level
pub fn confidence_icon(confidence: f64) -> String {
    if confidence >= 0.8 {
        green("\u{2713}")
    } else if confidence >= 0.5 {
        yellow("\u{25d0}")
    } else {
        red("\u{25cb}")
    }
}

/// Human-readable byte size
pub fn format_size(size: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;

    let size = size as f64;
    if size >= GB {
        format!("{:.1} GB", size / GB)
    } else if size >= MB {
        format!("{:.1} MB", size / MB)
    } else if size >= KB {
        format!("{:.1} KB", size / KB)
    } else {
        format!("{} B", size)
    }
}

/// Confirmation prompt; with `default_yes`, plain Enter accepts
pub fn confirm(prompt: &str, default_yes: bool) -> bool {
    let hint = if default_yes { "[Y/n]" } else { "[y/N]" };
    print!("{} {}: ", prompt, hint);
    io::stdout().flush().ok();

    let input = read_line();
    if default_yes {
        input.is_empty() || input == "y" || input == "yes"
    } else {
        input == "y" || input == "yes"
    }
}

/// Confirmation for destructive operations; only an explicit `y` accepts
pub fn confirm_danger(prompt: &str) -> bool {
    print!("{} {} [y/N]: ", yellow("\u{26a0}"), prompt);
    io::stdout().flush().ok();
    read_line() == "y"
}

/// Read one trimmed, lowercased line from stdin
pub fn read_line() -> String {
    let mut input = String::new();
    io::stdin().lock().read_line(&mut input).ok();
    input.trim().to_lowercase()
}

/// Read one trimmed line preserving case (for category names)
pub fn read_line_raw() -> String {
    let mut input = String::new();
    io::stdin().lock().read_line(&mut input).ok();
    input.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.0 GB");
    }

    #[test]
    fn test_display_width_counts_wide_chars() {
        assert_eq!(display_width("abc"), 3);
        assert_eq!(display_width("\u{6587}\u{4ef6}"), 4);
    }
}
