use crate::output::is_quiet;
use crate::ui::{theme, Icons, Role};

pub fn header(text: &str) {
    if is_quiet() {
        return;
    }
    println!("{} {}", Icons::ROCKET, theme().paint(Role::Header, text));
}

pub fn status(icon: &str, label: &str, value: &str) {
    println!("{} {}: {}", icon, theme().paint(Role::Dim, label), value);
}

pub fn success(label: &str) {
    println!("{} {}", Icons::CHECK, theme().paint(Role::Success, label));
}

pub fn error(label: &str) {
    eprintln!("{} {}", Icons::CROSS, theme().paint(Role::Error, label));
}

pub fn warn(label: &str) {
    eprintln!("{} {}", Icons::WARN, theme().paint(Role::Warn, label));
}

pub fn info(label: &str, value: &str) {
    println!(
        "{} {}: {}",
        theme().paint(Role::Info, Icons::INFO),
        theme().paint(Role::Dim, label),
        value
    );
}

/// Heading above one report; always printed since it names the table below it
pub fn section(title: &str) {
    println!();
    println!("━{}━", theme().paint(Role::Header, title));
}

pub fn dim(text: &str) -> String {
    theme().paint(Role::Dim, text)
}

pub fn muted(text: &str) -> String {
    theme().paint(Role::Muted, text)
}

pub fn phase(name: &str) {
    if is_quiet() {
        return;
    }
    println!();
    println!(
        "{} {}",
        theme().paint(Role::Info, Icons::GEAR),
        theme().paint(Role::Header, name)
    );
}

pub fn summary_row(label: &str, value: &str) {
    println!("  {} {}", theme().paint(Role::Dim, label), value);
}
