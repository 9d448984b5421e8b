use owo_colors::{OwoColorize, Style};
use std::fmt::Display;
use std::sync::OnceLock;

static THEME: OnceLock<Theme> = OnceLock::new();

/// What a piece of terminal text is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Header,
    Success,
    Error,
    Warn,
    Info,
    Dim,
    Muted,
}

impl Role {
    fn style(self) -> Style {
        match self {
            Role::Header => Style::new().cyan().bold(),
            Role::Success => Style::new().green().bold(),
            Role::Error => Style::new().red().bold(),
            Role::Warn => Style::new().yellow().bold(),
            Role::Info => Style::new().magenta(),
            Role::Dim => Style::new().white().dimmed(),
            Role::Muted => Style::new().bright_black(),
        }
    }

    /// Errors and warnings are written to stderr
    pub fn on_stderr(self) -> bool {
        matches!(self, Role::Error | Role::Warn)
    }
}

/// Whether each output stream gets colors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    stdout: bool,
    stderr: bool,
}

impl Theme {
    /// Colors only on terminals, and never when `NO_COLOR` is set
    pub fn detect() -> Self {
        let allowed = std::env::var_os("NO_COLOR").is_none();
        Self {
            stdout: allowed && console::colors_enabled(),
            stderr: allowed && console::colors_enabled_stderr(),
        }
    }

    pub fn colored() -> Self {
        Self { stdout: true, stderr: true }
    }

    pub fn plain() -> Self {
        Self { stdout: false, stderr: false }
    }

    pub fn is_colored(&self, role: Role) -> bool {
        if role.on_stderr() { self.stderr } else { self.stdout }
    }

    pub fn paint(&self, role: Role, text: impl Display) -> String {
        if self.is_colored(role) {
            text.style(role.style()).to_string()
        } else {
            text.to_string()
        }
    }
}

pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::detect)
}
