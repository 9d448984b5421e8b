use crate::output::is_quiet;
use crate::ui::{theme, Icons, Role};
use indicatif::{HumanDuration, ProgressBar};
use std::time::{Duration, Instant};

/// Spinner shown while one phase runs; hidden off-terminal or when quiet
pub struct Spinner {
    pb: ProgressBar,
    started: Instant,
}

impl Spinner {
    pub fn new(message: &str) -> Self {
        let pb = if is_quiet() || !console::Term::stdout().is_term() {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new_spinner();
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        };
        pb.set_message(message.to_string());
        Self {
            pb,
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn finish_with_message(&self, msg: &str) {
        self.pb.finish_with_message(msg.to_string());
    }

    /// Clear the spinner and print a one-line completion summary
    pub fn finish_with_summary(&self, label: &str, rows: usize) {
        self.pb.finish_and_clear();
        if is_quiet() {
            return;
        }
        println!(
            "{} {}  {} {}",
            theme().paint(Role::Success, Icons::CHECK),
            theme().paint(Role::Success, format!("{} in {}", label, HumanDuration(self.elapsed()))),
            theme().paint(Role::Info, Icons::STATS),
            rows
        );
    }
}
