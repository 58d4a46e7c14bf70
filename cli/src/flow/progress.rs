use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Spinner on stderr while a run archive downloads. Hidden when stderr is
/// not a terminal so piped output stays clean.
pub struct DownloadSpinner {
    bar: ProgressBar,
}

impl DownloadSpinner {
    pub fn start(message: String, enabled: bool) -> Self {
        if !enabled {
            return Self {
                bar: ProgressBar::hidden(),
            };
        }

        let bar = ProgressBar::new_spinner();
        if let Ok(style) =
            ProgressStyle::default_spinner().template("  {spinner:.green} {msg} ({elapsed})")
        {
            bar.set_style(style.tick_strings(&[
                "⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", " ",
            ]));
        }
        bar.set_message(message);
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    pub fn finish(self) {
        self.bar.finish_and_clear();
    }

    pub fn abandon(self) {
        self.bar.abandon();
    }
}

pub fn stderr_is_tty() -> bool {
    atty::is(atty::Stream::Stderr)
}
