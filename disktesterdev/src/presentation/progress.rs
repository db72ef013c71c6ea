use std::sync::Mutex;

use disktester_core::progress::{Phase, Progress};
use indicatif::{ProgressBar, ProgressStyle};

/// Renders core progress events as a console bar, one bar per phase.
pub struct ConsoleProgress {
    bar: Mutex<Option<ProgressBar>>,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress for ConsoleProgress {
    fn phase_started(&self, phase: Phase, total_items: u64) {
        let bar = if total_items > 0 {
            ProgressBar::new(total_items)
        } else {
            ProgressBar::new_spinner()
        };
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks")
        {
            if total_items > 0 {
                bar.set_style(style.progress_chars("#>-"));
            }
        }
        bar.set_message(match phase {
            Phase::Write => "Writing data",
            Phase::Validate => "Validating data",
            Phase::Clean => "Cleaning",
        });
        *self.bar.lock().unwrap() = Some(bar);
    }

    fn item_completed(&self, _phase: Phase, _index: u64) {
        if let Some(bar) = self.bar.lock().unwrap().as_ref() {
            bar.inc(1);
        }
    }

    fn phase_finished(&self, _phase: Phase) {
        if let Some(bar) = self.bar.lock().unwrap().take() {
            bar.finish_and_clear();
        }
    }
}
