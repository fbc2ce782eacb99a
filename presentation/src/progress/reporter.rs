//! Progress reporting for query and write phases

use crate::output::Palette;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use prism_application::{QueryProgressNotifier, WriteProgressNotifier};
use prism_domain::{
    FileOutputResult, FileWriteDetail, QueryStatus, QueryStatusRecord, RunResult, WriteStatus,
};
use std::path::Path;
use std::sync::Mutex;

/// Reports progress with indicatif bars, one per phase
pub struct ProgressReporter {
    multi: MultiProgress,
    query_bar: Mutex<Option<ProgressBar>>,
    write_bar: Mutex<Option<ProgressBar>>,
    palette: Palette,
}

impl ProgressReporter {
    pub fn new(use_colors: bool) -> Self {
        Self {
            multi: MultiProgress::new(),
            query_bar: Mutex::new(None),
            write_bar: Mutex::new(None),
            palette: Palette::new(use_colors),
        }
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn start_bar(&self, slot: &Mutex<Option<ProgressBar>>, prefix: &str, total: usize) {
        let pb = self.multi.add(ProgressBar::new(total as u64));
        pb.set_style(Self::bar_style());
        pb.set_prefix(prefix.to_string());
        pb.set_message("Starting...");
        if let Ok(mut guard) = slot.lock() {
            *guard = Some(pb);
        }
    }

    fn with_bar(slot: &Mutex<Option<ProgressBar>>, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = slot.lock()
            && let Some(pb) = guard.as_ref()
        {
            f(pb);
        }
    }

    fn finish_bar(slot: &Mutex<Option<ProgressBar>>, message: String) {
        if let Ok(mut guard) = slot.lock()
            && let Some(pb) = guard.take()
        {
            pb.finish_with_message(message);
        }
    }
}

impl QueryProgressNotifier for ProgressReporter {
    fn on_run_start(&self, total: usize) {
        self.start_bar(&self.query_bar, "Querying", total);
    }

    fn on_query_status(&self, record: &QueryStatusRecord) {
        let message = query_line(record, &self.palette);
        Self::with_bar(&self.query_bar, |pb| {
            if let Some(message) = message {
                pb.set_message(message);
            }
            if record.is_terminal() {
                pb.inc(1);
            }
        });
    }

    fn on_run_complete(&self, result: &RunResult) {
        Self::finish_bar(
            &self.query_bar,
            format!(
                "{} succeeded, {} failed",
                self.palette.ok(&result.success_count().to_string()),
                result.failure_count()
            ),
        );
    }
}

impl WriteProgressNotifier for ProgressReporter {
    fn on_write_start(&self, _directory: &Path, total: usize) {
        self.start_bar(&self.write_bar, "Writing", total);
    }

    fn on_file_status(&self, detail: &FileWriteDetail) {
        let message = file_line(detail, &self.palette);
        Self::with_bar(&self.write_bar, |pb| {
            if let Some(message) = message {
                pb.set_message(message);
            }
            if detail.status != WriteStatus::Pending {
                pb.inc(1);
            }
        });
    }

    fn on_write_complete(&self, result: &FileOutputResult) {
        Self::finish_bar(
            &self.write_bar,
            format!(
                "{} written to {}",
                result.succeeded_writes,
                result.output_directory.display()
            ),
        );
    }
}

/// Line-per-event progress on stderr (no fancy UI)
pub struct SimpleProgress {
    palette: Palette,
}

impl SimpleProgress {
    pub fn new(use_colors: bool) -> Self {
        Self {
            palette: Palette::new(use_colors),
        }
    }
}

impl QueryProgressNotifier for SimpleProgress {
    fn on_run_start(&self, total: usize) {
        eprintln!("{} Querying {} model(s)", self.palette.heading("->"), total);
    }

    fn on_query_status(&self, record: &QueryStatusRecord) {
        if let Some(line) = query_line(record, &self.palette) {
            eprintln!("  {}", line);
        }
    }
}

impl WriteProgressNotifier for SimpleProgress {
    fn on_write_start(&self, directory: &Path, total: usize) {
        eprintln!(
            "{} Writing {} file(s) to {}",
            self.palette.heading("->"),
            total,
            directory.display()
        );
    }

    fn on_file_status(&self, detail: &FileWriteDetail) {
        if let Some(line) = file_line(detail, &self.palette) {
            eprintln!("  {}", line);
        }
    }
}

/// Pending transitions carry no information worth a line
fn query_line(record: &QueryStatusRecord, palette: &Palette) -> Option<String> {
    match record.status {
        QueryStatus::Pending => None,
        QueryStatus::Running => Some(format!("{} {}", palette.dim("~"), record.config_key)),
        QueryStatus::Success => Some(format!(
            "{} {}{}",
            palette.ok("v"),
            record.config_key,
            record
                .duration_ms
                .map(|ms| format!(" ({}ms)", ms))
                .unwrap_or_default()
        )),
        QueryStatus::Error => Some(format!(
            "{} {} ({})",
            palette.err("x"),
            record.config_key,
            record.error_message.as_deref().unwrap_or("failed")
        )),
    }
}

fn file_line(detail: &FileWriteDetail, palette: &Palette) -> Option<String> {
    match detail.status {
        WriteStatus::Pending => None,
        WriteStatus::Success => Some(format!("{} {}", palette.ok("v"), detail.filename)),
        WriteStatus::Error => Some(format!(
            "{} {} ({})",
            palette.err("x"),
            detail.filename,
            detail.error.as_deref().unwrap_or("failed")
        )),
    }
}
