//! Console progress: one line per finished download plus a progress bar.

use std::io::{self, IsTerminal};
use std::path::Path;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use listing_photos_core::{DownloadOutcome, DownloadReport, ProgressReporter};

/// Prints run progress: successes to stdout, failures to stderr.
///
/// The bar is only drawn on an interactive stdout; lines are printed with
/// the bar suspended so they never interleave with it.
pub(crate) struct ConsoleReporter {
    bar: ProgressBar,
    quiet: bool,
}

impl ConsoleReporter {
    pub(crate) fn new(quiet: bool) -> Self {
        let bar = if quiet || !io::stdout().is_terminal() {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stdout());
            bar.set_style(
                ProgressStyle::with_template("{bar:30} {pos}/{len} images")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            bar
        };
        Self { bar, quiet }
    }

    /// Prints the run parameters before anything is fetched.
    pub(crate) fn banner(&self, url: &str, output_dir: &Path, workers: usize) {
        if self.quiet {
            return;
        }
        println!("URL: {url}");
        println!("Folder: {}", output_dir.display());
        println!("Workers: {workers}");
    }
}

impl ProgressReporter for ConsoleReporter {
    fn images_found(&self, count: usize) {
        self.bar.set_length(count as u64);
        if !self.quiet {
            self.bar.suspend(|| println!("Found {count} image URLs"));
        }
    }

    fn nothing_found(&self) {
        eprintln!("No images found on the page.");
    }

    fn outcome(&self, outcome: &DownloadOutcome) {
        self.bar.inc(1);
        match outcome.error() {
            None if !self.quiet => self.bar.suspend(|| {
                println!("OK  - {} -> {}", outcome.url, outcome.path.display());
            }),
            None => {}
            Some(error) => self.bar.suspend(|| eprintln!("ERR - {} -> {error}", outcome.url)),
        }
    }

    fn finished(&self, report: &DownloadReport, output_dir: &Path) {
        self.bar.finish_and_clear();
        if !self.quiet {
            println!(
                "Saved {} images to {}",
                report.saved(),
                output_dir.display()
            );
        }
    }
}
