//! Shared output helpers.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use qcanvas::{ArtResult, CanvasEvent, EventSink, TracingSink, calculate_probability};

const BANNER_WIDTH: usize = 60;

/// Print the opening banner.
pub fn print_banner(mode: &str, names: &[String]) {
    let rule = "=".repeat(BANNER_WIDTH);
    println!("{rule}");
    println!("  {}", style("THE QUANTUM CANVAS").cyan().bold());
    println!("  Your Name → Quantum Fingerprint → Unique Universe");
    println!("{rule}");
    println!("  Mode:  {}", style(mode).yellow());
    println!("  Names: {}", names.join(", "));
    println!("{rule}");
}

/// Print the closing banner.
pub fn print_footer() {
    let rule = "=".repeat(BANNER_WIDTH);
    println!("\n{rule}");
    println!("  {} COMPLETE!", style("✓").green().bold());
    println!("  Open web/index.html to view your quantum art");
    println!("{rule}");
}

/// Print the most frequent states of a result as a bar chart.
pub fn print_result(result: &ArtResult) {
    println!(
        "\n{} '{}' (seed {}, {} on {}):",
        style("✓").green().bold(),
        style(result.name()).green(),
        result.seed(),
        style(format!("{} unique states", result.num_states())).yellow(),
        result.backend()
    );

    let sorted = result.counts().sorted();
    let total = result.total_shots();

    for (bitstring, count) in sorted.iter().take(8) {
        let prob = calculate_probability(**count, total) * 100.0;
        let bar: String = "█".repeat((prob / 2.0).round() as usize);
        println!(
            "  {}: {:>6} ({:>5.2}%) {}",
            style(bitstring).cyan(),
            count,
            prob,
            style(bar).green()
        );
    }

    if sorted.len() > 8 {
        println!("  ... and {} more states", sorted.len() - 8);
    }
}

/// Create the spinner shown while circuits run.
pub fn spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(template);
    }
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    spinner
}

/// Mirrors pipeline events onto a spinner and into the log.
pub struct SpinnerSink {
    spinner: ProgressBar,
}

impl SpinnerSink {
    pub fn new(spinner: ProgressBar) -> Self {
        Self { spinner }
    }
}

impl EventSink for SpinnerSink {
    fn emit(&self, event: &CanvasEvent) {
        TracingSink.emit(event);

        let message = match event {
            CanvasEvent::BackendSelected {
                backend,
                pending_jobs: Some(pending),
                ..
            } => format!("Selected {backend} ({pending} jobs queued)"),
            CanvasEvent::BackendSelected { backend, .. } => format!("Using {backend}"),
            CanvasEvent::CircuitPrepared { name, seed, .. } => {
                format!("Prepared '{name}' (seed {seed})")
            }
            CanvasEvent::Transpiled { circuits, max_depth } => {
                format!("Transpiled {circuits} circuit(s), depth {max_depth}")
            }
            CanvasEvent::Executing {
                backend, shots, ..
            } => format!("Executing on {backend} ({shots} shots)..."),
            CanvasEvent::JobSubmitted(job) => {
                // job ids must outlive the spinner
                self.spinner.println(format!("  Job ID: {}", job.id));
                format!("Waiting for job {}...", job.id)
            }
            CanvasEvent::JobStatusChanged { job_id, status } => format!("Job {job_id}: {status}"),
            CanvasEvent::ResultReady { name, num_states } => {
                format!("'{name}': {num_states} states")
            }
            CanvasEvent::BatchComplete { count } => format!("Batch of {count} complete"),
            _ => return,
        };
        self.spinner.set_message(message);
    }
}
