//! Text progress reporting for verbose runs.

use std::io::Write;

use crate::common::SolverConfig;

const BAR_LENGTH: usize = 50;
const FILL: char = '█';
const EMPTY: char = '-';

/// Renders a single-line progress bar such as
/// `Progress: |█████-----| 50.0% Complete`.
pub fn render_bar(iteration: usize, total: usize, length: usize) -> String {
    let fraction = if total == 0 {
        1.0
    } else {
        (iteration as f64 / total as f64).min(1.0)
    };
    let filled = ((length as f64) * fraction) as usize;

    let bar: String = std::iter::repeat(FILL)
        .take(filled)
        .chain(std::iter::repeat(EMPTY).take(length - filled))
        .collect();

    format!("Progress: |{}| {:.1}% Complete", bar, 100.0 * fraction)
}

/// Writes the banner, bar and summary of a verbose run.
///
/// Write failures are ignored; reporting never affects the run.
pub struct ProgressReporter<W: Write> {
    out: W,
    total: usize,
}

impl<W: Write> ProgressReporter<W> {
    pub fn new(out: W, total: usize) -> Self {
        Self { out, total }
    }

    pub fn banner(&mut self, dim: usize, config: &SolverConfig, w: f64, cp: f64, cg: f64) {
        let _ = writeln!(
            self.out,
            "\n------------------ PARAMETERS -----------------\n\
             Number of dimensions: {}\n\
             Number of iterations: {}\n\
             Number of particles: {}\n\
             w: {}\tcp: {}\tcg: {}\n\n\
             ----------------- OPTIMIZATION ----------------\n\
             Population initialization...",
            dim, config.max_iterations, config.population_size, w, cp, cg
        );
    }

    pub fn start(&mut self) {
        let _ = writeln!(self.out, "Start of optimization...");
        self.update(0);
    }

    pub fn update(&mut self, iteration: usize) {
        let _ = write!(self.out, "\r{}", render_bar(iteration, self.total, BAR_LENGTH));
        if iteration >= self.total {
            let _ = writeln!(self.out);
        }
        let _ = self.out.flush();
    }

    pub fn finish(&mut self, elapsed_secs: f64, best_cost: f64) {
        let _ = writeln!(
            self.out,
            "End of optimization...\n\n\
             ------------------- RESULTS -------------------\n\
             Optimization elapsed time: {:.2} s\n\
             Solution evaluation: {:.5}",
            elapsed_secs, best_cost
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_bar_half() {
        let bar = render_bar(5, 10, 10);
        assert_eq!(bar, "Progress: |█████-----| 50.0% Complete");
    }

    #[test]
    fn test_render_bar_zero_total_is_complete() {
        let bar = render_bar(0, 0, 4);
        assert_eq!(bar, "Progress: |████| 100.0% Complete");
    }

    #[test]
    fn test_reporter_writes_summary() {
        let mut buf = Vec::new();
        {
            let mut reporter = ProgressReporter::new(&mut buf, 2);
            reporter.start();
            reporter.update(1);
            reporter.update(2);
            reporter.finish(0.5, 1.25);
        }
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Start of optimization..."));
        assert!(text.contains("100.0% Complete\n"));
        assert!(text.contains("Solution evaluation: 1.25000"));
    }
}
