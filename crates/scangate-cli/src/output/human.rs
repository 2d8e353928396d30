//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use anyhow::Result;
use console::Term;
use console::style;
use scangate_core::RunReport;
use scangate_core::Stage;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
    term_err: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
            term_err: Term::stderr(),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.1} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.1} KB", bytes as f64 / KB as f64)
        } else {
            format!("{bytes} B")
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_run_result(&self, report: &RunReport) -> Result<()> {
        for warning in &report.warnings {
            self.format_warning(warning);
        }

        if self.quiet {
            return Ok(());
        }

        if self.use_colors {
            let _ = self.term.write_line(&format!(
                "{} Scan passed, repacked into {}",
                style("✓").green().bold(),
                report.output_archive.display()
            ));
        } else {
            let _ = self.term.write_line(&format!(
                "Scan passed, repacked into {}",
                report.output_archive.display()
            ));
        }

        let _ = self
            .term
            .write_line(&format!("  Files scanned: {}", report.files_scanned));
        let _ = self.term.write_line(&format!(
            "  Output size: {}",
            Self::format_size(report.output_bytes)
        ));

        if self.verbose {
            let _ = self.term.write_line(&format!(
                "  Source: {}",
                report.source_archive.display()
            ));
            let _ = self
                .term
                .write_line(&format!("  Duration: {:?}", report.duration));
        }

        Ok(())
    }

    fn format_failure(&self, stage: Stage, error: &anyhow::Error) {
        if self.use_colors {
            let _ = self.term_err.write_line(&format!(
                "{} Error: {stage} stage failed",
                style("✗").red().bold()
            ));
        } else {
            let _ = self
                .term_err
                .write_line(&format!("Error: {stage} stage failed"));
        }
        let _ = self.term_err.write_line(&format!("{error}"));
    }

    fn format_warning(&self, message: &str) {
        if self.use_colors {
            let _ = self
                .term_err
                .write_line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            let _ = self.term_err.write_line(&format!("Warning: {message}"));
        }
    }
}
