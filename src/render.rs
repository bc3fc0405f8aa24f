//! Plain-text rendering of verdicts and reports for the terminal.
//!
//! Each wrapper implements [`fmt::Display`], so callers print it directly.

use std::fmt;
use veriface_core::Verdict;
use veriface_security::{EqualErrorRate, GroupStats, SecurityReport, ThresholdRow};

const RULE_WIDTH: usize = 70;

struct Rule(char);

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for _ in 0..RULE_WIDTH {
            write!(f, "{}", self.0)?;
        }
        Ok(())
    }
}

struct Percent(f32);

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format!("{:.2}%", self.0 * 100.0))
    }
}

fn title(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    writeln!(f, "{}", Rule('='))?;
    writeln!(f, "{text}")?;
    writeln!(f, "{}", Rule('='))
}

/// One-pair verification outcome
pub struct VerdictText<'a>(pub &'a Verdict);

impl fmt::Display for VerdictText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.0;
        write!(
            f,
            "Similarity: {:.4} | Same identity: {} | Threshold: {:.2}\n{}",
            v.score, v.is_match, v.threshold, v.tier.label
        )
    }
}

/// Equal Error Rate and its threshold
pub struct EerText<'a>(pub &'a EqualErrorRate);

impl fmt::Display for EerText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "EER (Equal Error Rate): {}\n  optimal threshold: {:.4}",
            Percent(self.0.eer),
            self.0.threshold
        )
    }
}

fn group(f: &mut fmt::Formatter<'_>, name: &str, stats: &GroupStats) -> fmt::Result {
    writeln!(f, "  {name}: {}", stats.count)?;
    writeln!(f, "    - Mean: {:.4} ± {:.4}", stats.mean, stats.std)?;
    writeln!(f, "    - Range: [{:.4}, {:.4}]", stats.min, stats.max)
}

/// Full security report
pub struct ReportText<'a>(pub &'a SecurityReport);

impl fmt::Display for ReportText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        title(f, "SECURITY REPORT - FACE VERIFICATION")?;

        writeln!(f, "\nSIMILARITY DISTRIBUTION:")?;
        group(f, "Genuine pairs (same identity)", &report.distribution.genuine)?;
        group(f, "Impostor pairs (different identity)", &report.distribution.impostor)?;

        writeln!(f, "\nSECURITY METRICS (threshold = {}):", report.threshold)?;
        writeln!(f, "  FAR (False Acceptance Rate): {}", Percent(report.rates.far))?;
        writeln!(f, "  FRR (False Rejection Rate): {}", Percent(report.rates.frr))?;

        writeln!(f, "\n{}", EerText(&report.eer))?;

        let a = &report.assessment;
        writeln!(f, "\nASSESSMENT:")?;
        writeln!(f, "  FAR {:?}: {}", a.far, a.far.description())?;
        writeln!(f, "  FRR {:?}: {}", a.frr, a.frr.description())?;
        write!(f, "{}", Rule('='))
    }
}

/// FAR/FRR table for candidate thresholds
pub struct ComparisonText<'a>(pub &'a [ThresholdRow]);

impl fmt::Display for ComparisonText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        title(f, "THRESHOLD COMPARISON")?;
        writeln!(
            f,
            "{:<10} {:<15} {:<15} {:<30}",
            "Threshold", "FAR", "FRR", "Recommendation"
        )?;
        writeln!(f, "{}", Rule('-'))?;
        for row in self.0 {
            writeln!(
                f,
                "{:<10.2} {:<15} {:<15} {:<30}",
                row.threshold,
                Percent(row.rates.far),
                Percent(row.rates.frr),
                row.recommendation.as_deref().unwrap_or("")
            )?;
        }
        write!(f, "{}", Rule('='))
    }
}
