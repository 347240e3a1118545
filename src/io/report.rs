//! Plain-text summary of a finished solve.

use std::io::{self, Write};

use crate::utils::convergence::ConvergenceResult;

const RULE: &str = "==========================";

/// Print outcome, iteration count, elapsed time and the four final metrics.
pub fn write_report<W: Write>(
    w: &mut W,
    result: &ConvergenceResult,
    problem_name: &str,
) -> io::Result<()> {
    writeln!(w, "{RULE}")?;
    writeln!(w, "Numerical Results.")?;
    if !problem_name.is_empty() {
        writeln!(w, "Problem: {problem_name}")?;
    }
    writeln!(w, "{RULE}")?;
    if result.converged {
        writeln!(w, "Converged! (iter = {})", result.iterations)?;
    } else {
        writeln!(w, "NOT converged. (max_iter = {})", result.iterations)?;
    }
    writeln!(w, "# Iter.: {}", result.iterations)?;
    writeln!(w, "Time[s]: {:.3}", result.elapsed)?;
    writeln!(w, "Relres_2norm = {:.2e}", result.final_relres_2())?;
    writeln!(w, "True_Relres_2norm = {:.2e}", result.true_relres_2)?;
    writeln!(w, "Relerr_2norm = {:.2e}", result.final_relerr_2())?;
    writeln!(w, "Relerr_Anorm = {:.2e}", result.final_relerr_a())?;
    writeln!(w, "{RULE}")?;
    writeln!(w)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_lists_outcome_and_final_metrics() {
        let result = ConvergenceResult {
            iterations: 1,
            converged: false,
            elapsed: 0.0125,
            relres_2: vec![1.0, 0.25],
            relerr_2: vec![1.0, 0.5],
            relerr_a: vec![1.0, 0.125],
            true_relres_2: 0.25,
        };
        let mut out = Vec::new();
        write_report(&mut out, &result, "tridiag").unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Problem: tridiag"));
        assert!(text.contains("NOT converged. (max_iter = 1)"));
        assert!(text.contains("Time[s]: 0.013") || text.contains("Time[s]: 0.012"));
        assert!(text.contains("Relres_2norm = 2.50e-1"));
        assert!(text.contains("Relerr_Anorm = 1.25e-1"));
    }
}
