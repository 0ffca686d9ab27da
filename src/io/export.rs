//! Export resolved priors to CSV.
//!
//! One row per parameter, meant to be easy to consume in spreadsheets or
//! downstream scripts. Open sides of a support are written as `inf` / `-inf`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::PriorError;
use crate::prior::ResolvedPrior;

/// Write one phase's resolved priors for a model class to a CSV file.
pub fn write_priors_csv(
    path: &Path,
    model_class: &str,
    phase_index: usize,
    priors: &[(String, ResolvedPrior)],
) -> Result<(), PriorError> {
    let io_error = |message: String| PriorError::Io {
        path: path.to_path_buf(),
        message,
    };

    let file = File::create(path).map_err(|e| io_error(format!("failed to create export CSV: {e}")))?;
    let mut out = BufWriter::new(file);

    writeln!(out, "model_class,parameter,phase,family,mean,sigma,lower,upper")
        .map_err(|e| io_error(format!("failed to write export CSV header: {e}")))?;

    for (parameter, prior) in priors {
        let (lower, upper) = prior.support();
        let (mean, sigma) = match prior.as_gaussian() {
            Some(g) => (format_value(g.mean()), format_value(g.sigma())),
            None => (String::new(), String::new()),
        };
        writeln!(
            out,
            "{},{},{},{},{},{},{},{}",
            model_class,
            parameter,
            phase_index,
            prior.family(),
            mean,
            sigma,
            format_value(lower),
            format_value(upper),
        )
        .map_err(|e| io_error(format!("failed to write export CSV row: {e}")))?;
    }

    out.flush()
        .map_err(|e| io_error(format!("failed to flush export CSV: {e}")))?;
    Ok(())
}

fn format_value(v: f64) -> String {
    if v == f64::INFINITY {
        "inf".to_string()
    } else if v == f64::NEG_INFINITY {
        "-inf".to_string()
    } else {
        format!("{v}")
    }
}
