//! Formatted terminal output.
//!
//! Formatting lives here so the resolution code stays free of presentation
//! concerns and output changes stay localized.

use crate::domain::{PriorShape, PriorSpec, WidthKind, WidthModifier};
use crate::prior::ResolvedPrior;
use crate::report::SampleSummary;
use crate::schema::PriorSchemaStore;

/// Per-class entry counts plus family totals.
pub fn format_schema_summary(store: &PriorSchemaStore) -> String {
    let mut out = String::new();

    out.push_str("=== priors - lens mass profile prior schema ===\n");
    out.push_str(&format!(
        "Classes: {} | entries: {}\n\n",
        store.model_classes().count(),
        store.len()
    ));

    out.push_str(format!("{:<32} {:>6}", "model_class", "params").trim_end());
    out.push('\n');
    out.push_str(format!("{:-<32} {:-<6}", "", "").trim_end());
    out.push('\n');
    for class in store.model_classes() {
        let n = store.parameters(class).map(|p| p.len()).unwrap_or(0);
        out.push_str(&format!("{:<32} {:>6}\n", truncate(class, 32), n));
    }

    let (mut gaussian, mut uniform, mut log_uniform) = (0usize, 0usize, 0usize);
    for (_, spec) in store.iter() {
        match spec.shape() {
            PriorShape::Gaussian { .. } => gaussian += 1,
            PriorShape::Uniform { .. } => uniform += 1,
            PriorShape::LogUniform { .. } => log_uniform += 1,
        }
    }
    out.push_str(&format!(
        "\nFamilies: Gaussian={gaussian} Uniform={uniform} LogUniform={log_uniform}\n"
    ));

    out
}

/// One line describing a schema entry, e.g. `Uniform[0, 1] -> Relative(0.2) within [0, inf]`.
pub fn format_spec(spec: &PriorSpec) -> String {
    let base = match spec.shape() {
        PriorShape::Gaussian { mean, sigma } => format!(
            "Gaussian(mean={}, sigma={}) on [{}, {}]",
            fmt_num(*mean),
            fmt_num(*sigma),
            fmt_num(spec.lower_limit()),
            fmt_num(spec.upper_limit())
        ),
        PriorShape::Uniform { .. } | PriorShape::LogUniform { .. } => format!(
            "{}[{}, {}]",
            spec.family(),
            fmt_num(spec.lower_limit()),
            fmt_num(spec.upper_limit())
        ),
    };
    let mut out = format!("{base} -> {}", fmt_width(&spec.width_modifier()));
    if let Some(gl) = spec.gaussian_limits() {
        out.push_str(&format!(" within [{}, {}]", fmt_num(gl.lower), fmt_num(gl.upper)));
    }
    out
}

/// One line describing a resolved prior.
pub fn format_prior(prior: &ResolvedPrior) -> String {
    let (lower, upper) = prior.support();
    match prior {
        ResolvedPrior::Gaussian(g) => format!(
            "Gaussian(mean={}, sigma={}) on [{}, {}]",
            fmt_num(g.mean()),
            fmt_num(g.sigma()),
            fmt_num(lower),
            fmt_num(upper)
        ),
        ResolvedPrior::Uniform(_) | ResolvedPrior::LogUniform(_) => {
            format!("{}[{}, {}]", prior.family(), fmt_num(lower), fmt_num(upper))
        }
    }
}

/// Table of a class's resolved priors for one phase.
pub fn format_prior_table(
    model_class: &str,
    phase_index: usize,
    priors: &[(String, ResolvedPrior)],
) -> String {
    let mut out = String::new();
    out.push_str(&format!("{model_class} (phase {phase_index}):\n"));

    out.push_str(
        format!(
            "{:<24} {:<10} {:>12} {:>12} {:>12} {:>12}",
            "parameter", "family", "mean", "sigma", "lower", "upper"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<24} {:-<10} {:-<12} {:-<12} {:-<12} {:-<12}",
            "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for (parameter, prior) in priors {
        let (lower, upper) = prior.support();
        let (mean, sigma) = match prior.as_gaussian() {
            Some(g) => (fmt_num(g.mean()), fmt_num(g.sigma())),
            None => ("-".to_string(), "-".to_string()),
        };
        out.push_str(
            format!(
                "{:<24} {:<10} {:>12} {:>12} {:>12} {:>12}",
                truncate(parameter, 24),
                prior.family().display_name(),
                mean,
                sigma,
                fmt_num(lower),
                fmt_num(upper)
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

pub fn format_sample_summary(summary: &SampleSummary, seed: u64) -> String {
    format!(
        "Samples: n={} seed={} | mean={:.6} std={:.6} | range=[{:.6}, {:.6}]\n",
        summary.n, seed, summary.mean, summary.std, summary.min, summary.max
    )
}

fn fmt_width(wm: &WidthModifier) -> String {
    match wm.kind {
        WidthKind::Absolute => format!("Absolute({})", fmt_num(wm.value)),
        WidthKind::Relative => format!("Relative({})", fmt_num(wm.value)),
    }
}

fn fmt_num(v: f64) -> String {
    if v == f64::INFINITY {
        "inf".to_string()
    } else if v == f64::NEG_INFINITY {
        "-inf".to_string()
    } else if v != 0.0 && (v.abs() < 1e-3 || v.abs() >= 1e6) {
        format!("{v:.3e}")
    } else {
        format!("{}", (v * 1e6).round() / 1e6)
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}
