//! Top-level application orchestration.
//!
//! `src/main.rs` stays tiny; this module is the real main that:
//! - parses CLI arguments and sets up logging
//! - loads the schema and builds the engine
//! - dispatches the subcommand and prints its report

use std::collections::HashMap;

use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::Distribution;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Command, DumpArgs, ResolveArgs, ShowArgs};
use crate::error::AppError;
use crate::report;

pub mod pipeline;

/// Entry point for the `priors` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let session = pipeline::open_session(cli.schema.as_deref(), cli.policy)?;

    match cli.command {
        Command::Check => handle_check(&session),
        Command::Show(args) => handle_show(&session, args),
        Command::Resolve(args) => handle_resolve(&session, args),
        Command::Dump(args) => handle_dump(&session, args),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "lens_priors=debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

fn handle_check(session: &pipeline::Session) -> Result<(), AppError> {
    println!("Schema: {}", session.source);
    println!(
        "Policy: mean outside support -> {:?}",
        session.engine.config().mean_outside_support
    );
    print!("{}", report::format_schema_summary(session.engine.store()));
    Ok(())
}

fn handle_show(session: &pipeline::Session, args: ShowArgs) -> Result<(), AppError> {
    let best_fits: HashMap<String, f64> = args.best_fits.into_iter().collect();
    let priors = session
        .engine
        .resolve_model_for_phase(&args.class, args.phase, &best_fits)?;

    print!("{}", report::format_prior_table(&args.class, args.phase, &priors));

    if let Some(path) = &args.export {
        crate::io::write_priors_csv(path, &args.class, args.phase, &priors)?;
    }
    Ok(())
}

fn handle_resolve(session: &pipeline::Session, args: ResolveArgs) -> Result<(), AppError> {
    let engine = &session.engine;
    let original = engine.store().lookup(&args.class, &args.param)?;
    let prior = engine.resolve_for_phase(&args.class, &args.param, args.phase, args.best_fit)?;

    println!("{}.{} (phase {})", args.class, args.param, args.phase);
    println!("schema  : {}", report::format_spec(&original));
    println!("resolved: {}", report::format_prior(&prior));

    if args.samples > 0 {
        let mut rng = StdRng::seed_from_u64(args.seed);
        let draws: Vec<f64> = prior.sample_iter(&mut rng).take(args.samples).collect();
        if let Some(summary) = report::summarize_samples(&draws) {
            print!("{}", report::format_sample_summary(&summary, args.seed));
        }
    }
    Ok(())
}

fn handle_dump(session: &pipeline::Session, args: DumpArgs) -> Result<(), AppError> {
    crate::io::write_schema_json(&args.out, session.engine.store())?;
    println!(
        "Wrote {} entries to {}",
        session.engine.store().len(),
        args.out.display()
    );
    Ok(())
}
