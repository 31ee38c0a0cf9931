//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - builds the uncertainty curve
//! - runs the reweighting pipeline on toy events
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;

use crate::cli::{Command, CurveArgs, PlotArgs, ReweightArgs};
use crate::curve::CurveBuilder;
use crate::domain::RunConfig;
use crate::error::AppError;
use crate::io::resource::ResourceLocator;
use crate::stage::{ATM_MUON_SCALE, DELTA_GAMMA_MU};

pub mod pipeline;

/// Entry point for the `mureweight` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Reweight(args) => handle_reweight(args),
        Command::Curve(args) => handle_curve(args),
        Command::Plot(args) => handle_plot(args),
    }
}

fn handle_reweight(args: ReweightArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args);
    let run = pipeline::run_reweight(&config)?;

    let curve = run
        .stage
        .curve()
        .ok_or_else(|| AppError::new(4, "Stage finished without a curve."))?;
    let params = run.stage.params();
    let scale = params.get(ATM_MUON_SCALE)?.as_dimensionless()?;
    let shift = params.get(DELTA_GAMMA_MU)?.as_dimensionless()?;

    println!(
        "{}",
        crate::report::format_run_summary(curve, &config.table_file, scale, shift, &run.summaries)
    );

    if let (Some(path), Some(variable)) = (&config.export_events, run.stage.variable()) {
        crate::io::export::write_events_csv(path, &run.events, variable)?;
    }
    if let (Some(path), Some(variable)) = (&config.export_curve, run.stage.variable()) {
        let file = crate::io::curve::curve_file(curve, &config.table_file, variable)?;
        crate::io::curve::write_curve_json(path, &file)?;
    }

    Ok(())
}

fn handle_curve(args: CurveArgs) -> Result<(), AppError> {
    let request = crate::curve::CurveRequest::validate(&args.table.file, &args.table.variable, &args.table.kind)?;
    let builder = CurveBuilder::new(ResourceLocator::from_env());
    let curve = builder.build_request(&request)?;

    print!("{}", crate::report::format_curve_nodes(&curve));

    let needs_file = args.plot || args.export_curve.is_some();
    if needs_file {
        let file = crate::io::curve::curve_file(&curve, &request.file, &request.variable)?;
        if args.plot {
            println!("{}", crate::plot::render_curve_plot(&file, args.width, args.height));
        }
        if let Some(path) = &args.export_curve {
            crate::io::curve::write_curve_json(path, &file)?;
        }
    }

    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let file = crate::io::curve::read_curve_json(&args.curve)?;
    // Rebuilding validates the stored nodes before plotting.
    crate::io::curve::curve_from_file(&file)?;

    let plot = crate::plot::render_curve_plot(&file, args.width, args.height);
    println!("{plot}");
    Ok(())
}

pub fn run_config_from_args(args: &ReweightArgs) -> RunConfig {
    RunConfig {
        table_file: args.table.file.clone(),
        variable: args.table.variable.clone(),
        spline_kind: args.table.kind.clone(),
        atm_muon_scale: args.atm_muon_scale,
        delta_gamma_mu: args.delta_gamma_mu,
        units: args.units.clone(),

        batch_names: args.names.clone(),
        n_events: args.n_events,
        random_weights: args.random_weights,
        seed: args.seed,
        coszen_min: args.coszen_min,
        coszen_max: args.coszen_max,

        export_events: args.export.clone(),
        export_curve: args.export_curve.clone(),
    }
}
