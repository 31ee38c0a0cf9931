//! Shared "reweight pipeline" logic.
//!
//! Keeping the workflow in one place keeps the CLI handler down to printing:
//! toy events -> stage setup -> weight reset -> apply -> summaries

use log::info;

use crate::curve::CurveBuilder;
use crate::domain::{Param, ParamSet, Quantity, RunConfig, Units};
use crate::error::StageError;
use crate::events::{EventSet, ToyConfig, generate_events, reset_weights};
use crate::io::resource::ResourceLocator;
use crate::report::{BatchSummary, summarize, weight_sums};
use crate::stage::{
    ATM_MUON_SCALE, AtmMuonStage, DELTA_GAMMA_MU, DELTA_GAMMA_MU_FILE, DELTA_GAMMA_MU_SPLINE_KIND,
    DELTA_GAMMA_MU_VARIABLE,
};

/// All computed outputs of a single `mureweight reweight` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub events: EventSet,
    pub stage: AtmMuonStage,
    pub summaries: Vec<BatchSummary>,
}

/// Assemble the stage parameters from the run configuration.
pub fn build_params(config: &RunConfig) -> Result<ParamSet, StageError> {
    let units: Units = config.units.parse()?;
    Ok(ParamSet::new()
        .with(Param::quantity(
            ATM_MUON_SCALE,
            Quantity {
                magnitude: config.atm_muon_scale,
                units,
            },
        ))
        .with(Param::quantity(
            DELTA_GAMMA_MU,
            Quantity {
                magnitude: config.delta_gamma_mu,
                units,
            },
        ))
        .with(Param::text(DELTA_GAMMA_MU_FILE, config.table_file.clone()))
        .with(Param::text(DELTA_GAMMA_MU_SPLINE_KIND, config.spline_kind.clone()))
        .with(Param::text(DELTA_GAMMA_MU_VARIABLE, config.variable.clone())))
}

pub fn toy_config(config: &RunConfig) -> ToyConfig {
    ToyConfig {
        names: config.batch_names.clone(),
        n_events: config.n_events,
        random_weights: config.random_weights,
        seed: config.seed,
        coszen_min: config.coszen_min,
        coszen_max: config.coszen_max,
    }
}

/// Execute the full pipeline, resolving the table through `MUREWEIGHT_RESOURCES`.
pub fn run_reweight(config: &RunConfig) -> Result<RunOutput, StageError> {
    run_reweight_with(config, CurveBuilder::new(ResourceLocator::from_env()))
}

/// Execute the pipeline with an explicit curve builder.
pub fn run_reweight_with(config: &RunConfig, builder: CurveBuilder) -> Result<RunOutput, StageError> {
    // Parameters first: configuration problems surface before any events exist.
    let mut stage = AtmMuonStage::new(build_params(config)?, builder)?;

    let mut events = generate_events(&toy_config(config))?;
    stage.setup(&mut events)?;

    reset_weights(&mut events)?;
    let before = weight_sums(&events)?;
    stage.apply(&mut events)?;

    let summaries = summarize(&events, &before, stage.norms())?;
    info!("reweighted {} batch(es)", summaries.len());

    Ok(RunOutput {
        events,
        stage,
        summaries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn config(file: &str) -> RunConfig {
        RunConfig {
            table_file: file.to_string(),
            variable: "true_coszen".to_string(),
            spline_kind: "cubic".to_string(),
            atm_muon_scale: 1.0,
            delta_gamma_mu: 0.0,
            units: "dimensionless".to_string(),
            batch_names: vec!["muons".to_string(), "muons_mc2".to_string()],
            n_events: 500,
            random_weights: true,
            seed: 7,
            coszen_min: 0.0,
            coszen_max: 1.0,
            export_events: None,
            export_curve: None,
        }
    }

    fn builder() -> CurveBuilder {
        let dir = std::env::temp_dir().join(format!("mureweight_pipeline_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("muon_coszen_unc.txt"),
            "0.05 0.0\n0.15 0.8\n0.35 1.1\n0.55 1.5\n0.75 2.2\n0.95 3.0\n",
        )
        .unwrap();
        CurveBuilder::new(ResourceLocator::new(vec![PathBuf::from(dir)]))
    }

    #[test]
    fn unit_scale_and_zero_shift_leave_weights_unchanged() {
        let out = run_reweight_with(&config("muon_coszen_unc.txt"), builder()).unwrap();
        assert_eq!(out.summaries.len(), 2);
        for s in &out.summaries {
            assert!((s.weight_sum_after - s.weight_sum_before).abs() < 1e-9);
        }
    }

    #[test]
    fn shift_preserves_unweighted_total_on_average() {
        // With unit initial weights the centred term sums to zero, so the
        // spectral shift alone does not change the total.
        let mut cfg = config("muon_coszen_unc.txt");
        cfg.random_weights = false;
        cfg.delta_gamma_mu = 0.2;
        let out = run_reweight_with(&cfg, builder()).unwrap();
        for s in &out.summaries {
            assert_eq!(s.n_zeroed, 0);
            assert!((s.weight_sum_after - s.weight_sum_before).abs() < 1e-6 * s.weight_sum_before);
        }
    }

    #[test]
    fn energy_variable_fails_as_configuration_error() {
        let mut cfg = config("muon_energy_unc.txt");
        cfg.variable = "true_energy".to_string();
        let err = run_reweight_with(&cfg, builder()).unwrap_err();
        assert!(matches!(err, StageError::Configuration(_)));
    }

    #[test]
    fn unknown_units_fail_before_generation() {
        let mut cfg = config("muon_coszen_unc.txt");
        cfg.units = "furlongs".to_string();
        assert!(matches!(run_reweight_with(&cfg, builder()), Err(StageError::Configuration(_))));
    }
}
