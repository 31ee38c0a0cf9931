//! Atmospheric muon background systematic.
//!
//! The stage has two phases:
//!
//! - `setup`: build the uncertainty curve once, evaluate it for every event
//!   (`rw_array`) and centre it on the batch mean (`cr_rw_array`)
//! - `apply`: scale each event weight by
//!   `max(0, (1 + delta_gamma_mu * cr_rw_array) * atm_muon_scale)`
//!
//! `apply` multiplies into `weights`; calling it twice compounds the correction.
//! Reset the weights between evaluations.

use log::{debug, info, warn};
use rayon::prelude::*;

use crate::curve::{CurveBuilder, CurveRequest, InterpolatingCurve};
use crate::domain::{Param, ParamSet, VariableSpec};
use crate::error::StageError;
use crate::events::{CR_RW_ARRAY, EventBatch, EventSet, RW_ARRAY, WEIGHTS};

pub const ATM_MUON_SCALE: &str = "atm_muon_scale";
pub const DELTA_GAMMA_MU_FILE: &str = "delta_gamma_mu_file";
pub const DELTA_GAMMA_MU_SPLINE_KIND: &str = "delta_gamma_mu_spline_kind";
pub const DELTA_GAMMA_MU_VARIABLE: &str = "delta_gamma_mu_variable";
pub const DELTA_GAMMA_MU: &str = "delta_gamma_mu";

pub const EXPECTED_PARAMS: [&str; 5] = [
    ATM_MUON_SCALE,
    DELTA_GAMMA_MU_FILE,
    DELTA_GAMMA_MU_SPLINE_KIND,
    DELTA_GAMMA_MU_VARIABLE,
    DELTA_GAMMA_MU,
];

/// Parameters that define the curve; changing one invalidates `setup`.
const CURVE_PARAMS: [&str; 3] = [DELTA_GAMMA_MU_FILE, DELTA_GAMMA_MU_SPLINE_KIND, DELTA_GAMMA_MU_VARIABLE];

/// Normalization applied to one batch during setup.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchNorm {
    pub name: String,
    pub n_events: usize,
    /// Mean of `rw_array` over the batch.
    pub norm: f64,
}

#[derive(Debug, Clone)]
struct Ready {
    curve: InterpolatingCurve,
    variable: VariableSpec,
    norms: Vec<BatchNorm>,
}

#[derive(Debug, Clone)]
enum StageState {
    Unconfigured,
    Ready(Ready),
}

#[derive(Debug, Clone)]
pub struct AtmMuonStage {
    params: ParamSet,
    builder: CurveBuilder,
    state: StageState,
}

impl AtmMuonStage {
    /// Create an unconfigured stage. All expected parameters must be present.
    pub fn new(params: ParamSet, builder: CurveBuilder) -> Result<Self, StageError> {
        params.require(&EXPECTED_PARAMS)?;
        Ok(Self {
            params,
            builder,
            state: StageState::Unconfigured,
        })
    }

    pub fn params(&self) -> &ParamSet {
        &self.params
    }

    /// Replace one parameter.
    ///
    /// Scale parameters take effect on the next `apply`. Changing a curve
    /// parameter returns the stage to the unconfigured state.
    pub fn set_param(&mut self, param: Param) -> Result<(), StageError> {
        if !EXPECTED_PARAMS.contains(&param.name.as_str()) {
            return Err(StageError::config(format!(
                "Unknown parameter `{}` for the atm_muons stage.",
                param.name
            )));
        }
        let resets = CURVE_PARAMS.contains(&param.name.as_str())
            && self.params.get(&param.name).map(|p| p != &param).unwrap_or(true);
        self.params.set(param);
        if resets && self.is_ready() {
            info!("curve parameter changed; atm_muons stage needs setup again");
            self.state = StageState::Unconfigured;
        }
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, StageState::Ready(_))
    }

    /// The fitted curve, once set up.
    pub fn curve(&self) -> Option<&InterpolatingCurve> {
        match &self.state {
            StageState::Ready(ready) => Some(&ready.curve),
            StageState::Unconfigured => None,
        }
    }

    /// Per-batch normalizations computed during setup.
    pub fn norms(&self) -> &[BatchNorm] {
        match &self.state {
            StageState::Ready(ready) => ready.norms.as_slice(),
            StageState::Unconfigured => &[],
        }
    }

    /// Build the curve and cache `rw_array` / `cr_rw_array` in every batch.
    ///
    /// Either every batch is updated or none is.
    pub fn setup(&mut self, events: &mut EventSet) -> Result<(), StageError> {
        if self.is_ready() {
            return Err(StageError::config("atm_muons stage is already set up."));
        }

        let request = CurveRequest::validate(
            self.params.get(DELTA_GAMMA_MU_FILE)?.as_text()?,
            self.params.get(DELTA_GAMMA_MU_VARIABLE)?.as_text()?,
            self.params.get(DELTA_GAMMA_MU_SPLINE_KIND)?.as_text()?,
        )?;
        let curve = self.builder.build_request(&request)?;
        let variable = request.variable;

        let terms: Vec<(Vec<f64>, Vec<f64>, f64)> = events
            .batches()
            .par_iter()
            .map(|batch| reweight_terms(&curve, &variable, batch))
            .collect::<Result<_, _>>()?;

        let mut norms = Vec::with_capacity(terms.len());
        for (batch, (rw, cr_rw, norm)) in events.batches_mut().iter_mut().zip(terms) {
            debug!("batch `{}`: {} events, norm = {norm:.6}", batch.name(), rw.len());
            norms.push(BatchNorm {
                name: batch.name().to_string(),
                n_events: rw.len(),
                norm,
            });
            batch.set(RW_ARRAY, rw)?;
            batch.set(CR_RW_ARRAY, cr_rw)?;
        }

        info!(
            "atm_muons stage ready: {} curve in `{}` over {} batch(es)",
            curve.kind(),
            variable.raw_name,
            norms.len()
        );
        self.state = StageState::Ready(Ready {
            curve,
            variable,
            norms,
        });
        Ok(())
    }

    /// Multiply every event weight by the clamped correction factor.
    pub fn apply(&self, events: &mut EventSet) -> Result<(), StageError> {
        if !self.is_ready() {
            return Err(StageError::config("atm_muons stage must be set up before apply."));
        }

        let scale = self.params.get(ATM_MUON_SCALE)?.as_dimensionless()?;
        let shift = self.params.get(DELTA_GAMMA_MU)?.as_dimensionless()?;

        for batch in events.batches() {
            batch.get(WEIGHTS)?;
            batch.get(CR_RW_ARRAY)?;
        }

        events.batches_mut().par_iter_mut().try_for_each(|batch| {
            let (weights, cr_rw) = batch.get_pair_mut(WEIGHTS, CR_RW_ARRAY)?;
            apply_correction(weights, cr_rw, shift, scale);
            Ok::<(), StageError>(())
        })?;

        debug!("applied atm_muon_scale = {scale}, delta_gamma_mu = {shift}");
        Ok(())
    }

    /// Variable the curve is evaluated in, once set up.
    pub fn variable(&self) -> Option<&VariableSpec> {
        match &self.state {
            StageState::Ready(ready) => Some(&ready.variable),
            StageState::Unconfigured => None,
        }
    }
}

/// Curve values, centred values and their mean for one batch.
fn reweight_terms(
    curve: &InterpolatingCurve,
    variable: &VariableSpec,
    batch: &EventBatch,
) -> Result<(Vec<f64>, Vec<f64>, f64), StageError> {
    let values = batch.get(&variable.raw_name)?;
    let rw = curve.eval_many(values).map_err(|e| match e {
        StageError::Data(msg) => StageError::data(format!("batch `{}`: {msg}", batch.name())),
        other => other,
    })?;

    let norm = if rw.is_empty() {
        warn!("batch `{}` has no events; using norm = 0", batch.name());
        0.0
    } else {
        rw.iter().sum::<f64>() / rw.len() as f64
    };
    let cr_rw = rw.iter().map(|v| v - norm).collect();
    Ok((rw, cr_rw, norm))
}

/// `w *= max(0, (1 + shift * term) * scale)` element-wise.
pub fn apply_correction(weights: &mut [f64], cr_rw: &[f64], shift: f64, scale: f64) {
    for (w, &term) in weights.iter_mut().zip(cr_rw) {
        let weight_mod = 1.0 + shift * term;
        *w *= (weight_mod * scale).max(0.0);
    }
}
