//! Builds the muon spectral-index uncertainty curve from a calibration table.
//!
//! Pipeline: validate names -> resolve + read table -> fill zero entries ->
//! pad to `[0, 1]` -> fit.

use log::{debug, info};

use crate::curve::InterpolatingCurve;
use crate::domain::{PaddedTable, SUPPORTED_BARE_VARIABLE, SplineKind, UncertaintyTable, VariableSpec};
use crate::error::StageError;
use crate::io::resource::ResourceLocator;
use crate::io::table::read_table;

/// Lower edge of the physical cos(zenith) range covered by the curve.
pub const DOMAIN_MIN: f64 = 0.0;
/// Upper edge of the physical cos(zenith) range covered by the curve.
pub const DOMAIN_MAX: f64 = 1.0;

/// Validated inputs for a curve build. Produced without touching the file system.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveRequest {
    pub file: String,
    pub variable: VariableSpec,
    pub kind: SplineKind,
}

impl CurveRequest {
    /// Check the variable name, the file name and the spline kind.
    ///
    /// The file-name check only confirms the file *mentions* the variable; it
    /// says nothing about the file contents.
    pub fn validate(file: &str, variable: &str, kind: &str) -> Result<Self, StageError> {
        let variable = VariableSpec::parse(variable);
        if variable.bare_name != SUPPORTED_BARE_VARIABLE {
            return Err(StageError::config(format!(
                "Muon primary cosmic ray systematic is only implemented as a function of \
                 cos(zenith); `{}` was configured.",
                variable.raw_name
            )));
        }
        if !file.contains(&variable.bare_name) {
            return Err(StageError::config(format!(
                "Variable is `{}` but the calibration file '{file}' does not mention `{}` in its name.",
                variable.raw_name, variable.bare_name
            )));
        }
        let kind = kind.parse::<SplineKind>()?;

        Ok(Self {
            file: file.to_string(),
            variable,
            kind,
        })
    }
}

/// Builds curves, resolving calibration files through a [`ResourceLocator`].
#[derive(Debug, Clone, Default)]
pub struct CurveBuilder {
    locator: ResourceLocator,
}

impl CurveBuilder {
    pub fn new(locator: ResourceLocator) -> Self {
        Self { locator }
    }

    /// Validate, load and fit in one go.
    pub fn build(&self, file: &str, variable: &str, kind: &str) -> Result<InterpolatingCurve, StageError> {
        let request = CurveRequest::validate(file, variable, kind)?;
        self.build_request(&request)
    }

    pub fn build_request(&self, request: &CurveRequest) -> Result<InterpolatingCurve, StageError> {
        let path = self.locator.resolve(&request.file)?;
        info!("loading muon uncertainty table from {}", path.display());
        let table = read_table(&path)?;
        build_from_table(table, request.kind)
    }
}

/// Repair, pad and fit an in-memory table.
pub fn build_from_table(mut table: UncertaintyTable, kind: SplineKind) -> Result<InterpolatingCurve, StageError> {
    let filled = fill_zero_entries(&mut table)?;
    if filled > 0 {
        debug!("filled {filled} zero-valued calibration entries from higher x");
    }
    let padded = pad_domain(&table)?;
    debug!(
        "padded calibration table to {} nodes over [{DOMAIN_MIN}, {DOMAIN_MAX}]",
        padded.x.len()
    );
    InterpolatingCurve::new(padded, kind)
}

/// Replace every `y == 0.0` with the value of the next higher-x entry.
///
/// Runs of zeros take the first non-zero value above them. A zero in the last
/// entry has nothing above it to copy from and is rejected. Returns the number
/// of entries replaced.
pub fn fill_zero_entries(table: &mut UncertaintyTable) -> Result<usize, StageError> {
    let y = &mut table.y;
    let Some(&last) = y.last() else {
        return Err(StageError::data("Calibration table is empty."));
    };
    if last == 0.0 {
        return Err(StageError::data(format!(
            "Calibration table ends with a zero entry at x={}; it cannot be filled from higher x.",
            table.x[table.x.len() - 1]
        )));
    }

    let mut filled = 0;
    for i in (0..y.len() - 1).rev() {
        if y[i] == 0.0 {
            y[i] = y[i + 1];
            filled += 1;
        }
    }
    Ok(filled)
}

/// Add nodes at the domain edges copying the nearest real y-value.
///
/// An edge already present in the table is not duplicated.
pub fn pad_domain(table: &UncertaintyTable) -> Result<PaddedTable, StageError> {
    let (Some(&y_first), Some(&y_last)) = (table.y.first(), table.y.last()) else {
        return Err(StageError::data("Calibration table is empty."));
    };

    let mut x = Vec::with_capacity(table.len() + 2);
    let mut y = Vec::with_capacity(table.len() + 2);

    if table.x[0] > DOMAIN_MIN {
        x.push(DOMAIN_MIN);
        y.push(y_first);
    }
    x.extend_from_slice(&table.x);
    y.extend_from_slice(&table.y);
    if table.x[table.x.len() - 1] < DOMAIN_MAX {
        x.push(DOMAIN_MAX);
        y.push(y_last);
    }

    Ok(PaddedTable { x, y })
}
