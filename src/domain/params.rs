//! Named stage parameters.
//!
//! A stage declares the parameter names it expects and reads them by key.
//! Numeric parameters are quantities with units and are converted to plain
//! dimensionless scalars at the point of use.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::StageError;

/// Units accepted for numeric parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Units {
    Dimensionless,
    Percent,
}

impl Units {
    /// Convert a magnitude in these units to a dimensionless scalar.
    pub fn to_dimensionless(self, magnitude: f64) -> f64 {
        match self {
            Units::Dimensionless => magnitude,
            Units::Percent => magnitude / 100.0,
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Units::Dimensionless => f.write_str("dimensionless"),
            Units::Percent => f.write_str("percent"),
        }
    }
}

impl FromStr for Units {
    type Err = StageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "dimensionless" => Ok(Units::Dimensionless),
            "percent" | "%" => Ok(Units::Percent),
            other => Err(StageError::config(format!(
                "Unsupported units '{other}'. Expected `dimensionless` or `percent`."
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quantity {
    pub magnitude: f64,
    pub units: Units,
}

impl Quantity {
    pub fn dimensionless(magnitude: f64) -> Self {
        Self {
            magnitude,
            units: Units::Dimensionless,
        }
    }

    pub fn to_dimensionless(&self) -> f64 {
        self.units.to_dimensionless(self.magnitude)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Quantity(Quantity),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub value: ParamValue,
}

impl Param {
    pub fn quantity(name: impl Into<String>, quantity: Quantity) -> Self {
        Self {
            name: name.into(),
            value: ParamValue::Quantity(quantity),
        }
    }

    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: ParamValue::Text(value.into()),
        }
    }

    pub fn as_text(&self) -> Result<&str, StageError> {
        match &self.value {
            ParamValue::Text(s) => Ok(s),
            ParamValue::Quantity(_) => Err(StageError::config(format!(
                "Parameter `{}` must be a string, got a quantity.",
                self.name
            ))),
        }
    }

    pub fn as_quantity(&self) -> Result<Quantity, StageError> {
        match &self.value {
            ParamValue::Quantity(q) => Ok(*q),
            ParamValue::Text(s) => Err(StageError::config(format!(
                "Parameter `{}` must be a quantity, got string '{s}'.",
                self.name
            ))),
        }
    }

    /// Magnitude converted to a dimensionless scalar.
    pub fn as_dimensionless(&self) -> Result<f64, StageError> {
        let value = self.as_quantity()?.to_dimensionless();
        if !value.is_finite() {
            return Err(StageError::config(format!(
                "Parameter `{}` must be finite, got {value}.",
                self.name
            )));
        }
        Ok(value)
    }
}

/// A keyed collection of parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamSet {
    params: BTreeMap<String, Param>,
}

impl ParamSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a parameter.
    pub fn set(&mut self, param: Param) {
        self.params.insert(param.name.clone(), param);
    }

    pub fn with(mut self, param: Param) -> Self {
        self.set(param);
        self
    }

    pub fn get(&self, name: &str) -> Result<&Param, StageError> {
        self.params
            .get(name)
            .ok_or_else(|| StageError::config(format!("Missing required parameter `{name}`.")))
    }

    /// Fail unless every expected parameter is present.
    pub fn require(&self, expected: &[&str]) -> Result<(), StageError> {
        let missing: Vec<&str> = expected
            .iter()
            .copied()
            .filter(|name| !self.params.contains_key(*name))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(StageError::config(format!(
                "Missing required parameter(s): {}.",
                missing.join(", ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_converts_to_dimensionless() {
        let q = Quantity {
            magnitude: 150.0,
            units: Units::Percent,
        };
        assert!((q.to_dimensionless() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn unknown_units_are_rejected() {
        assert!("meters".parse::<Units>().is_err());
        assert_eq!("".parse::<Units>().unwrap(), Units::Dimensionless);
    }

    #[test]
    fn missing_and_mistyped_params_fail() {
        let params = ParamSet::new()
            .with(Param::text("delta_gamma_mu_file", "muon_coszen_unc.txt"))
            .with(Param::quantity("delta_gamma_mu", Quantity::dimensionless(0.5)));

        assert!(matches!(params.get("atm_muon_scale"), Err(StageError::Configuration(_))));
        assert!(params.get("delta_gamma_mu_file").unwrap().as_quantity().is_err());
        assert!(params.get("delta_gamma_mu").unwrap().as_text().is_err());
        assert_eq!(params.get("delta_gamma_mu").unwrap().as_dimensionless().unwrap(), 0.5);

        let err = params.require(&["delta_gamma_mu", "atm_muon_scale"]).unwrap_err();
        assert!(err.to_string().contains("atm_muon_scale"));
    }
}
