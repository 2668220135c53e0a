//! Named model parameters with optional bounds.

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, ReflError};

/// A single model parameter, such as a layer thickness or magnetic SLD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Display name, unique within a [`ParameterSet`].
    pub name: String,
    /// Current value.
    pub value: f64,
    /// Optional `(low, high)` prior bounds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<(f64, f64)>,
    /// Whether the parameter takes part in information calculations.
    #[serde(default)]
    pub vary: bool,
}

impl Parameter {
    /// Creates a fixed parameter without bounds.
    pub fn fixed(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            bounds: None,
            vary: false,
        }
    }

    /// Creates a varying parameter with the given bounds.
    pub fn varying(name: impl Into<String>, value: f64, bounds: (f64, f64)) -> Self {
        let (lo, hi) = if bounds.0 <= bounds.1 {
            bounds
        } else {
            (bounds.1, bounds.0)
        };
        Self {
            name: name.into(),
            value,
            bounds: Some((lo, hi)),
            vary: true,
        }
    }

    /// Width of the bounds interval, if bounded.
    pub fn bound_width(&self) -> Option<f64> {
        self.bounds.map(|(lo, hi)| hi - lo)
    }
}

/// Ordered collection of parameters addressed by index or by name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParameterSet {
    params: Vec<Parameter>,
}

impl ParameterSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a parameter and returns its index.
    pub fn push(&mut self, param: Parameter) -> usize {
        self.params.push(param);
        self.params.len() - 1
    }

    /// Number of parameters in the set.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns `true` when the set holds no parameters.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Iterates over the parameters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter()
    }

    /// Returns the parameter at `idx`.
    pub fn get(&self, idx: usize) -> Result<&Parameter, ReflError> {
        self.params.get(idx).ok_or_else(|| out_of_range(idx, self.len()))
    }

    /// Returns the value of the parameter at `idx`.
    pub fn value(&self, idx: usize) -> Result<f64, ReflError> {
        Ok(self.get(idx)?.value)
    }

    /// Overwrites the value of the parameter at `idx`.
    pub fn set_value(&mut self, idx: usize, value: f64) -> Result<(), ReflError> {
        let len = self.len();
        let param = self
            .params
            .get_mut(idx)
            .ok_or_else(|| out_of_range(idx, len))?;
        if !value.is_finite() {
            return Err(ReflError::Model(
                ErrorInfo::new("param-non-finite", "parameter values must be finite")
                    .with_context("name", param.name.clone())
                    .with_context("value", value.to_string()),
            ));
        }
        param.value = value;
        Ok(())
    }

    /// Looks up the index of a parameter by name.
    pub fn index_of(&self, name: &str) -> Result<usize, ReflError> {
        self.params
            .iter()
            .position(|param| param.name == name)
            .ok_or_else(|| {
                ReflError::Model(
                    ErrorInfo::new("param-unknown", "no parameter with this name")
                        .with_context("name", name),
                )
            })
    }

    /// Returns the value of the named parameter.
    pub fn value_of(&self, name: &str) -> Result<f64, ReflError> {
        self.value(self.index_of(name)?)
    }

    /// Indices of parameters flagged as varying.
    pub fn varying(&self) -> Vec<usize> {
        self.params
            .iter()
            .enumerate()
            .filter(|(_, param)| param.vary)
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Names of the parameters at the given indices.
    pub fn names(&self, indices: &[usize]) -> Vec<String> {
        indices
            .iter()
            .filter_map(|&idx| self.params.get(idx).map(|param| param.name.clone()))
            .collect()
    }
}

impl FromIterator<Parameter> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = Parameter>>(iter: I) -> Self {
        Self {
            params: iter.into_iter().collect(),
        }
    }
}

fn out_of_range(idx: usize, len: usize) -> ReflError {
    ReflError::Model(
        ErrorInfo::new("param-index", "parameter index out of range")
            .with_context("index", idx.to_string())
            .with_context("len", len.to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn varying_bounds_are_ordered() {
        let param = Parameter::varying("sld", -0.5, (-0.4, -0.6));
        assert_eq!(param.bounds, Some((-0.6, -0.4)));
    }

    #[test]
    fn lookup_by_name() {
        let set: ParameterSet = vec![
            Parameter::fixed("a", 1.0),
            Parameter::varying("b", 2.0, (1.0, 3.0)),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.index_of("b").unwrap(), 1);
        assert_eq!(set.varying(), vec![1]);
        assert!(set.index_of("c").is_err());
    }
}
