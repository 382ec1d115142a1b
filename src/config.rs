//! Estimator configuration, loadable from JSON.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{EstimatorError, Result};
use crate::reduction::{CostModel, ShapeModel};
use crate::report::DEFAULT_NAME_WIDTH;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    pub red_cost_model: CostModel,
    pub red_shape_model: ShapeModel,
    pub jobs: usize,
    pub catch_failures: bool,
    pub name_width: usize,
    pub log_level: u8,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            red_cost_model: CostModel::default(),
            red_shape_model: ShapeModel::default(),
            jobs: 1,
            catch_failures: true,
            name_width: DEFAULT_NAME_WIDTH,
            log_level: 1,
        }
    }
}

impl EstimatorConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.jobs == 0 {
            return Err(EstimatorError::Config("jobs must be at least 1".to_string()));
        }
        if self.name_width == 0 {
            return Err(EstimatorError::Config("name_width must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EstimatorConfig::default();
        assert_eq!(config.red_cost_model, CostModel::Matzov);
        assert_eq!(config.red_shape_model, ShapeModel::Gsa);
        assert_eq!(config.jobs, 1);
        assert!(config.catch_failures);
        assert_eq!(config.name_width, 20);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config =
            EstimatorConfig::from_json_str(r#"{"jobs": 4, "red_shape_model": "zgsa"}"#).unwrap();
        assert_eq!(config.jobs, 4);
        assert_eq!(config.red_shape_model, ShapeModel::Zgsa);
        assert_eq!(config.red_cost_model, CostModel::Matzov);
    }

    #[test]
    fn test_rejects_zero_jobs() {
        let err = EstimatorConfig::from_json_str(r#"{"jobs": 0}"#).unwrap_err();
        assert!(matches!(err, EstimatorError::Config(_)));
    }

    #[test]
    fn test_bad_json() {
        let err = EstimatorConfig::from_json_str("{jobs").unwrap_err();
        assert!(matches!(err, EstimatorError::Json(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = EstimatorConfig::from_path("/nonexistent/estimator.json").unwrap_err();
        assert!(matches!(err, EstimatorError::IoError(_)));
    }
}
