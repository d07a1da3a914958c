//! The two pre-trained predictors and their MessagePack persistence.

use crate::error::{ArtifactError, ModelError};
use crate::features::{ColumnSpec, FeatureVector};
use linfa::prelude::*;
use linfa_bayes::{GaussianNb, NaiveBayes};
use linfa_linear::FittedLinearRegression;
use ndarray::Array1;
use rmp_serde::{decode::from_read, encode::write_named};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Class label the success classifier was trained with for "hit".
pub const SUCCESS_LABEL: usize = 1;

/// Output of the success classifier for a single movie.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SuccessOutcome {
    pub success: bool,
    pub probability: f64,
}

/// Binary classifier answering "will this movie earn twice its budget?".
pub trait SuccessPredictor {
    fn columns(&self) -> &ColumnSpec;

    fn predict_success(&self, features: &FeatureVector) -> Result<SuccessOutcome, ModelError>;
}

/// Regressor estimating total box office revenue in dollars.
pub trait RevenuePredictor {
    fn columns(&self) -> &ColumnSpec;

    fn predict_revenue(&self, features: &FeatureVector) -> Result<f64, ModelError>;
}

/// Gaussian Naive Bayes success classifier with the columns it was fit on.
#[derive(Serialize, Deserialize)]
pub struct SuccessModel {
    columns: ColumnSpec,
    classifier: GaussianNb<f64, usize>,
}

impl SuccessModel {
    /// Pairs a fitted classifier with the columns it was trained on.
    pub fn new(columns: ColumnSpec, classifier: GaussianNb<f64, usize>) -> Self {
        SuccessModel {
            columns,
            classifier,
        }
    }

    /// Saves the model to a binary `.msgpack` file.
    pub fn save_to_file(&self, path: &Path) -> Result<(), ArtifactError> {
        write_msgpack(path, self)
    }

    /// Loads the model from a binary `.msgpack` file.
    pub fn load_from_file(path: &Path) -> Result<Self, ArtifactError> {
        read_msgpack(path)
    }
}

impl SuccessPredictor for SuccessModel {
    fn columns(&self) -> &ColumnSpec {
        &self.columns
    }

    fn predict_success(&self, features: &FeatureVector) -> Result<SuccessOutcome, ModelError> {
        if !features.matches(&self.columns) {
            return Err(ModelError::ColumnMismatch { model: "success" });
        }

        let input = features.to_row();
        let (proba, classes) = self.classifier.predict_proba(input.view());
        let positive = classes
            .iter()
            .position(|&c| *c == SUCCESS_LABEL)
            .ok_or(ModelError::MissingPositiveClass)?;
        let probability = proba[[0, positive]].clamp(0.0, 1.0);

        let labels: Array1<usize> = self.classifier.predict(&input);
        let label = *labels
            .first()
            .ok_or(ModelError::EmptyPrediction { model: "success" })?;

        Ok(SuccessOutcome {
            success: label == SUCCESS_LABEL,
            probability,
        })
    }
}

/// Ordinary least squares revenue model with the columns it was fit on.
#[derive(Serialize, Deserialize)]
pub struct RevenueModel {
    columns: ColumnSpec,
    regressor: FittedLinearRegression<f64>,
}

impl RevenueModel {
    /// Pairs a fitted regression with its columns; one coefficient per column.
    pub fn new(
        columns: ColumnSpec,
        regressor: FittedLinearRegression<f64>,
    ) -> Result<Self, ArtifactError> {
        let model = RevenueModel { columns, regressor };
        model.check_coefficients()?;
        Ok(model)
    }

    fn check_coefficients(&self) -> Result<(), ArtifactError> {
        let coefficients = self.regressor.params().len();
        if coefficients != self.columns.len() {
            return Err(ArtifactError::CoefficientMismatch {
                coefficients,
                columns: self.columns.len(),
            });
        }
        Ok(())
    }

    /// Saves the model to a binary `.msgpack` file.
    pub fn save_to_file(&self, path: &Path) -> Result<(), ArtifactError> {
        write_msgpack(path, self)
    }

    /// Loads the model from a binary `.msgpack` file.
    pub fn load_from_file(path: &Path) -> Result<Self, ArtifactError> {
        let model: RevenueModel = read_msgpack(path)?;
        model.check_coefficients()?;
        Ok(model)
    }
}

impl RevenuePredictor for RevenueModel {
    fn columns(&self) -> &ColumnSpec {
        &self.columns
    }

    fn predict_revenue(&self, features: &FeatureVector) -> Result<f64, ModelError> {
        if !features.matches(&self.columns) {
            return Err(ModelError::ColumnMismatch { model: "revenue" });
        }

        let input = features.to_row();
        let estimates: Array1<f64> = self.regressor.predict(&input);
        let revenue = *estimates
            .first()
            .ok_or(ModelError::EmptyPrediction { model: "revenue" })?;

        // A linear fit can dip below zero for tiny budgets.
        Ok(revenue.max(0.0))
    }
}

fn write_msgpack<T: Serialize>(path: &Path, value: &T) -> Result<(), ArtifactError> {
    let file = File::create(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    write_named(&mut writer, value).map_err(|source| ArtifactError::Encode {
        path: path.to_path_buf(),
        source,
    })
}

fn read_msgpack<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let file = File::open(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    from_read(reader).map_err(|source| ArtifactError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{MonthStrengthRecord, MonthlyRevenueIndex, TalentRoster};
    use crate::features::FeatureEncoder;
    use crate::input::MovieInput;
    use linfa_linear::LinearRegression;
    use ndarray::{Array1, Array2, array};

    fn spec(names: &[&str]) -> ColumnSpec {
        ColumnSpec::new(names).unwrap()
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn success_model() -> SuccessModel {
        let x: Array2<f64> = array![
            [120e6, 90e6, 1.0, 0.0, 0.0, 3.0, 1.0],
            [95e6, 85e6, 1.0, 1.0, 0.0, 2.0, 1.0],
            [80e6, 70e6, 0.0, 1.0, 0.0, 2.0, 0.0],
            [150e6, 95e6, 1.0, 0.0, 0.0, 3.0, 1.0],
            [10e6, 30e6, 0.0, 0.0, 1.0, 0.0, 0.0],
            [25e6, 35e6, 0.0, 1.0, 0.0, 1.0, 0.0],
            [5e6, 40e6, 0.0, 0.0, 1.0, 0.0, 1.0],
            [30e6, 28e6, 1.0, 0.0, 0.0, 1.0, 0.0],
        ];
        let y: Array1<usize> = array![1, 1, 1, 1, 0, 0, 0, 0];
        let classifier = GaussianNb::params()
            .fit(&Dataset::new(x, y))
            .expect("Training failed");
        let columns = spec(&[
            "budget",
            "release_month_strength",
            "genre_Action",
            "genre_Drama",
            "genre_Horror",
            "top_actor_count",
            "known_director",
        ]);
        SuccessModel::new(columns, classifier)
    }

    fn tables() -> (MonthlyRevenueIndex, TalentRoster) {
        let months = MonthlyRevenueIndex::new(
            [(1, 40e6), (6, 90e6), (7, 45e6), (12, 95e6)]
                .map(|(month, strength)| MonthStrengthRecord { month, strength }),
        )
        .unwrap();
        let roster = TalentRoster::new(["Tom Hanks", "Meryl Streep"], ["Steven Spielberg"]);
        (months, roster)
    }

    #[test]
    fn classifier_reports_positive_class_for_strong_movie() {
        let model = success_model();
        let (months, roster) = tables();
        let encoder = FeatureEncoder::new(&months, &roster);
        let input = MovieInput::new(
            130_000_000,
            strings(&["Action"]),
            strings(&["Tom Hanks", "Meryl Streep"]),
            "Steven Spielberg",
            12,
        )
        .unwrap();

        let outcome = model
            .predict_success(&encoder.encode(&input, model.columns()))
            .unwrap();
        assert!(outcome.success);
        assert!(outcome.probability > 0.5, "p = {}", outcome.probability);
    }

    #[test]
    fn classifier_reports_failure_for_weak_movie() {
        let model = success_model();
        let (months, roster) = tables();
        let encoder = FeatureEncoder::new(&months, &roster);
        let input = MovieInput::new(
            6_000_000,
            strings(&["Horror"]),
            strings(&["none"]),
            "none",
            1,
        )
        .unwrap();

        let outcome = model
            .predict_success(&encoder.encode(&input, model.columns()))
            .unwrap();
        assert!(!outcome.success);
        assert!(outcome.probability < 0.5, "p = {}", outcome.probability);
    }

    #[test]
    fn classifier_refuses_foreign_columns() {
        let model = success_model();
        let (months, roster) = tables();
        let encoder = FeatureEncoder::new(&months, &roster);
        let input = MovieInput::new(6_000_000, vec![], vec![], "none", 1).unwrap();

        let row = encoder.encode(&input, &spec(&["budget", "release_month_strength"]));
        assert_eq!(
            model.predict_success(&row),
            Err(ModelError::ColumnMismatch { model: "success" })
        );
    }

    fn revenue_model() -> RevenueModel {
        // revenue = 3 * budget
        let x: Array2<f64> = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![3.0, 6.0, 9.0, 12.0];
        let regressor = LinearRegression::new().fit(&Dataset::new(x, y)).unwrap();
        RevenueModel::new(spec(&["budget"]), regressor).unwrap()
    }

    #[test]
    fn rejects_coefficient_column_mismatch() {
        let x: Array2<f64> = array![[1.0], [2.0], [3.0]];
        let y = array![1.0, 2.0, 3.0];
        let regressor = LinearRegression::new().fit(&Dataset::new(x, y)).unwrap();
        let err = RevenueModel::new(spec(&["budget", "known_director"]), regressor).err();
        assert!(matches!(
            err,
            Some(ArtifactError::CoefficientMismatch {
                coefficients: 1,
                columns: 2
            })
        ));
    }

    #[test]
    fn revenue_model_refuses_foreign_columns() {
        let model = revenue_model();
        let other = spec(&["known_director"]);
        let months = MonthlyRevenueIndex::new([MonthStrengthRecord {
            month: 1,
            strength: 1.0,
        }])
        .unwrap();
        let roster = TalentRoster::default();
        let encoder = FeatureEncoder::new(&months, &roster);
        let input = MovieInput::new(2_000_000, vec![], vec![], "none", 1).unwrap();

        let row = encoder.encode(&input, &other);
        assert_eq!(
            model.predict_revenue(&row),
            Err(ModelError::ColumnMismatch { model: "revenue" })
        );

        let row = encoder.encode(&input, model.columns());
        let revenue = model.predict_revenue(&row).unwrap();
        assert!((revenue - 6_000_000.0).abs() < 1.0);
    }

    #[test]
    fn persists_as_msgpack() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("revenue_model.msgpack");
        revenue_model().save_to_file(&path).unwrap();

        let loaded = RevenueModel::load_from_file(&path).unwrap();
        assert_eq!(loaded.columns().names(), vec!["budget"]);
    }

    #[test]
    fn garbage_file_fails_to_decode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("success_model.msgpack");
        std::fs::write(&path, b"not a model").unwrap();
        assert!(matches!(
            SuccessModel::load_from_file(&path),
            Err(ArtifactError::Decode { .. })
        ));
    }
}
