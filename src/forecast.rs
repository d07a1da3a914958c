//! Ties the reference tables, the encoder, both models and the explainer
//! together, and renders the results panel.

use crate::catalog::{MonthlyRevenueIndex, TalentRoster, month_name};
use crate::error::{ArtifactError, ModelError};
use crate::explain::{Explanation, PredictionResult, explain};
use crate::features::{DerivedSignals, FeatureEncoder};
use crate::input::MovieInput;
use crate::model::{RevenueModel, RevenuePredictor, SuccessModel, SuccessPredictor};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const SUCCESS_MODEL_FILE: &str = "success_model.msgpack";
pub const REVENUE_MODEL_FILE: &str = "revenue_model.msgpack";
pub const MONTHLY_REVENUE_FILE: &str = "monthly_revenue.csv";
pub const TOP_ACTORS_FILE: &str = "top_actors.csv";
pub const TOP_DIRECTORS_FILE: &str = "top_directors.csv";

/// Locations of every startup artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub success_model: PathBuf,
    pub revenue_model: PathBuf,
    pub monthly_revenue: PathBuf,
    pub top_actors: PathBuf,
    pub top_directors: PathBuf,
}

impl ArtifactPaths {
    /// The standard file names inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        ArtifactPaths {
            success_model: dir.join(SUCCESS_MODEL_FILE),
            revenue_model: dir.join(REVENUE_MODEL_FILE),
            monthly_revenue: dir.join(MONTHLY_REVENUE_FILE),
            top_actors: dir.join(TOP_ACTORS_FILE),
            top_directors: dir.join(TOP_DIRECTORS_FILE),
        }
    }
}

/// Everything a forecast needs, loaded once and never mutated.
pub struct Forecaster<S, R> {
    success_model: S,
    revenue_model: R,
    months: MonthlyRevenueIndex,
    roster: TalentRoster,
}

impl Forecaster<SuccessModel, RevenueModel> {
    /// Loads all artifacts. Any failure here means the tool cannot serve.
    pub fn load(paths: &ArtifactPaths) -> Result<Self, ArtifactError> {
        info!(path = ?paths.success_model, "📦 Loading success model");
        let success_model = SuccessModel::load_from_file(&paths.success_model)?;
        info!(path = ?paths.revenue_model, "📦 Loading revenue model");
        let revenue_model = RevenueModel::load_from_file(&paths.revenue_model)?;

        let months = MonthlyRevenueIndex::from_csv(&paths.monthly_revenue)?;
        let roster = TalentRoster::from_csv(&paths.top_actors, &paths.top_directors)?;

        info!(
            success_columns = success_model.columns().len(),
            revenue_columns = revenue_model.columns().len(),
            months = months.len(),
            actors = roster.actors().count(),
            directors = roster.directors().count(),
            "artifacts loaded"
        );

        Ok(Forecaster::new(success_model, revenue_model, months, roster))
    }
}

impl<S: SuccessPredictor, R: RevenuePredictor> Forecaster<S, R> {
    /// Assembles a forecaster from already loaded parts.
    pub fn new(
        success_model: S,
        revenue_model: R,
        months: MonthlyRevenueIndex,
        roster: TalentRoster,
    ) -> Self {
        Forecaster {
            success_model,
            revenue_model,
            months,
            roster,
        }
    }

    /// An encoder over this forecaster's reference tables.
    pub fn encoder(&self) -> FeatureEncoder<'_> {
        FeatureEncoder::new(&self.months, &self.roster)
    }

    /// The monthly revenue index.
    pub fn months(&self) -> &MonthlyRevenueIndex {
        &self.months
    }

    /// The top actor and director lists.
    pub fn roster(&self) -> &TalentRoster {
        &self.roster
    }

    /// Genres the form offers: the success model's vocabulary, sorted.
    pub fn genre_options(&self) -> Vec<&str> {
        let genres: BTreeSet<&str> = self.success_model.columns().genres().collect();
        genres.into_iter().collect()
    }

    /// Encodes the input for both models, runs them and explains the result.
    pub fn forecast(&self, input: &MovieInput) -> Result<Forecast, ModelError> {
        let encoder = self.encoder();
        let signals = encoder.signals(input);

        let success_row = encoder.encode_with(input, &signals, self.success_model.columns());
        let revenue_row = encoder.encode_with(input, &signals, self.revenue_model.columns());
        debug!(?success_row, ?revenue_row, "encoded feature vectors");

        let outcome = self.success_model.predict_success(&success_row)?;
        let predicted_revenue = self.revenue_model.predict_revenue(&revenue_row)?;
        debug!(?outcome, predicted_revenue, "raw predictions");

        let prediction = PredictionResult {
            success_label: outcome.success,
            success_probability: outcome.probability,
            predicted_revenue,
        };
        let explanation = explain(input, &signals, &prediction, self.months.best_month());

        Ok(Forecast {
            prediction,
            signals,
            explanation,
        })
    }
}

/// The outcome of one submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    pub prediction: PredictionResult,
    pub signals: DerivedSignals,
    pub explanation: Explanation,
}

impl Forecast {
    /// The success or failure banner.
    pub fn headline(&self) -> &'static str {
        if self.prediction.success_label {
            "✅ The movie is predicted to be a SUCCESS!"
        } else {
            "❌ The movie is predicted to FAIL."
        }
    }

    /// A flat, serializable view of the results panel.
    pub fn report(&self) -> Report {
        Report {
            success: self.prediction.success_label,
            success_probability: self.prediction.success_probability,
            predicted_revenue: self.prediction.predicted_revenue,
            signals: self.signals,
            reasons: self
                .explanation
                .factors
                .iter()
                .map(ToString::to_string)
                .collect(),
            suggestions: self
                .explanation
                .suggestions
                .as_ref()
                .map(|s| s.iter().map(ToString::to_string).collect()),
        }
    }
}

impl fmt::Display for Forecast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "🎯 Prediction Results")?;
        writeln!(f, "{}", self.headline())?;
        writeln!(
            f,
            "Predicted Success Probability: {}",
            format_percent(self.prediction.success_probability)
        )?;
        writeln!(
            f,
            "Estimated Box Office Revenue: {}",
            format_dollars(self.prediction.predicted_revenue)
        )?;

        writeln!(f)?;
        writeln!(f, "🧠 Why this prediction")?;
        for factor in &self.explanation.factors {
            writeln!(f, "- {factor}")?;
        }

        if let Some(suggestions) = &self.explanation.suggestions {
            writeln!(f)?;
            writeln!(f, "📈 Suggestions to Improve Success Chances")?;
            for suggestion in suggestions {
                writeln!(f, "- {suggestion}")?;
            }
        }
        Ok(())
    }
}

/// Results panel in a shape suitable for JSON output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub success: bool,
    pub success_probability: f64,
    pub predicted_revenue: f64,
    pub signals: DerivedSignals,
    pub reasons: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
}

/// `0.4213` → `42.13%`
pub fn format_percent(p: f64) -> String {
    format!("{:.2}%", p * 100.0)
}

/// Whole dollars with thousands separators: `1234567.8` → `$1,234,568`.
pub fn format_dollars(amount: f64) -> String {
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if rounded < 0.0 {
        format!("-${out}")
    } else {
        format!("${out}")
    }
}

/// `12` → `December (12)`
pub fn format_month(month: u32) -> String {
    format!("{} ({month})", month_name(month))
}
