//! # boxoffice 🎬
//!
//! Predict whether a movie will be a box office success and estimate its
//! total revenue, using two pre-trained models loaded from disk.
//!
//! A movie is described by its budget, up to three genres, up to three
//! top-billed actors, a director and a planned release month. The crate
//! encodes those selections into the exact feature columns each model was
//! fit with, runs a [`linfa-bayes`](https://crates.io/crates/linfa-bayes)
//! Gaussian Naive Bayes success classifier and a
//! [`linfa-linear`](https://crates.io/crates/linfa-linear) revenue
//! regression, and explains the outcome with fixed, rule-based reasoning.
//!
//! **Success** means a movie earns at least twice its production budget.
//! Suggestions for improvement are only given when the predicted success
//! probability is below 60%.
//!
//! ## Features
//! - Column-exact feature encoding with zero-filled genre indicators
//! - Success label + probability and revenue estimate
//! - Canned reasoning and improvement suggestions
//! - Model persistence with `rmp-serde` (MessagePack)
//! - Reference tables (release month strength, top actors and directors) from CSV
//! - Benchmarkable with [Criterion](https://crates.io/crates/criterion)
//!
//! ## Example
//! ```no_run
//! use std::path::Path;
//! use boxoffice::{ArtifactPaths, Forecaster, MovieInput};
//!
//! let forecaster = Forecaster::load(&ArtifactPaths::in_dir(Path::new("artifacts")))?;
//! let movie = MovieInput::new(
//!     60_000_000,
//!     vec!["Action".into()],
//!     vec!["Tom Hanks".into(), "Meryl Streep".into()],
//!     "Steven Spielberg",
//!     12,
//! )?;
//! let forecast = forecaster.forecast(&movie)?;
//! println!("{forecast}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod catalog;
pub mod error;
pub mod explain;
pub mod features;
pub mod forecast;
pub mod input;
pub mod model;

pub use catalog::{MonthlyRevenueIndex, TalentRoster};
pub use error::{ArtifactError, InputError, ModelError};
pub use explain::{Explanation, Factor, PredictionResult, Suggestion, explain};
pub use features::{ColumnSpec, DerivedSignals, FeatureEncoder, FeatureVector};
pub use forecast::{ArtifactPaths, Forecast, Forecaster, Report};
pub use input::MovieInput;
pub use model::{RevenueModel, RevenuePredictor, SuccessModel, SuccessOutcome, SuccessPredictor};
