//! Translation of form selections into the column layout each model was fit with.

use crate::catalog::{MonthlyRevenueIndex, TalentRoster};
use crate::error::ArtifactError;
use crate::input::{MAX_ACTORS, MovieInput};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

pub const BUDGET: &str = "budget";
pub const RELEASE_MONTH_STRENGTH: &str = "release_month_strength";
pub const TOP_ACTOR_COUNT: &str = "top_actor_count";
pub const CAST_COUNT: &str = "cast_count";
pub const KNOWN_DIRECTOR: &str = "known_director";
pub const GENRE_PREFIX: &str = "genre_";

/// A single feature column a model may expect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Column {
    Budget,
    ReleaseMonthStrength,
    Genre(String),
    TopActorCount,
    /// Older models name the top-actor count `cast_count`.
    CastCount,
    KnownDirector,
}

impl Column {
    /// Parses a column name as recorded in a model artifact.
    pub fn parse(name: &str) -> Result<Self, ArtifactError> {
        let column = match name {
            BUDGET => Column::Budget,
            RELEASE_MONTH_STRENGTH => Column::ReleaseMonthStrength,
            TOP_ACTOR_COUNT => Column::TopActorCount,
            CAST_COUNT => Column::CastCount,
            KNOWN_DIRECTOR => Column::KnownDirector,
            other => match other.strip_prefix(GENRE_PREFIX) {
                Some(genre) if !genre.is_empty() => Column::Genre(genre.to_string()),
                _ => return Err(ArtifactError::UnknownColumn(other.to_string())),
            },
        };
        Ok(column)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Column::Budget => f.write_str(BUDGET),
            Column::ReleaseMonthStrength => f.write_str(RELEASE_MONTH_STRENGTH),
            Column::Genre(genre) => write!(f, "{GENRE_PREFIX}{genre}"),
            Column::TopActorCount => f.write_str(TOP_ACTOR_COUNT),
            Column::CastCount => f.write_str(CAST_COUNT),
            Column::KnownDirector => f.write_str(KNOWN_DIRECTOR),
        }
    }
}

/// The ordered feature columns of one model, as recorded when it was fit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct ColumnSpec {
    columns: Vec<Column>,
}

impl ColumnSpec {
    /// Parses column names in order, rejecting unknown and repeated ones.
    pub fn new<I>(names: I) -> Result<Self, ArtifactError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut columns = vec![];
        for name in names {
            let name = name.as_ref();
            if !seen.insert(name.to_string()) {
                return Err(ArtifactError::DuplicateColumn(name.to_string()));
            }
            columns.push(Column::parse(name)?);
        }
        Ok(ColumnSpec { columns })
    }

    /// Columns in model order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names as the model knows them.
    pub fn names(&self) -> Vec<String> {
        self.columns.iter().map(Column::to_string).collect()
    }

    /// The model's genre vocabulary, in column order.
    pub fn genres(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().filter_map(|c| match c {
            Column::Genre(g) => Some(g.as_str()),
            _ => None,
        })
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// True for a model with no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl TryFrom<Vec<String>> for ColumnSpec {
    type Error = ArtifactError;

    fn try_from(names: Vec<String>) -> Result<Self, Self::Error> {
        ColumnSpec::new(names)
    }
}

impl From<ColumnSpec> for Vec<String> {
    fn from(spec: ColumnSpec) -> Self {
        spec.names()
    }
}

/// One encoded row, named column by column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    columns: Vec<String>,
    values: Vec<f64>,
}

impl FeatureVector {
    /// Column names, in the order of [`values`](Self::values).
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Encoded values, one per column.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Value of a named column, if the vector has it.
    pub fn get(&self, column: &str) -> Option<f64> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| self.values[i])
    }

    /// Number of encoded values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when nothing was encoded.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True when the column names match `spec` exactly, order included.
    pub fn matches(&self, spec: &ColumnSpec) -> bool {
        self.columns.len() == spec.len()
            && self
                .columns
                .iter()
                .zip(spec.columns())
                .all(|(name, column)| *name == column.to_string())
    }

    /// A `(1, n)` matrix for the linfa predictors.
    pub fn to_row(&self) -> Array2<f64> {
        Array1::from(self.values.clone()).insert_axis(Axis(0))
    }
}

/// Values derived from the input that both the encoder and the explainer use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedSignals {
    pub actor_count: u32,
    pub known_director: bool,
    pub month_strength: f64,
    pub mean_month_strength: f64,
}

/// Encodes [`MovieInput`]s against the startup reference tables.
#[derive(Debug, Clone, Copy)]
pub struct FeatureEncoder<'a> {
    months: &'a MonthlyRevenueIndex,
    roster: &'a TalentRoster,
}

impl<'a> FeatureEncoder<'a> {
    /// Borrows the reference tables for encoding.
    pub fn new(months: &'a MonthlyRevenueIndex, roster: &'a TalentRoster) -> Self {
        FeatureEncoder { months, roster }
    }

    /// Actor count, director recognition and month strength for `input`.
    pub fn signals(&self, input: &MovieInput) -> DerivedSignals {
        let named: BTreeSet<&str> = input.named_actors().collect();
        let actor_count = named
            .into_iter()
            .filter(|a| self.roster.is_top_actor(a))
            .count()
            .min(MAX_ACTORS) as u32;

        let known_director = input
            .named_director()
            .is_some_and(|d| self.roster.is_top_director(d));

        DerivedSignals {
            actor_count,
            known_director,
            month_strength: self.months.strength(input.release_month),
            mean_month_strength: self.months.mean(),
        }
    }

    /// Builds the row for the model described by `spec`.
    ///
    /// Every column of `spec` gets a value; genres the model never saw are
    /// dropped and genre columns the user did not pick stay at zero.
    pub fn encode(&self, input: &MovieInput, spec: &ColumnSpec) -> FeatureVector {
        self.encode_with(input, &self.signals(input), spec)
    }

    /// Like [`encode`](Self::encode), reusing signals already computed for `input`.
    pub fn encode_with(
        &self,
        input: &MovieInput,
        signals: &DerivedSignals,
        spec: &ColumnSpec,
    ) -> FeatureVector {
        let selected: HashSet<&str> = input.genres.iter().map(|g| g.trim()).collect();

        let values = spec
            .columns()
            .iter()
            .map(|column| match column {
                Column::Budget => input.budget as f64,
                Column::ReleaseMonthStrength => signals.month_strength,
                Column::Genre(genre) => indicator(selected.contains(genre.as_str())),
                Column::TopActorCount | Column::CastCount => signals.actor_count as f64,
                Column::KnownDirector => indicator(signals.known_director),
            })
            .collect();

        FeatureVector {
            columns: spec.names(),
            values,
        }
    }
}

fn indicator(flag: bool) -> f64 {
    if flag { 1.0 } else { 0.0 }
}
