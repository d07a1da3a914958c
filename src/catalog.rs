//! Reference tables loaded once at startup: the monthly revenue index and
//! the lists of bankable actors and directors.

use crate::error::ArtifactError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::path::Path;

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// English name for a 1-based month number.
pub fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|i| MONTH_NAMES.get(i as usize))
        .copied()
        .unwrap_or("Unknown")
}

/// One row of `monthly_revenue.csv`.
#[derive(Debug, Deserialize, Clone, Serialize)]
pub struct MonthStrengthRecord {
    pub month: u32,
    pub strength: f64,
}

/// One row of `top_actors.csv` / `top_directors.csv`.
#[derive(Debug, Deserialize, Clone, Serialize)]
pub struct NameRecord {
    pub name: String,
}

/// Historical average revenue per release month.
#[derive(Debug, Clone)]
pub struct MonthlyRevenueIndex {
    strengths: BTreeMap<u32, f64>,
    mean: f64,
    best_month: u32,
}

impl MonthlyRevenueIndex {
    /// Builds the index, rejecting empty tables, months outside 1..=12 and
    /// non-finite values. A month listed twice keeps its last value.
    pub fn new(
        records: impl IntoIterator<Item = MonthStrengthRecord>,
    ) -> Result<Self, ArtifactError> {
        let mut strengths = BTreeMap::new();
        for record in records {
            if !(1..=12).contains(&record.month) {
                return Err(ArtifactError::InvalidMonth(record.month));
            }
            if !record.strength.is_finite() {
                return Err(ArtifactError::InvalidStrength(record.month));
            }
            strengths.insert(record.month, record.strength);
        }

        if strengths.is_empty() {
            return Err(ArtifactError::EmptyMonthTable);
        }

        let mean = strengths.values().sum::<f64>() / strengths.len() as f64;

        // Earliest month wins a tie.
        let mut best_month = 0;
        let mut best = f64::NEG_INFINITY;
        for (&month, &strength) in &strengths {
            if strength > best {
                best = strength;
                best_month = month;
            }
        }

        Ok(MonthlyRevenueIndex {
            strengths,
            mean,
            best_month,
        })
    }

    /// Loads `month,strength` rows from a CSV file.
    pub fn from_csv(path: &Path) -> Result<Self, ArtifactError> {
        let records = read_csv::<MonthStrengthRecord>(path)?;
        Self::new(records)
    }

    /// Strength for `month`, or the table mean when the month has no history.
    pub fn strength(&self, month: u32) -> f64 {
        self.strengths.get(&month).copied().unwrap_or(self.mean)
    }

    /// Average strength across the months in the table.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Month with the highest historical strength.
    pub fn best_month(&self) -> u32 {
        self.best_month
    }

    /// Number of months with history.
    pub fn len(&self) -> usize {
        self.strengths.len()
    }

    /// True when no month has history.
    pub fn is_empty(&self) -> bool {
        self.strengths.is_empty()
    }
}

/// Curated lists of historically bankable actors and directors.
#[derive(Debug, Clone, Default)]
pub struct TalentRoster {
    actors: BTreeSet<String>,
    directors: BTreeSet<String>,
}

impl TalentRoster {
    /// Builds the roster, trimming names and dropping blanks.
    pub fn new<A, D>(actors: A, directors: D) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
        D: IntoIterator,
        D::Item: Into<String>,
    {
        TalentRoster {
            actors: collect_names(actors),
            directors: collect_names(directors),
        }
    }

    /// Loads both lists from `name` CSV files.
    pub fn from_csv(actors_path: &Path, directors_path: &Path) -> Result<Self, ArtifactError> {
        let actors = read_csv::<NameRecord>(actors_path)?;
        let directors = read_csv::<NameRecord>(directors_path)?;
        Ok(Self::new(
            actors.into_iter().map(|r| r.name),
            directors.into_iter().map(|r| r.name),
        ))
    }

    /// Exact, case-sensitive membership in the top-actor list.
    pub fn is_top_actor(&self, name: &str) -> bool {
        self.actors.contains(name)
    }

    /// Exact, case-sensitive membership in the top-director list.
    pub fn is_top_director(&self, name: &str) -> bool {
        self.directors.contains(name)
    }

    /// Actors in alphabetical order.
    pub fn actors(&self) -> impl Iterator<Item = &str> {
        self.actors.iter().map(String::as_str)
    }

    /// Directors in alphabetical order.
    pub fn directors(&self) -> impl Iterator<Item = &str> {
        self.directors.iter().map(String::as_str)
    }
}

fn collect_names<I>(names: I) -> BTreeSet<String>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    names
        .into_iter()
        .map(|n| n.into().trim().to_string())
        .filter(|n| !n.is_empty())
        .collect()
}

fn read_csv<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Vec<T>, ArtifactError> {
    let file = File::open(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut rows = vec![];
    for result in rdr.deserialize() {
        let record: T = result.map_err(|source| ArtifactError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        rows.push(record);
    }
    Ok(rows)
}
