use crate::error::InputError;
use serde::{Deserialize, Serialize};

/// Placeholder value the form uses for "no actor" / "no director".
pub const NONE_SENTINEL: &str = "none";

pub const MIN_BUDGET: u64 = 1_000_000;
pub const DEFAULT_BUDGET: u64 = 30_000_000;
pub const MAX_GENRES: usize = 3;
pub const MAX_ACTORS: usize = 3;

/// Returns true for the "none" placeholder, ignoring case and surrounding whitespace.
pub fn is_none_sentinel(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case(NONE_SENTINEL)
}

/// The attributes of a single movie as submitted through the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieInput {
    pub budget: u64,
    pub genres: Vec<String>,
    pub actors: Vec<String>,
    pub director: String,
    pub release_month: u32,
}

impl MovieInput {
    /// Builds an input and applies the form's range checks.
    ///
    /// Repeated genres and actors are collapsed before the limits are
    /// checked, so selecting the same name twice counts once.
    pub fn new(
        budget: u64,
        genres: Vec<String>,
        actors: Vec<String>,
        director: impl Into<String>,
        release_month: u32,
    ) -> Result<Self, InputError> {
        let input = MovieInput {
            budget,
            genres: dedup_preserving_order(genres),
            actors: dedup_preserving_order(actors),
            director: director.into(),
            release_month,
        };
        input.validate()?;
        Ok(input)
    }

    /// Checks the budget minimum, selection limits and month range.
    pub fn validate(&self) -> Result<(), InputError> {
        if self.budget < MIN_BUDGET {
            return Err(InputError::BudgetTooLow {
                got: self.budget,
                min: MIN_BUDGET,
            });
        }
        if self.genres.len() > MAX_GENRES {
            return Err(InputError::TooManyGenres {
                got: self.genres.len(),
                max: MAX_GENRES,
            });
        }
        if self.actors.len() > MAX_ACTORS {
            return Err(InputError::TooManyActors {
                got: self.actors.len(),
                max: MAX_ACTORS,
            });
        }
        if !(1..=12).contains(&self.release_month) {
            return Err(InputError::InvalidMonth(self.release_month));
        }
        Ok(())
    }

    /// Actor selections with the sentinel and blanks removed.
    pub fn named_actors(&self) -> impl Iterator<Item = &str> {
        self.actors
            .iter()
            .map(|a| a.trim())
            .filter(|a| !a.is_empty() && !is_none_sentinel(a))
    }

    /// The director selection, or `None` when the sentinel was chosen.
    pub fn named_director(&self) -> Option<&str> {
        let director = self.director.trim();
        if director.is_empty() || is_none_sentinel(director) {
            None
        } else {
            Some(director)
        }
    }
}

fn dedup_preserving_order(values: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for v in values {
        let v = v.trim().to_string();
        if v.is_empty() || out.contains(&v) {
            continue;
        }
        out.push(v);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn accepts_form_defaults() {
        let input = MovieInput::new(DEFAULT_BUDGET, vec![], vec![], "none", 1).unwrap();
        assert_eq!(input.budget, 30_000_000);
        assert!(input.named_director().is_none());
        assert_eq!(input.named_actors().count(), 0);
    }

    #[test]
    fn rejects_budget_below_minimum() {
        let err = MovieInput::new(999_999, vec![], vec![], "none", 5).unwrap_err();
        assert_eq!(
            err,
            InputError::BudgetTooLow {
                got: 999_999,
                min: MIN_BUDGET
            }
        );
    }

    #[test]
    fn rejects_month_out_of_range() {
        for month in [0, 13] {
            let err = MovieInput::new(MIN_BUDGET, vec![], vec![], "none", month).unwrap_err();
            assert_eq!(err, InputError::InvalidMonth(month));
        }
    }

    #[test]
    fn limits_genres_and_actors_to_three() {
        let genres = strings(&["Action", "Drama", "Comedy", "Horror"]);
        assert!(matches!(
            MovieInput::new(MIN_BUDGET, genres, vec![], "none", 1),
            Err(InputError::TooManyGenres { got: 4, max: 3 })
        ));

        let actors = strings(&["A", "B", "C", "D"]);
        assert!(matches!(
            MovieInput::new(MIN_BUDGET, vec![], actors, "none", 1),
            Err(InputError::TooManyActors { got: 4, max: 3 })
        ));
    }

    #[test]
    fn duplicates_collapse_before_limit_check() {
        let genres = strings(&["Action", "Action", "Drama", " Drama ", "Comedy"]);
        let input = MovieInput::new(MIN_BUDGET, genres, vec![], "none", 1).unwrap();
        assert_eq!(input.genres, strings(&["Action", "Drama", "Comedy"]));
    }

    #[test]
    fn sentinel_matching_ignores_case() {
        assert!(is_none_sentinel("none"));
        assert!(is_none_sentinel(" None "));
        assert!(is_none_sentinel("NONE"));
        assert!(!is_none_sentinel("Nonesuch"));

        let input =
            MovieInput::new(MIN_BUDGET, vec![], strings(&["None", "Tom Hanks"]), "NONE", 3)
                .unwrap();
        assert_eq!(input.named_actors().collect::<Vec<_>>(), vec!["Tom Hanks"]);
        assert_eq!(input.named_director(), None);
    }
}
