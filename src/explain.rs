//! Canned reasoning and improvement suggestions for a prediction.

use crate::catalog::month_name;
use crate::features::DerivedSignals;
use crate::input::MovieInput;
use serde::Serialize;
use std::fmt;

pub const BUDGET_THRESHOLD: u64 = 50_000_000;
pub const STAR_CAST_THRESHOLD: u32 = 2;
/// Suggestions are only offered below this success probability.
pub const SUGGESTION_PROBABILITY_CUTOFF: f64 = 0.60;

/// What the two models said about one movie.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    pub success_label: bool,
    pub success_probability: f64,
    pub predicted_revenue: f64,
}

/// A statement explaining the predicted outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Factor {
    HighBudget,
    StrongReleaseMonth,
    StarCast,
    RecognizedDirector,
    StrongCombination,
    LowBudget,
    WeakReleaseMonth,
    ThinCast,
    UnknownDirector,
    MultipleFactors,
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Factor::HighBudget => "💵 A budget of $50M+ gives the movie room to compete.",
            Factor::StrongReleaseMonth => {
                "📅 The release month has historically strong box office."
            }
            Factor::StarCast => "🎭 Two or more top-billed well-known actors are attached.",
            Factor::RecognizedDirector => "🎬 The director is a recognized, bankable name.",
            Factor::StrongCombination => "✨ The overall combination of inputs looks strong.",
            Factor::LowBudget => "💵 A budget under $50M limits competitiveness.",
            Factor::WeakReleaseMonth => "📅 The release month has historically weak box office.",
            Factor::ThinCast => "🎭 Fewer than two top-billed well-known actors are attached.",
            Factor::UnknownDirector => {
                "🎬 The director is not among historically bankable names."
            }
            Factor::MultipleFactors => {
                "⚠️ Multiple factors combined lower the predicted performance."
            }
        };
        f.write_str(text)
    }
}

/// An improvement offered when success looks unlikely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suggestion {
    RaiseBudget,
    ReleaseIn { month: u32 },
    AddTopActors,
    AttachDirector,
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Suggestion::RaiseBudget => f.write_str(
                "💵 Increase the budget to $50M+ to be more competitive in the market.",
            ),
            Suggestion::ReleaseIn { month } => write!(
                f,
                "📅 Consider releasing during a stronger month, like {} ({month}) \
                 (historically higher box office).",
                month_name(*month)
            ),
            Suggestion::AddTopActors => {
                f.write_str("🎭 Consider adding more top-billed well-known actors.")
            }
            Suggestion::AttachDirector => {
                f.write_str("🎬 Consider attaching a more recognized director.")
            }
        }
    }
}

/// Reasoning for a prediction plus, when warranted, suggestions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Explanation {
    pub factors: Vec<Factor>,
    /// `None` when the success probability is high enough that no
    /// suggestion block is shown at all.
    pub suggestions: Option<Vec<Suggestion>>,
}

/// Picks the factor statements and suggestions for one prediction.
pub fn explain(
    input: &MovieInput,
    signals: &DerivedSignals,
    prediction: &PredictionResult,
    best_month: u32,
) -> Explanation {
    let big_budget = input.budget >= BUDGET_THRESHOLD;
    let strong_month = signals.month_strength >= signals.mean_month_strength;
    let star_cast = signals.actor_count >= STAR_CAST_THRESHOLD;
    let known_director = signals.known_director;

    let factors = if prediction.success_label {
        reasons(
            [
                (big_budget, Factor::HighBudget),
                (strong_month, Factor::StrongReleaseMonth),
                (star_cast, Factor::StarCast),
                (known_director, Factor::RecognizedDirector),
            ],
            Factor::StrongCombination,
        )
    } else {
        reasons(
            [
                (!big_budget, Factor::LowBudget),
                (!strong_month, Factor::WeakReleaseMonth),
                (!star_cast, Factor::ThinCast),
                (!known_director, Factor::UnknownDirector),
            ],
            Factor::MultipleFactors,
        )
    };

    let suggestions = (prediction.success_probability < SUGGESTION_PROBABILITY_CUTOFF).then(|| {
        [
            (!big_budget, Suggestion::RaiseBudget),
            (!strong_month, Suggestion::ReleaseIn { month: best_month }),
            (!star_cast, Suggestion::AddTopActors),
            (!known_director, Suggestion::AttachDirector),
        ]
        .into_iter()
        .filter_map(|(applies, s)| applies.then_some(s))
        .collect()
    });

    Explanation {
        factors,
        suggestions,
    }
}

fn reasons(candidates: [(bool, Factor); 4], fallback: Factor) -> Vec<Factor> {
    let factors: Vec<Factor> = candidates
        .into_iter()
        .filter_map(|(holds, factor)| holds.then_some(factor))
        .collect();
    if factors.is_empty() {
        vec![fallback]
    } else {
        factors
    }
}
