use crate::store::{Goal, Level};

const GOAL_KEYWORDS: &[(&[&str], Goal)] = &[
    (&["MUSCLE", "HYPERTROPHY"], Goal::MuscleBuilding),
    (&["WEIGHTLOSS", "WEIGHT_LOSS"], Goal::WeightLoss),
    (&["STRENGTH"], Goal::Strength),
];

/// `INT_` and `ADV_` prefixes; anything else is Beginner.
pub fn level(id: &str) -> Level {
    if id.starts_with("INT_") {
        Level::Intermediate
    } else if id.starts_with("ADV_") {
        Level::Advanced
    } else {
        Level::Beginner
    }
}

/// First keyword group found in the id decides; no match is strength.
pub fn goal(id: &str) -> Goal {
    GOAL_KEYWORDS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| id.contains(k)))
        .map_or(Goal::Strength, |(_, goal)| *goal)
}
