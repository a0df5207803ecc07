//! Ranking, filtering and grouping of autocomplete predictions

use std::fmt;

use domain::Location;
use serde::{Deserialize, Serialize};

use crate::models::AutocompletePrediction;

const EXACT_MATCH_SCORE: f64 = 100.0;
const PREFIX_MATCH_SCORE: f64 = 50.0;
const SUBSTRING_MATCH_SCORE: f64 = 25.0;
const WORD_MATCH_SCORE: f64 = 10.0;
const MAX_DISTANCE_BONUS: f64 = 20.0;
const PRIORITY_TYPE_SCORE: f64 = 5.0;

/// Place types that get a small boost when ranking
pub const PRIORITY_TYPES: &[&str] = &["restaurant", "lodging", "gas_station", "bank", "pharmacy"];

/// Filters applied to a prediction list
///
/// Only `place_types` can be evaluated on predictions. `min_rating` and
/// `max_price_level` need a place details fetch and are carried for callers
/// that do that follow-up themselves; [`filter_predictions`] ignores them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionFilters {
    #[serde(default)]
    pub place_types: Vec<String>,
    pub min_rating: Option<f32>,
    pub max_price_level: Option<u8>,
}

impl PredictionFilters {
    #[must_use]
    pub fn with_place_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.place_types = types.into_iter().map(Into::into).collect();
        self
    }
}

/// Relevance score of one prediction for `query`
#[must_use]
pub fn relevance_score(
    prediction: &AutocompletePrediction,
    query: &str,
    user_location: Option<&Location>,
) -> f64 {
    let query = query.trim().to_lowercase();
    let description = prediction.description.to_lowercase();
    let mut score = 0.0;

    if !query.is_empty() {
        if description == query {
            score += EXACT_MATCH_SCORE;
        } else if description.starts_with(&query) {
            score += PREFIX_MATCH_SCORE;
        } else if description.contains(&query) {
            score += SUBSTRING_MATCH_SCORE;
        }

        let words: Vec<&str> = description.split_whitespace().collect();
        let matched = query
            .split_whitespace()
            .filter(|q| words.iter().any(|w| w.contains(q)))
            .count();
        score += WORD_MATCH_SCORE * f64::from(u32::try_from(matched).unwrap_or(u32::MAX));
    }

    if let (Some(_), Some(distance)) = (user_location, prediction.distance_meters) {
        score += (MAX_DISTANCE_BONUS - f64::from(distance) / 1000.0).max(0.0);
    }

    if prediction
        .types
        .iter()
        .any(|t| PRIORITY_TYPES.contains(&t.as_str()))
    {
        score += PRIORITY_TYPE_SCORE;
    }

    score
}

/// Order predictions by descending relevance to `query`
///
/// The sort is stable: equally scored predictions keep the vendor's order.
#[must_use]
pub fn sort_results_by_relevance(
    results: Vec<AutocompletePrediction>,
    query: &str,
    user_location: Option<&Location>,
) -> Vec<AutocompletePrediction> {
    let mut scored: Vec<(f64, AutocompletePrediction)> = results
        .into_iter()
        .map(|p| (relevance_score(&p, query, user_location), p))
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored.into_iter().map(|(_, p)| p).collect()
}

/// Keep predictions matching `filters`
#[must_use]
pub fn filter_predictions(
    predictions: Vec<AutocompletePrediction>,
    filters: &PredictionFilters,
) -> Vec<AutocompletePrediction> {
    if filters.place_types.is_empty() {
        return predictions;
    }

    predictions
        .into_iter()
        .filter(|p| p.types.iter().any(|t| filters.place_types.contains(t)))
        .collect()
}

/// Coarse grouping of places for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceCategory {
    Food,
    Lodging,
    Transport,
    Services,
    Shopping,
    Region,
    Address,
    Other,
}

impl PlaceCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Lodging => "lodging",
            Self::Transport => "transport",
            Self::Services => "services",
            Self::Shopping => "shopping",
            Self::Region => "region",
            Self::Address => "address",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for PlaceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Checked in order; the first category with a matching type wins.
const CATEGORY_TYPES: &[(PlaceCategory, &[&str])] = &[
    (
        PlaceCategory::Food,
        &["restaurant", "food", "cafe", "bar", "bakery", "meal_takeaway", "meal_delivery"],
    ),
    (PlaceCategory::Lodging, &["lodging", "campground", "rv_park"]),
    (
        PlaceCategory::Transport,
        &[
            "airport",
            "bus_station",
            "train_station",
            "subway_station",
            "light_rail_station",
            "transit_station",
            "taxi_stand",
            "gas_station",
            "parking",
        ],
    ),
    (
        PlaceCategory::Services,
        &[
            "bank",
            "atm",
            "pharmacy",
            "hospital",
            "doctor",
            "post_office",
            "police",
            "car_repair",
        ],
    ),
    (
        PlaceCategory::Shopping,
        &[
            "store",
            "shopping_mall",
            "supermarket",
            "grocery_or_supermarket",
            "convenience_store",
            "clothing_store",
        ],
    ),
    (
        PlaceCategory::Region,
        &[
            "country",
            "administrative_area_level_1",
            "administrative_area_level_2",
            "locality",
            "sublocality",
            "neighborhood",
            "postal_code",
            "political",
        ],
    ),
    (
        PlaceCategory::Address,
        &["street_address", "route", "premise", "subpremise", "intersection"],
    ),
];

/// Category of a prediction, derived from its place types
#[must_use]
pub fn categorize(prediction: &AutocompletePrediction) -> PlaceCategory {
    CATEGORY_TYPES
        .iter()
        .find(|(_, types)| prediction.types.iter().any(|t| types.contains(&t.as_str())))
        .map_or(PlaceCategory::Other, |(category, _)| *category)
}

/// Group predictions by category, categories in first-seen order
#[must_use]
pub fn group_by_category(
    predictions: Vec<AutocompletePrediction>,
) -> Vec<(PlaceCategory, Vec<AutocompletePrediction>)> {
    let mut groups: Vec<(PlaceCategory, Vec<AutocompletePrediction>)> = Vec::new();

    for prediction in predictions {
        let category = categorize(&prediction);
        match groups.iter_mut().find(|(c, _)| *c == category) {
            Some((_, members)) => members.push(prediction),
            None => groups.push((category, vec![prediction])),
        }
    }

    groups
}
