//! Data models shared by the upstream client, the recipe store and the HTTP API

use serde::{Deserialize, Serialize};
use serde_json::Number;
use utoipa::ToSchema;

/// A city entry as listed by the city data service.
///
/// Only the identifier is used; other fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CitySummary {
    #[serde(default)]
    pub id: String,
}

/// Geographic coordinates of a city.
///
/// Kept as JSON numbers so upstream values are passed through unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    /// Latitude in decimal degrees
    pub latitude: Number,
    /// Longitude in decimal degrees
    pub longitude: Number,
}

impl Coordinates {
    #[must_use]
    pub fn new(latitude: Number, longitude: Number) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Coordinates as an ordered `[latitude, longitude]` pair
    #[must_use]
    pub fn into_pair(self) -> [Number; 2] {
        [self.latitude, self.longitude]
    }
}

/// A notable feature of a city
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KnownFor {
    #[serde(default)]
    pub content: String,
}

/// Per-city details from the insights endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CityInsights {
    pub coordinates: Coordinates,
    pub population: Number,
    #[serde(default)]
    pub known_for: Vec<KnownFor>,
}

/// Forecast horizon
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Horizon {
    Today,
    Tomorrow,
}

impl Horizon {
    /// Horizons in the order they are reported
    pub const ALL: [Horizon; 2] = [Horizon::Today, Horizon::Tomorrow];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Horizon::Today => "today",
            Horizon::Tomorrow => "tomorrow",
        }
    }
}

/// One forecast entry as delivered by the city data service.
///
/// Every field is optional on the wire; a broken entry only affects its own city.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpstreamPrediction {
    /// Horizon label, e.g. "today"
    #[serde(default)]
    pub when: String,
    pub min: Option<Number>,
    pub max: Option<Number>,
}

/// All forecast entries for a single city
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CityWeather {
    #[serde(default)]
    pub city_id: String,
    #[serde(default)]
    pub predictions: Vec<UpstreamPrediction>,
}

impl CityWeather {
    /// Forecast for each horizon, in `Horizon::ALL` order.
    ///
    /// A horizon the service did not report comes back without temperatures.
    #[must_use]
    pub fn horizon_predictions(&self) -> Vec<WeatherPrediction> {
        Horizon::ALL
            .iter()
            .map(|horizon| {
                let found = self
                    .predictions
                    .iter()
                    .find(|p| p.when == horizon.as_str());
                WeatherPrediction {
                    when: *horizon,
                    min: found.and_then(|p| p.min.clone()),
                    max: found.and_then(|p| p.max.clone()),
                }
            })
            .collect()
    }
}

/// Forecast entry in the city info response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct WeatherPrediction {
    pub when: Horizon,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<f64>)]
    pub min: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<f64>)]
    pub max: Option<Number>,
}

/// A user-submitted recipe
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct Recipe {
    pub id: u64,
    pub content: String,
}

/// Body of a recipe creation request
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct NewRecipe {
    /// Recipe text, between 10 and 2000 characters
    #[schema(min_length = 10, max_length = 2000)]
    pub content: Option<String>,
}

/// Aggregated city information returned by `GET /cities/{cityId}/infos`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CityInfo {
    /// `[latitude, longitude]`
    #[schema(value_type = Vec<f64>)]
    pub coordinates: [Number; 2],
    #[schema(value_type = f64)]
    pub population: Number,
    pub known_for: Vec<String>,
    pub weather_predictions: Vec<WeatherPrediction>,
    pub recipes: Vec<Recipe>,
}

impl CityInfo {
    #[must_use]
    pub fn compose(insights: CityInsights, weather: &CityWeather, recipes: Vec<Recipe>) -> Self {
        Self {
            coordinates: insights.coordinates.into_pair(),
            population: insights.population,
            known_for: insights.known_for.into_iter().map(|k| k.content).collect(),
            weather_predictions: weather.horizon_predictions(),
            recipes,
        }
    }
}
