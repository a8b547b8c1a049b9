//! OpenAPI documentation, served as JSON on `/json`

use utoipa::OpenApi;

use crate::api;
use crate::error::ErrorBody;
use crate::models::{CityInfo, Horizon, NewRecipe, Recipe, WeatherPrediction};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "City API",
        version = "1.0.0",
        description = "City information, weather predictions and recipes per city",
    ),
    paths(api::get_city_info, api::add_recipe, api::delete_recipe),
    components(schemas(CityInfo, WeatherPrediction, Horizon, Recipe, NewRecipe, ErrorBody)),
    tags(
        (name = "Cities", description = "City information from the city data API"),
        (name = "Recipes", description = "User-submitted recipes, kept in memory"),
    ),
)]
pub struct ApiDoc;

impl ApiDoc {
    #[must_use]
    pub fn build() -> utoipa::openapi::OpenApi {
        Self::openapi()
    }

    pub fn openapi_json_path() -> &'static str {
        "/json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documents_all_routes() {
        let doc = ApiDoc::build();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        assert!(paths.iter().any(|p| *p == "/cities/{cityId}/infos"));
        assert!(paths.iter().any(|p| *p == "/cities/{cityId}/recipes"));
        assert!(paths.iter().any(|p| *p == "/cities/{cityId}/recipes/{recipeId}"));
    }

    #[test]
    fn test_schemas_registered() {
        let doc = ApiDoc::build();
        let components = doc.components.expect("components are generated");
        assert!(components.schemas.contains_key("CityInfo"));
        assert!(components.schemas.contains_key("ErrorBody"));
    }
}
