use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{FromRequest, Path, Request, State},
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    routing::{delete, get, post},
};

use crate::{
    error::{AppError, ErrorBody},
    models::{CityInfo, NewRecipe, Recipe},
    openapi::ApiDoc,
    store::RecipeStore,
    upstream::CityDataSource,
};

pub const MIN_CONTENT_CHARS: usize = 10;
pub const MAX_CONTENT_CHARS: usize = 2000;

/// Shared handler state: the city data source and the recipe store
#[derive(Clone)]
pub struct AppState {
    pub cities: Arc<dyn CityDataSource>,
    pub recipes: RecipeStore,
}

impl AppState {
    pub fn new(cities: Arc<dyn CityDataSource>, recipes: RecipeStore) -> Self {
        Self { cities, recipes }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/cities/{city_id}/infos", get(get_city_info))
        .route("/cities/{city_id}/recipes", post(add_recipe))
        .route("/cities/{city_id}/recipes/{recipe_id}", delete(delete_recipe))
        .route(ApiDoc::openapi_json_path(), get(openapi_json))
        .fallback(route_not_found)
        .with_state(state)
}

async fn ensure_city(state: &AppState, city_id: &str) -> Result<(), AppError> {
    if state.cities.city_exists(city_id).await? {
        Ok(())
    } else {
        Err(AppError::not_found("City not found"))
    }
}

/// Checks recipe content, in order: presence, minimum length, maximum length.
///
/// Lengths count characters, not bytes.
pub fn validate_content(content: Option<String>) -> Result<String, AppError> {
    let content = match content {
        Some(content) if !content.is_empty() => content,
        _ => return Err(AppError::validation("Content is required")),
    };

    let chars = content.chars().count();
    if chars < MIN_CONTENT_CHARS {
        return Err(AppError::validation(format!(
            "Content too short (<{MIN_CONTENT_CHARS})"
        )));
    }
    if chars > MAX_CONTENT_CHARS {
        return Err(AppError::validation(format!(
            "Content too long (>{MAX_CONTENT_CHARS})"
        )));
    }
    Ok(content)
}

/// Reads the leading integer of a recipe id the way lenient integer parsing does:
/// optional whitespace and sign, then digits, ignoring whatever follows.
///
/// `"1abc"` and `"1.0"` both read as 1. Negative or digit-less ids match nothing.
pub fn parse_recipe_id(raw: &str) -> Option<u64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let value: u64 = rest[..end].parse().ok()?;
    if negative && value != 0 {
        return None;
    }
    Some(value)
}

fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

/// Recipe creation body. An empty body reads as `{}`.
pub struct RecipeBody(pub NewRecipe);

impl<S> FromRequest<S> for RecipeBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let json_type = is_json_content_type(req.headers());
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| AppError::malformed_body(rejection.body_text()))?;

        if bytes.is_empty() {
            return Ok(Self(NewRecipe::default()));
        }
        if !json_type {
            return Err(AppError::malformed_body(
                "Expected request with `Content-Type: application/json`",
            ));
        }

        let Json(new_recipe) = Json::<NewRecipe>::from_bytes(&bytes)?;
        Ok(Self(new_recipe))
    }
}

/// Get a city's information
///
/// Aggregates insights and weather predictions from the city data API with
/// the recipes stored for the city.
#[utoipa::path(
    get,
    path = "/cities/{cityId}/infos",
    tag = "Cities",
    params(("cityId" = String, Path, description = "City identifier")),
    responses(
        (status = 200, description = "City information", body = CityInfo),
        (status = 404, description = "City not found", body = ErrorBody),
        (status = 500, description = "City data API failure", body = ErrorBody),
    )
)]
#[tracing::instrument(skip(state))]
pub async fn get_city_info(
    State(state): State<AppState>,
    Path(city_id): Path<String>,
) -> Result<Json<CityInfo>, AppError> {
    ensure_city(&state, &city_id).await?;

    let (insights, all_weather) = tokio::try_join!(
        state.cities.city_insights(&city_id),
        state.cities.weather_predictions()
    )?;

    let weather = all_weather
        .into_iter()
        .find(|w| w.city_id == city_id)
        .ok_or_else(|| {
            AppError::data_missing(format!("no weather predictions for city '{city_id}'"))
        })?;

    let recipes = state.recipes.list(&city_id);
    Ok(Json(CityInfo::compose(insights, &weather, recipes)))
}

/// Add a recipe to a city
#[utoipa::path(
    post,
    path = "/cities/{cityId}/recipes",
    tag = "Recipes",
    params(("cityId" = String, Path, description = "City identifier")),
    request_body = NewRecipe,
    responses(
        (status = 201, description = "Recipe created", body = Recipe),
        (status = 400, description = "Invalid recipe content or malformed body", body = ErrorBody),
        (status = 404, description = "City not found", body = ErrorBody),
    )
)]
#[tracing::instrument(skip(state, new_recipe))]
pub async fn add_recipe(
    State(state): State<AppState>,
    Path(city_id): Path<String>,
    RecipeBody(new_recipe): RecipeBody,
) -> Result<(StatusCode, Json<Recipe>), AppError> {
    ensure_city(&state, &city_id).await?;
    let content = validate_content(new_recipe.content)?;

    let recipe = state.recipes.add(&city_id, content);
    Ok((StatusCode::CREATED, Json(recipe)))
}

/// Delete a recipe
#[utoipa::path(
    delete,
    path = "/cities/{cityId}/recipes/{recipeId}",
    tag = "Recipes",
    params(
        ("cityId" = String, Path, description = "City identifier"),
        ("recipeId" = String, Path, description = "Recipe identifier"),
    ),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 404, description = "City or recipe not found", body = ErrorBody),
    )
)]
#[tracing::instrument(skip(state))]
pub async fn delete_recipe(
    State(state): State<AppState>,
    Path((city_id, recipe_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    ensure_city(&state, &city_id).await?;

    let recipe_id =
        parse_recipe_id(&recipe_id).ok_or_else(|| AppError::not_found("Recipe not found"))?;

    if !state.recipes.remove(&city_id, recipe_id) {
        return Err(AppError::not_found("Recipe not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::build())
}

async fn route_not_found() -> AppError {
    AppError::not_found("Route not found")
}
