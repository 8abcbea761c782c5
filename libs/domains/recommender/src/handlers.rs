use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::post};
use axum_helpers::{AppJson, ErrorResponse};
use domain_vector::VectorIndex;
use utoipa::OpenApi;

use crate::error::RecommenderResult;
use crate::gateway::LlmGateway;
use crate::models::RecommendationRequest;
use crate::service::RecommendationService;

/// OpenAPI documentation for the Recommendations API
#[derive(OpenApi)]
#[openapi(
    paths(create_recommendations),
    components(schemas(RecommendationRequest, ErrorResponse)),
    tags(
        (name = "Recommendations", description = "Next-purchase recommendations from purchase history")
    )
)]
pub struct ApiDoc;

/// Create the recommendations router
pub fn router<G, I>(service: RecommendationService<G, I>) -> Router
where
    G: LlmGateway + 'static,
    I: VectorIndex + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/recommendations", post(create_recommendations))
        .with_state(shared_service)
}

/// Recommend catalog items a user is likely to buy next
///
/// Items are interpreted in order. Every pipeline failure, including an
/// empty `items` list, is reported as 500 with the detail in `message`.
#[utoipa::path(
    post,
    path = "/recommendations",
    tag = "Recommendations",
    request_body = RecommendationRequest,
    responses(
        (status = 200, description = "Catalog item texts, best match first", body = Vec<String>,
            example = json!(["Insulated winter boots with ...", "Touchscreen gloves ..."])),
        (status = 422, description = "Body is not a valid request", body = ErrorResponse),
        (status = 500, description = "Recommendation pipeline failed", body = ErrorResponse)
    )
)]
async fn create_recommendations<G: LlmGateway, I: VectorIndex>(
    State(service): State<Arc<RecommendationService<G, I>>>,
    AppJson(request): AppJson<RecommendationRequest>,
) -> RecommenderResult<Json<Vec<String>>> {
    let num_items = request
        .num_items
        .unwrap_or(service.settings().default_num_items);
    let products = service.recommend(&request.items, num_items).await?;
    Ok(Json(products))
}
