//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for Recommender API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Recommender API",
        version = "0.1.0",
        description = "Next-purchase product recommendations from a language model and a product similarity index",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api", api = domain_recommender::ApiDoc)
    ),
    tags(
        (name = "Recommendations", description = "Next-purchase recommendations")
    )
)]
pub struct ApiDoc;
