//! OpenAPI 3.0 documentation assembly
//!
//! Aggregates handler path annotations and domain schemas; served through
//! Swagger UI at `/swagger-ui`.

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Mercator Core API",
        version = "0.1.0",
        description = "Custom domain mappings and primary domain selection for network sites",
        contact(name = "Mercator Team")
    ),
    tags(
        (name = "System", description = "Health checks and system status"),
        (name = "Mappings", description = "Domain aliases of a site"),
        (name = "Primary Domain", description = "A site's canonical domain"),
    ),
    paths(
        crate::api::health::health,
        crate::api::health::ready,
        crate::api::mapping::list,
        crate::api::mapping::get,
        crate::api::mapping::create,
        crate::api::mapping::update,
        crate::api::mapping::delete,
        crate::api::primary_domain::get,
        crate::api::primary_domain::create,
    ),
    components(
        schemas(
            crate::api::DeleteResponse,
            crate::api::health::HealthResponse,
            crate::domain::MappingInput,
            crate::domain::MappingResponse,
            crate::domain::PromoteInput,
            crate::domain::Site,
        )
    ),
    security(
        ("bearer_jwt" = [])
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// The document with the Bearer JWT security scheme attached
    pub fn build() -> utoipa::openapi::OpenApi {
        let mut doc = Self::openapi();
        if let Some(c) = doc.components.as_mut() {
            c.security_schemes.insert(
                "bearer_jwt".to_string(),
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
        doc
    }
}
