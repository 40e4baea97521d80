use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Cocktail Recipe Assistant API",
        version = "1.0.0",
        description = "Brand-safe cocktail recipe chat relay"
    ),
    paths(
        // Health
        super::health::root,
        super::health::health,
        // Chat
        super::chat::chat,
    ),
    components(schemas(
        // Requests
        crate::models::requests::ChatRequestBody,
        // Responses
        crate::models::responses::ChatResponse,
        crate::models::responses::HealthResponse,
        crate::models::responses::ProviderHealth,
        // Entities
        crate::models::entities::MessageRole,
        crate::models::entities::ConversationTurn,
        // Error
        crate::error::ErrorBody,
    )),
    tags(
        (name = "Health", description = "Health and status endpoints"),
        (name = "Chat", description = "Recipe chat"),
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/explore").url("/api-docs/openapi.json", ApiDoc::openapi())
}
