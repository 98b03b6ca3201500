use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::middlewares::MEMBER_HEADER;
use crate::models::*;

struct MemberHeaderAddon;

impl Modify for MemberHeaderAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "member_id",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(MEMBER_HEADER))),
            )
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::gacha::launch,
        handlers::gacha::get_prizes,
        handlers::gacha::get_status,
        handlers::gacha::spin,
        handlers::admin::get_settings,
        handlers::admin::save_settings,
        handlers::admin::create_share_link,
        handlers::admin::clear_history,
    ),
    components(
        schemas(
            PrizeImage,
            Rarity,
            SpinResult,
            AdminSettings,
            ShareLinkRequest,
            ShareLinkResponse,
            GachaStatusResponse,
            LaunchResponse,
        )
    ),
    modifiers(&MemberHeaderAddon),
    security(
        ("member_id" = [])
    ),
    tags(
        (name = "gacha", description = "Monthly gacha API"),
        (name = "admin", description = "Prize configuration and share link API"),
    ),
    info(
        title = "WR Gacha API",
        version = "1.0.0",
        description = "Monthly fan-club gacha widget REST API documentation"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
