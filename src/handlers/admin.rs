use crate::config::GachaConfig;
use crate::error::AppError;
use crate::handlers::gacha::get_member_id;
use crate::models::*;
use crate::services::{AdminService, DrawService, build_shareable_link, encode_settings};
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/admin/settings",
    tag = "admin",
    responses(
        (status = 200, description = "管理员本地设置（首次访问用默认奖品初始化）", body = AdminSettings)
    )
)]
pub async fn get_settings(service: web::Data<AdminService>, req: HttpRequest) -> Result<HttpResponse> {
    let settings = service.for_member(&get_member_id(&req)).load_admin_settings();
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": settings })))
}

#[utoipa::path(
    put,
    path = "/admin/settings",
    tag = "admin",
    request_body = AdminSettings,
    responses(
        (status = 200, description = "保存成功", body = AdminSettings),
        (status = 500, description = "保存失败")
    )
)]
/// 保存到本地，仅用于管理员在本设备上测试；会员端只读取链接中的配置
pub async fn save_settings(
    service: web::Data<AdminService>,
    req: HttpRequest,
    body: web::Json<AdminSettings>,
) -> Result<HttpResponse> {
    let settings = body.into_inner();
    let admin = service.for_member(&get_member_id(&req));
    let to_save = settings.clone();
    let saved = web::block(move || admin.save_admin_settings(&to_save))
        .await
        .map_err(|e| AppError::InternalError(format!("blocking task failed: {e}")))
        .and_then(|r| r);
    match saved {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": settings,
            "message": "画像設定を保存しました！"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/share-link",
    tag = "admin",
    request_body = ShareLinkRequest,
    responses(
        (status = 200, description = "会员分发用链接", body = ShareLinkResponse),
        (status = 400, description = "基础地址无效")
    )
)]
/// 生成会员分发用链接
pub async fn create_share_link(
    config: web::Data<GachaConfig>,
    body: web::Json<ShareLinkRequest>,
) -> Result<HttpResponse> {
    let request = body.into_inner();
    let base_url = request
        .base_url
        .as_deref()
        .unwrap_or(config.share_base_url.as_str());

    let link = build_shareable_link(base_url, &request.settings).and_then(|url| {
        encode_settings(&request.settings).map(|token| ShareLinkResponse { url, token })
    });
    match link {
        Ok(data) => {
            log::info!("Share link generated for base {base_url}");
            Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data })))
        }
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/admin/history",
    tag = "admin",
    responses(
        (status = 200, description = "已重置本设备的“本月已抽”记录")
    )
)]
/// 演示用：清除当前会员的抽奖历史
pub async fn clear_history(service: web::Data<DrawService>, req: HttpRequest) -> Result<HttpResponse> {
    let member = get_member_id(&req);
    let session = service.session(&member);
    let cleared = web::block(move || session.clear_history())
        .await
        .map_err(|e| AppError::InternalError(format!("blocking task failed: {e}")))
        .and_then(|r| r);
    match cleared {
        Ok(()) => {
            log::info!("Spin history cleared for member {member}");
            Ok(HttpResponse::Ok().json(json!({ "success": true, "message": "History cleared" })))
        }
        Err(e) => Ok(e.error_response()),
    }
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/settings", web::get().to(get_settings))
            .route("/settings", web::put().to(save_settings))
            .route("/share-link", web::post().to(create_share_link))
            .route("/history", web::delete().to(clear_history)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{FALLBACK_MESSAGE, default_prizes};
    use crate::handlers::gacha_config;
    use crate::services::message_service::tests::StubGenerator;
    use crate::services::{MessageService, resolve_active_prizes};
    use crate::storage::{MemoryStore, SharedStore};
    use actix_web::{App, test};
    use std::sync::Arc;
    use std::time::Duration;

    fn services() -> (AdminService, DrawService) {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let messages = MessageService::new(Arc::new(StubGenerator::ok("msg")), FALLBACK_MESSAGE);
        (
            AdminService::new(store.clone(), default_prizes()),
            DrawService::new(store, default_prizes(), messages, Duration::ZERO),
        )
    }

    #[actix_web::test]
    async fn test_settings_seed_and_save() {
        let (admin, draw) = services();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(admin))
                .app_data(web::Data::new(draw))
                .app_data(web::Data::new(GachaConfig::default()))
                .service(web::scope("/api/v1").configure(admin_config)),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/v1/admin/settings").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["image1"], default_prizes()[0].url.as_str());

        let updated = AdminSettings {
            image1: "https://x/a.jpg".into(),
            image2: "https://x/b.jpg".into(),
            image3: "https://x/c.jpg".into(),
        };
        let req = test::TestRequest::put()
            .uri("/api/v1/admin/settings")
            .set_json(&updated)
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);

        let req = test::TestRequest::get().uri("/api/v1/admin/settings").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"], serde_json::to_value(&updated).unwrap());
    }

    #[actix_web::test]
    async fn test_share_link_round_trip() {
        let (admin, draw) = services();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(admin))
                .app_data(web::Data::new(draw))
                .app_data(web::Data::new(GachaConfig {
                    share_base_url: "https://fan.example.com/gacha".into(),
                    ..GachaConfig::default()
                }))
                .service(web::scope("/api/v1").configure(admin_config)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/admin/share-link")
            .set_json(serde_json::json!({
                "image1": "https://x/a.jpg",
                "image2": "",
                "image3": "https://x/c.jpg"
            }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let link = body["data"]["url"].as_str().unwrap();
        let token = body["data"]["token"].as_str().unwrap();
        assert!(link.starts_with("https://fan.example.com/gacha?cfg="));

        let prizes = resolve_active_prizes(&default_prizes(), Some(token));
        assert_eq!(prizes[0].url, "https://x/a.jpg");
        assert_eq!(prizes[1].url, default_prizes()[1].url);
        assert_eq!(prizes[2].url, "https://x/c.jpg");
    }

    #[actix_web::test]
    async fn test_share_link_with_bad_base_is_reported() {
        let (admin, draw) = services();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(admin))
                .app_data(web::Data::new(draw))
                .app_data(web::Data::new(GachaConfig::default()))
                .service(web::scope("/api/v1").configure(admin_config)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/admin/share-link")
            .set_json(serde_json::json!({ "image1": "a", "base_url": "::nope" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_clear_history_allows_another_draw() {
        let (admin, draw) = services();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(admin))
                .app_data(web::Data::new(draw))
                .app_data(web::Data::new(GachaConfig::default()))
                .service(
                    web::scope("/api/v1")
                        .configure(gacha_config)
                        .configure(admin_config),
                ),
        )
        .await;

        let spin = || test::TestRequest::post().uri("/api/v1/gacha/spin").to_request();
        assert!(test::call_service(&app, spin()).await.status().is_success());
        assert_eq!(
            test::call_service(&app, spin()).await.status(),
            actix_web::http::StatusCode::CONFLICT
        );

        let req = test::TestRequest::delete().uri("/api/v1/admin/history").to_request();
        assert!(test::call_service(&app, req).await.status().is_success());
        assert!(test::call_service(&app, spin()).await.status().is_success());
    }
}
