use crate::middlewares::{DEFAULT_MEMBER, MemberId};
use crate::models::*;
use crate::services::{DrawService, is_eligible, period_key};
use actix_web::{HttpMessage, HttpRequest, HttpResponse, ResponseError, Result, web};
use chrono::Local;
use serde_json::json;

/// 从请求扩展中获取会员ID（中间件注入）
pub(crate) fn get_member_id(req: &HttpRequest) -> String {
    req.extensions()
        .get::<MemberId>()
        .map(|m| m.0.clone())
        .unwrap_or_else(|| DEFAULT_MEMBER.to_string())
}

#[utoipa::path(
    get,
    path = "/gacha/launch",
    tag = "gacha",
    params(LaunchQuery),
    responses(
        (status = 200, description = "页面加载上下文", body = LaunchResponse)
    )
)]
/// 页面加载：管理员模式标记、当前周期、生效奖品以及本月已获得的结果
pub async fn launch(
    service: web::Data<DrawService>,
    req: HttpRequest,
    query: web::Query<LaunchQuery>,
) -> Result<HttpResponse> {
    let member = get_member_id(&req);
    let now = Local::now().fixed_offset();
    let session = service.session(&member);
    let current_result = session.current_period_result(&now);

    let data = LaunchResponse {
        admin_mode: query.is_admin(),
        period: period_key(&now),
        eligible: current_result.is_none(),
        prizes: service.active_prizes(query.cfg.as_deref()),
        current_result,
    };
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data })))
}

#[utoipa::path(
    get,
    path = "/gacha/prizes",
    tag = "gacha",
    params(LaunchQuery),
    responses(
        (status = 200, description = "生效中的奖品", body = [PrizeImage])
    )
)]
/// 生效中的奖品（无效的 cfg 会静默回退到默认奖品）
pub async fn get_prizes(
    service: web::Data<DrawService>,
    query: web::Query<LaunchQuery>,
) -> Result<HttpResponse> {
    let prizes = service.active_prizes(query.cfg.as_deref());
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": prizes })))
}

#[utoipa::path(
    get,
    path = "/gacha/status",
    tag = "gacha",
    responses(
        (status = 200, description = "本月抽奖状态", body = GachaStatusResponse)
    )
)]
pub async fn get_status(service: web::Data<DrawService>, req: HttpRequest) -> Result<HttpResponse> {
    let member = get_member_id(&req);
    let now = Local::now().fixed_offset();
    let last_result = service.session(&member).load_last_result();

    let data = GachaStatusResponse {
        period: period_key(&now),
        eligible: is_eligible(last_result.as_ref(), &now),
        last_result,
    };
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data })))
}

#[utoipa::path(
    post,
    path = "/gacha/spin",
    tag = "gacha",
    params(LaunchQuery),
    responses(
        (status = 200, description = "抽奖成功", body = SpinResult),
        (status = 409, description = "本月已抽过或抽奖进行中")
    )
)]
/// 进行一次抽奖，成功后本月不可再抽
pub async fn spin(
    service: web::Data<DrawService>,
    req: HttpRequest,
    query: web::Query<LaunchQuery>,
) -> Result<HttpResponse> {
    let member = get_member_id(&req);
    let prizes = service.active_prizes(query.cfg.as_deref());
    let now = Local::now().fixed_offset();
    match service.perform_draw(&member, &prizes, now).await {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": result }))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 路由配置
pub fn gacha_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/gacha")
            .route("/launch", web::get().to(launch))
            .route("/prizes", web::get().to(get_prizes))
            .route("/status", web::get().to(get_status))
            .route("/spin", web::post().to(spin)),
    );
}
