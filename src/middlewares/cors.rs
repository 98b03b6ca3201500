use actix_cors::Cors;
use actix_web::http::header;

use super::member::MEMBER_HEADER;

/// 小组件会被嵌入到粉丝俱乐部的任意页面中，因此允许任意来源；
/// 状态只靠 `X-Member-Id` 区分，不使用 Cookie。
pub fn create_cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
        .allowed_header(MEMBER_HEADER)
        .max_age(3600)
}
