use crate::error::AppError;
use actix_web::http::Method;
use actix_web::{
    Error, HttpMessage,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use regex::Regex;
use std::future::{Ready, ready};
use std::sync::Arc;

pub const MEMBER_HEADER: &str = "X-Member-Id";
pub const DEFAULT_MEMBER: &str = "local";

/// 当前请求所属的会员（本地存储命名空间）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberId(pub String);

// 不需要会员身份的路径
const PUBLIC_PREFIXES: [&str; 2] = ["/swagger-ui", "/api-docs/"];

fn is_public_path(path: &str) -> bool {
    PUBLIC_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

/// 解析 `X-Member-Id` 请求头并写入请求扩展；缺省为 `local`
pub struct MemberMiddleware {
    pattern: Arc<Regex>,
}

impl MemberMiddleware {
    pub fn new() -> Self {
        Self {
            pattern: Arc::new(Regex::new(r"^[A-Za-z0-9_-]{1,64}$").expect("valid member id pattern")),
        }
    }
}

impl Default for MemberMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, B> Transform<S, ServiceRequest> for MemberMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = MemberMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(MemberMiddlewareService {
            service,
            pattern: self.pattern.clone(),
        }))
    }
}

pub struct MemberMiddlewareService<S> {
    service: S,
    pattern: Arc<Regex>,
}

impl<S, B> Service<ServiceRequest> for MemberMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // 放行 CORS 预检请求与文档页面
        if req.method() == Method::OPTIONS || is_public_path(req.path()) {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        let member = match req.headers().get(MEMBER_HEADER) {
            None => Some(DEFAULT_MEMBER.to_string()),
            Some(value) => value
                .to_str()
                .ok()
                .map(str::trim)
                .filter(|v| self.pattern.is_match(v))
                .map(str::to_string),
        };

        match member {
            Some(member) => {
                req.extensions_mut().insert(MemberId(member));
                let fut = self.service.call(req);
                Box::pin(fut)
            }
            None => {
                let error = AppError::ValidationError(format!("Invalid {MEMBER_HEADER} header"));
                Box::pin(async move { Err(error.into()) })
            }
        }
    }
}
