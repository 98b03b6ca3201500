use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::{PrizeImage, SpinResult};

/// 页面加载 / 抽奖请求携带的链接参数
#[derive(Debug, Clone, Default, Deserialize, Serialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LaunchQuery {
    /// 为 "true" 时开启管理员模式
    pub admin: Option<String>,
    /// 分享配置 token
    pub cfg: Option<String>,
}

impl LaunchQuery {
    pub fn is_admin(&self) -> bool {
        self.admin.as_deref() == Some("true")
    }
}

/// 会员当前周期的状态
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GachaStatusResponse {
    /// 当前周期 (YYYY-MM)
    pub period: String,
    /// 本月是否还能抽
    pub eligible: bool,
    /// 最近一次结果（可能属于以前的月份）
    pub last_result: Option<SpinResult>,
}

/// 页面加载上下文
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LaunchResponse {
    pub admin_mode: bool,
    pub period: String,
    pub eligible: bool,
    /// 生效中的奖品
    pub prizes: Vec<PrizeImage>,
    /// 本月已获得的结果（仅本月已抽过时返回）
    pub current_result: Option<SpinResult>,
}
