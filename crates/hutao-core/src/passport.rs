//! 通行证（Homa Passport）请求/响应模型与授权判定。
//!
//! 约定：
//! - 字段名与原生命令约定一致（PascalCase），通过 serde 重命名
//! - 该模块仅定义数据结构与纯函数，不发起任何调用
//!
//! 作者：胡桃启动器项目组
//! 创建时间：2026-10-16
//! 修改时间：2026-10-16

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

/// 成功的返回码。
pub const RETCODE_OK: i32 = 0;

/// 请求验证码时“该账号已注册”的返回码。
pub const RETCODE_ALREADY_REGISTERED: i32 = 1001;

/// 通行证接口的通用响应外壳。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomaResponse<T> {
    pub retcode: i32,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> HomaResponse<T> {
    pub fn is_ok(&self) -> bool {
        self.retcode == RETCODE_OK
    }
}

/// 登录请求（字段均为加密后的 base64 文本）。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoginRequest {
    pub user_name: String,
    pub password: String,
}

/// 注册请求（字段均为加密后的 base64 文本）。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RegisterRequest {
    pub user_name: String,
    pub password: String,
    pub verify_code: String,
}

/// 验证码请求（用户名为加密后的 base64 文本）。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VerifyCodeRequest {
    pub user_name: String,
}

/// 登录/注册响应，`data` 为新签发的令牌。
pub type TokenResponse = HomaResponse<String>;

/// 无数据的响应（验证码、兑换码）。
pub type EmptyResponse = HomaResponse<Value>;

/// 用户信息。
///
/// 字段说明：
/// - `is_licensed_developer` / `is_maintainer`：身份标记，任一为真即享有 CDN 授权
/// - `gacha_log_expire_at` / `cdn_expire_at`：服务到期时间（RFC 3339 文本）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct UserInfo {
    #[serde(default)]
    pub normalized_user_name: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub is_licensed_developer: bool,
    #[serde(default)]
    pub is_maintainer: bool,
    #[serde(default)]
    pub gacha_log_expire_at: String,
    #[serde(default)]
    pub cdn_expire_at: String,
}

impl UserInfo {
    /// 判断在 `now` 时刻是否具备 CDN 加速授权。
    ///
    /// 规则：授权开发者 或 维护者 或 CDN 到期时间晚于 `now`。
    /// 到期时间无法解析时按已过期处理。
    pub fn cdn_entitled_at(&self, now: OffsetDateTime) -> bool {
        self.is_licensed_developer
            || self.is_maintainer
            || parse_expire_at(&self.cdn_expire_at).is_some_and(|at| at > now)
    }

    /// 判断在 `now` 时刻祈愿记录服务是否仍在有效期内。
    pub fn gacha_log_active_at(&self, now: OffsetDateTime) -> bool {
        parse_expire_at(&self.gacha_log_expire_at).is_some_and(|at| at > now)
    }

    pub fn display_name(&self) -> &str {
        self.user_name
            .as_deref()
            .or(self.normalized_user_name.as_deref())
            .unwrap_or_default()
    }
}

/// 解析到期时间文本。
///
/// 支持：
/// - RFC 3339（带时区偏移）
/// - 不带偏移的 `YYYY-MM-DDTHH:MM:SS[.fffffff]`，按 UTC 处理
pub fn parse_expire_at(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(at) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(at);
    }
    let with_fraction = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]");
    let plain = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
    PrimitiveDateTime::parse(raw, with_fraction)
        .or_else(|_| PrimitiveDateTime::parse(raw, plain))
        .ok()
        .map(PrimitiveDateTime::assume_utc)
}
