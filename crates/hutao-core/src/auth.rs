//! 通行证会话：登录、注册、验证码、用户信息与 CDN 授权。
//!
//! 约定：
//! - [`Session`] 显式持有桥接、加密器、文案与唯一的令牌槽位，不使用全局状态
//! - 远端返回非 0 的 retcode 时，请求原生侧弹出本地化错误对话框，并以返回值表示失败
//! - 桥接失败直接向上传播；任何调用均不重试
//!
//! 约束与注意事项：
//! - 日志中不得出现明文凭据、密文与令牌
//!
//! 作者：胡桃启动器项目组
//! 创建时间：2026-10-16
//! 修改时间：2026-10-16

use serde_json::json;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::bridge::{
    invoke_as, Bridge, BridgeError, CMD_ERROR_DIALOG, CMD_FETCH_CDN, CMD_FETCH_USERINFO, CMD_LOGIN,
    CMD_REGISTER, CMD_REQUEST_VERIFY_CODE, CMD_USE_REDEEM_CODE,
};
use crate::crypto::{CredentialEncryptor, CryptoError};
use crate::messages::MessageStore;
use crate::passport::{
    EmptyResponse, LoginRequest, RegisterRequest, TokenResponse, UserInfo, VerifyCodeRequest,
    RETCODE_ALREADY_REGISTERED,
};

/// 会话操作错误。
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("尚未登录")]
    NotLoggedIn,
    #[error(transparent)]
    Bridge(#[from] BridgeError),
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

/// 请求验证码的结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyCodeOutcome {
    Sent,
    /// 该账号已注册（专用返回码）。
    AlreadyRegistered,
    Rejected,
}

/// 注册的结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// 注册成功（兑换码为空或兑换成功）。
    Registered,
    /// 注册成功但兑换码被拒绝；新令牌已缓存，会话处于已登录状态。
    RedeemRejected,
    /// 注册成功但未签发令牌；令牌未变化，兑换码未使用。
    RegisteredWithoutToken,
    /// 注册被拒绝，令牌未变化。
    Rejected,
}

impl RegisterOutcome {
    /// 整体是否成功（仅 `Registered`）。
    pub fn succeeded(self) -> bool {
        matches!(self, RegisterOutcome::Registered)
    }

    /// 本次调用是否缓存了新签发的令牌。
    pub fn logged_in(self) -> bool {
        matches!(self, RegisterOutcome::Registered | RegisterOutcome::RedeemRejected)
    }
}

/// 通行证会话。
pub struct Session<B> {
    bridge: B,
    encryptor: CredentialEncryptor,
    messages: MessageStore,
    token: Option<String>,
}

impl<B: Bridge> Session<B> {
    pub fn new(bridge: B, encryptor: CredentialEncryptor, messages: MessageStore) -> Self {
        Self {
            bridge,
            encryptor,
            messages,
            token: None,
        }
    }

    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    pub fn messages(&self) -> &MessageStore {
        &self.messages
    }

    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// 载入外部保存的令牌（不做校验）。
    pub fn load_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn logout(&mut self) {
        if self.token.take().is_some() {
            info!("session logged out");
        }
    }

    /// 登录。
    ///
    /// 返回值：
    /// - `true`：登录成功，令牌已缓存
    /// - `false`：服务端拒绝，已请求弹出错误对话框，原有令牌不变
    ///
    /// 异常处理：
    /// - 加密失败：`Crypto`
    /// - 桥接失败：`Bridge`
    pub async fn login(&mut self, username: &str, password: &str) -> Result<bool, SessionError> {
        let req = LoginRequest {
            user_name: self.encryptor.encrypt(username)?,
            password: self.encryptor.encrypt(password)?,
        };
        let resp: TokenResponse = invoke_as(&self.bridge, CMD_LOGIN, json!({ "loginReq": req })).await?;
        if resp.is_ok() {
            self.token = resp.data;
            info!("passport login succeeded");
            return Ok(true);
        }

        warn!(retcode = resp.retcode, "passport login rejected");
        self.show_error("dialog.login_failed", &resp.message).await?;
        Ok(false)
    }

    /// 请求邮箱验证码。
    ///
    /// 返回值：
    /// - `Sent`：已发送
    /// - `AlreadyRegistered`：账号已注册，已弹出专用提示
    /// - `Rejected`：其他失败，已弹出通用提示
    pub async fn request_verify_code(&self, username: &str) -> Result<VerifyCodeOutcome, SessionError> {
        let req = VerifyCodeRequest {
            user_name: self.encryptor.encrypt(username)?,
        };
        let resp: EmptyResponse =
            invoke_as(&self.bridge, CMD_REQUEST_VERIFY_CODE, json!({ "verifyReq": req })).await?;
        if resp.is_ok() {
            info!("verify code requested");
            return Ok(VerifyCodeOutcome::Sent);
        }

        warn!(retcode = resp.retcode, "verify code request rejected");
        if resp.retcode == RETCODE_ALREADY_REGISTERED {
            self.show_error("dialog.already_registered", &resp.message).await?;
            return Ok(VerifyCodeOutcome::AlreadyRegistered);
        }
        self.show_error("dialog.verify_code_failed", &resp.message).await?;
        Ok(VerifyCodeOutcome::Rejected)
    }

    /// 注册并使用兑换码。
    ///
    /// 参数：
    /// - `redeem_code`：为空时跳过兑换
    ///
    /// 返回值：
    /// - 见 [`RegisterOutcome`]；注册成功后即缓存新令牌，兑换失败不会撤销
    pub async fn register(
        &mut self,
        username: &str,
        password: &str,
        verify_code: &str,
        redeem_code: &str,
    ) -> Result<RegisterOutcome, SessionError> {
        let req = RegisterRequest {
            user_name: self.encryptor.encrypt(username)?,
            password: self.encryptor.encrypt(password)?,
            verify_code: self.encryptor.encrypt(verify_code)?,
        };
        let resp: TokenResponse =
            invoke_as(&self.bridge, CMD_REGISTER, json!({ "registerReq": req })).await?;
        if !resp.is_ok() {
            warn!(retcode = resp.retcode, "passport register rejected");
            self.show_error("dialog.register_failed", &resp.message).await?;
            return Ok(RegisterOutcome::Rejected);
        }

        let Some(token) = resp.data else {
            warn!("passport register succeeded without a token");
            return Ok(RegisterOutcome::RegisteredWithoutToken);
        };
        info!("passport register succeeded");
        let token = self.token.insert(token);
        if redeem_code.is_empty() {
            return Ok(RegisterOutcome::Registered);
        }

        let redeem: EmptyResponse = invoke_as(
            &self.bridge,
            CMD_USE_REDEEM_CODE,
            json!({ "token": token, "code": redeem_code }),
        )
        .await?;
        if redeem.is_ok() {
            info!("redeem code applied");
            return Ok(RegisterOutcome::Registered);
        }

        warn!(
            retcode = redeem.retcode,
            "redeem code rejected after registration; session stays logged in"
        );
        let message = self
            .messages
            .format("dialog.redeem_failed_message", &[&redeem.message]);
        self.show_error("dialog.redeem_failed", &message).await?;
        Ok(RegisterOutcome::RedeemRejected)
    }

    /// 获取用户信息（不缓存）。
    ///
    /// 异常处理：
    /// - 未登录：`NotLoggedIn`
    pub async fn user_info(&self) -> Result<UserInfo, SessionError> {
        let token = self.token.as_deref().ok_or(SessionError::NotLoggedIn)?;
        Ok(invoke_as(&self.bridge, CMD_FETCH_USERINFO, json!({ "token": token })).await?)
    }

    /// 当前账号是否具备 CDN 加速授权；未登录时返回 `false` 且不发起调用。
    pub async fn is_cdn_available(&self) -> Result<bool, SessionError> {
        if self.token.is_none() {
            return Ok(false);
        }
        let info = self.user_info().await?;
        Ok(info.cdn_entitled_at(OffsetDateTime::now_utc()))
    }

    /// 获取指定文件的 CDN 下载地址。
    pub async fn cdn_url(&self, filename: &str) -> Result<String, SessionError> {
        let token = self.token.as_deref().ok_or(SessionError::NotLoggedIn)?;
        Ok(invoke_as(
            &self.bridge,
            CMD_FETCH_CDN,
            json!({ "token": token, "filename": filename }),
        )
        .await?)
    }

    async fn show_error(&self, title_key: &str, message: &str) -> Result<(), SessionError> {
        let title = self.messages.get(title_key);
        debug!(command = CMD_ERROR_DIALOG, "invoke bridge command");
        self.bridge
            .invoke(CMD_ERROR_DIALOG, json!({ "title": title, "message": message }))
            .await?;
        Ok(())
    }
}
