//! 原生后端桥接抽象。
//!
//! 所有特权操作（网络请求、下载、对话框）都由原生后端完成，本库只发起
//! “命令名 + JSON 参数”的请求并等待 JSON 结果：
//! - 无超时、无重试、无取消；调用方总是等待完成或失败
//! - 具体传输见 [`crate::ipc::TcpBridge`]，测试中可替换为脚本化实现
//!
//! 作者：胡桃启动器项目组
//! 创建时间：2026-10-16
//! 修改时间：2026-10-16

#![allow(async_fn_in_trait)]

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// 获取补丁元数据。
pub const CMD_GET_PATCH: &str = "generic_get_patch";
/// 查询当前网络是否为海外。
pub const CMD_IS_OVERSEA: &str = "generic_is_oversea";
/// 通行证登录。
pub const CMD_LOGIN: &str = "homa_login";
/// 通行证注册。
pub const CMD_REGISTER: &str = "homa_register";
/// 请求邮箱验证码。
pub const CMD_REQUEST_VERIFY_CODE: &str = "homa_request_verify_code";
/// 使用兑换码。
pub const CMD_USE_REDEEM_CODE: &str = "homa_use_redeem_code";
/// 获取用户信息。
pub const CMD_FETCH_USERINFO: &str = "homa_fetch_userinfo";
/// 获取 CDN 加速下载地址。
pub const CMD_FETCH_CDN: &str = "homa_fetch_cdn";
/// 请求原生侧弹出错误对话框。
pub const CMD_ERROR_DIALOG: &str = "error_dialog";

/// 桥接调用错误。
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("桥接连接失败: {0}")]
    Io(#[from] std::io::Error),
    #[error("桥接消息编解码失败: {0}")]
    Codec(#[from] serde_json::Error),
    #[error("原生命令 {command} 执行失败: {message}")]
    Remote { command: String, message: String },
    #[error("桥接连接在响应前关闭")]
    Closed,
    #[error("响应与请求不匹配")]
    Mismatch,
}

/// 原生后端桥接。
///
/// 实现方只负责把命令送达并取回结果；业务含义（retcode 等）由调用方解释。
pub trait Bridge {
    /// 调用原生命令。
    ///
    /// 参数：
    /// - `command`：命令名（见本模块 `CMD_*` 常量）
    /// - `args`：JSON 参数对象（无参数时为空对象）
    ///
    /// 返回值：
    /// - 原生命令的 JSON 结果（可能为 `null`）
    async fn invoke(&self, command: &str, args: Value) -> Result<Value, BridgeError>;
}

/// 调用原生命令并将结果反序列化为 `T`。
pub async fn invoke_as<B, T>(bridge: &B, command: &str, args: Value) -> Result<T, BridgeError>
where
    B: Bridge + ?Sized,
    T: DeserializeOwned,
{
    debug!(command, "invoke bridge command");
    let value = bridge.invoke(command, args).await?;
    Ok(serde_json::from_value(value)?)
}
