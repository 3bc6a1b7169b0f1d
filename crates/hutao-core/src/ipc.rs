//! 与原生宿主进程之间的 IPC 协议及其 TCP 客户端。
//!
//! 协议形态：
//! - 以 JSON 序列化 [`IpcRequest`] / [`IpcResponse`]，按“单行一条消息”的方式传输
//! - 每条消息携带 `request_id` 用于请求-响应关联
//! - 每次调用建立一条新连接，收到一行响应后关闭
//!
//! 约束与注意事项：
//! - 请求参数中的凭据均已加密；令牌以明文传输，仅限本机回环地址使用
//!
//! 作者：胡桃启动器项目组
//! 创建时间：2026-10-16
//! 修改时间：2026-10-16

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use uuid::Uuid;

use crate::bridge::{Bridge, BridgeError};

/// IPC 请求消息。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpcRequest {
    pub request_id: Uuid,
    /// 原生命令名。
    pub command: String,
    /// 命令参数（JSON 对象）。
    #[serde(default)]
    pub args: Value,
}

/// IPC 响应消息。
///
/// 序列化格式：
/// - 使用 `#[serde(tag = "type")]`，在 JSON 中通过 `type` 字段区分成功/失败。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IpcResponse {
    /// 命令执行成功，`data` 为命令结果（可能为 `null`）。
    Ok {
        request_id: Uuid,
        #[serde(default)]
        data: Value,
    },
    /// 命令执行失败。
    ///
    /// 参数：
    /// - `message`：原生侧给出的错误描述
    Error { request_id: Uuid, message: String },
}

impl IpcResponse {
    pub fn request_id(&self) -> Uuid {
        match self {
            IpcResponse::Ok { request_id, .. } | IpcResponse::Error { request_id, .. } => *request_id,
        }
    }
}

/// 基于 TCP 的桥接客户端（单行 JSON）。
#[derive(Debug, Clone)]
pub struct TcpBridge {
    addr: String,
}

impl TcpBridge {
    /// 参数：
    /// - `addr`：原生宿主监听地址，例如 `127.0.0.1:47301`
    pub fn new(addr: impl Into<String>) -> Self {
        Self { addr: addr.into() }
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }
}

impl Bridge for TcpBridge {
    /// 发送一条请求并等待对应响应。
    ///
    /// 异常处理：
    /// - 连接/读写失败：`Io`
    /// - 响应不是合法 JSON：`Codec`
    /// - 对端未回复即关闭：`Closed`
    /// - `request_id` 不一致：`Mismatch`
    /// - 原生命令报告失败：`Remote`
    async fn invoke(&self, command: &str, args: Value) -> Result<Value, BridgeError> {
        let request = IpcRequest {
            request_id: Uuid::new_v4(),
            command: command.to_string(),
            args,
        };

        let mut stream = TcpStream::connect(&self.addr).await?;
        let (reader, mut writer) = stream.split();

        let mut line = serde_json::to_string(&request)?;
        line.push('\n');
        writer.write_all(line.as_bytes()).await?;
        writer.flush().await?;

        let mut reader = BufReader::new(reader);
        let mut buf = String::new();
        if reader.read_line(&mut buf).await? == 0 {
            return Err(BridgeError::Closed);
        }

        let response: IpcResponse = serde_json::from_str(buf.trim())?;
        if response.request_id() != request.request_id {
            return Err(BridgeError::Mismatch);
        }
        match response {
            IpcResponse::Ok { data, .. } => Ok(data),
            IpcResponse::Error { message, .. } => Err(BridgeError::Remote {
                command: request.command,
                message,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_ok_without_data_deserializes_as_null() {
        let id = Uuid::new_v4();
        let json = format!(r#"{{"type":"ok","request_id":"{id}"}}"#);
        let resp: IpcResponse = serde_json::from_str(&json).unwrap();
        match resp {
            IpcResponse::Ok { request_id, data } => {
                assert_eq!(request_id, id);
                assert!(data.is_null());
            }
            _ => panic!("unexpected variant"),
        }
    }

    #[test]
    fn response_error_roundtrips_tag() {
        let resp = IpcResponse::Error {
            request_id: Uuid::nil(),
            message: "boom".to_string(),
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["message"], "boom");
    }
}
