//! 胡桃启动器核心库（与界面无关）。
//!
//! 功能：
//! - 通过桥接（bridge）调用原生后端：补丁元数据、通行证登录/注册、CDN 授权
//! - 凭据加密（固定 RSA 公钥 + OAEP），保证明文不出进程
//! - 会话上下文：单一令牌槽位的缓存/加载/清除与授权判定
//! - 界面语言解析与本地化字符串表
//! - 配置、落盘状态与目录约定
//!
//! 作者：胡桃启动器项目组
//! 创建时间：2026-10-16
//! 修改时间：2026-10-16

pub mod auth;
pub mod bridge;
pub mod config;
pub mod crypto;
pub mod ipc;
pub mod locale;
pub mod messages;
pub mod passport;
pub mod patch;
pub mod paths;
pub mod state;
