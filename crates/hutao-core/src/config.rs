//! 启动器配置（launcher-config.json）。
//!
//! 约定：
//! - 所有字段都有默认值，缺失字段按默认处理，未知字段忽略
//! - 命令行参数优先于配置文件（由调用方合并）
//!
//! 作者：胡桃启动器项目组
//! 创建时间：2026-10-16
//! 修改时间：2026-10-16

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::locale::Locale;

/// 原生宿主默认监听地址。
pub const DEFAULT_BRIDGE_ADDR: &str = "127.0.0.1:47301";

fn default_bridge_addr() -> String {
    DEFAULT_BRIDGE_ADDR.to_string()
}

/// 启动器配置。
///
/// 字段说明：
/// - `bridge_addr`：原生宿主的 TCP 地址
/// - `locale`：界面语言标签（如 `zh-CN`）；为空时从环境变量解析
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LauncherConfig {
    #[serde(default = "default_bridge_addr")]
    pub bridge_addr: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            bridge_addr: default_bridge_addr(),
            locale: None,
        }
    }
}

impl LauncherConfig {
    /// 读取并解析配置文件。
    ///
    /// 异常处理：
    /// - 文件不存在、读取或解析失败均返回错误
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("解析配置文件失败: {}", path.display()))
    }

    /// 文件存在则读取，否则返回默认配置。
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// 解析界面语言：配置中的标签优先，否则读取环境变量。
    pub fn resolve_locale(&self) -> Locale {
        match self.locale.as_deref().map(str::trim) {
            Some(tag) if !tag.is_empty() => Locale::resolve(tag),
            _ => Locale::from_env(),
        }
    }
}
