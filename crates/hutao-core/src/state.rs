//! 启动器落盘状态（launcher-state.json）。
//!
//! 目的：
//! - 在多次启动之间保存通行证令牌，使单一的内存令牌槽位可以恢复
//!
//! 作者：胡桃启动器项目组
//! 创建时间：2026-10-16
//! 修改时间：2026-10-16

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::paths;

/// 启动器状态。
///
/// 字段说明：
/// - `token`：通行证令牌（明文，仅存本机数据目录）；未登录时为 `null`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LauncherState {
    #[serde(default)]
    pub token: Option<String>,
}

impl LauncherState {
    /// 读取状态文件；不存在时返回默认状态。
    ///
    /// 异常处理：
    /// - 读取或解析失败会返回错误
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let bytes = std::fs::read(path).with_context(|| format!("读取状态文件失败: {}", path.display()))?;
        serde_json::from_slice(&bytes).with_context(|| format!("解析状态文件失败: {}", path.display()))
    }

    /// 序列化并写入状态文件（父目录不存在时自动创建）。
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            paths::ensure_dir(parent)?;
        }
        let bytes = serde_json::to_vec_pretty(self).context("序列化 launcher-state.json 失败")?;
        std::fs::write(path, bytes).with_context(|| format!("写入状态文件失败: {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_load_keeps_token() {
        let dir = std::env::temp_dir().join(format!("hutao-state-{}", uuid::Uuid::new_v4()));
        let path = dir.join("nested").join(paths::STATE_FILE);

        assert_eq!(LauncherState::load_or_default(&path).unwrap(), LauncherState::default());

        let state = LauncherState {
            token: Some("tok".to_string()),
        };
        state.save(&path).unwrap();
        assert_eq!(LauncherState::load_or_default(&path).unwrap(), state);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_or_unknown_fields_are_tolerated() {
        let state: LauncherState = serde_json::from_str("{}").unwrap();
        assert_eq!(state.token, None);

        let state: LauncherState =
            serde_json::from_str(r#"{"token":"t","is_update":true,"curr_version":"1.0.0"}"#).unwrap();
        assert_eq!(state.token.as_deref(), Some("t"));
    }
}
