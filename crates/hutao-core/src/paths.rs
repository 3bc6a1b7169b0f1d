//! 统一路径与目录约定。
//!
//! 目标：
//! - 将落盘路径（配置、状态）集中管理，避免散落在各模块中
//! - 支持通过 `HUTAO_LAUNCHER_HOME` 重定向数据目录（便于便携部署与测试隔离）
//!
//! 作者：胡桃启动器项目组
//! 创建时间：2026-10-16
//! 修改时间：2026-10-16

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};

/// 覆盖数据目录的环境变量。
pub const HOME_ENV: &str = "HUTAO_LAUNCHER_HOME";

/// `%LOCALAPPDATA%` 下的目录名。
pub const VENDOR_DIR: &str = "HutaoLauncher";

/// 类 Unix 系统下 `$HOME/.local/share` 中的目录名。
pub const UNIX_DIR: &str = "hutao-launcher";

/// 状态文件名。
pub const STATE_FILE: &str = "launcher-state.json";

/// 配置文件名。
pub const CONFIG_FILE: &str = "launcher-config.json";

/// 获取数据根目录。
///
/// 返回值（按优先级）：
/// - `HUTAO_LAUNCHER_HOME`
/// - `%LOCALAPPDATA%\HutaoLauncher`
/// - `$HOME/.local/share/hutao-launcher`
///
/// 异常处理：
/// - 以上环境变量均不存在或为空时返回错误。
pub fn data_dir() -> Result<PathBuf> {
    if let Some(home) = non_empty_env(HOME_ENV) {
        return Ok(PathBuf::from(home));
    }
    if let Some(local) = non_empty_env("LOCALAPPDATA") {
        return Ok(PathBuf::from(local).join(VENDOR_DIR));
    }
    let home = non_empty_env("HOME").ok_or_else(|| anyhow!("无法确定数据目录：HOME 未设置"))?;
    Ok(PathBuf::from(home).join(".local").join("share").join(UNIX_DIR))
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// 确保目录存在（不存在则递归创建）。
///
/// 异常处理：
/// - 目录创建失败（权限、路径非法等）会返回错误。
pub fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).with_context(|| format!("创建目录失败: {}", path.display()))?;
    Ok(())
}

/// 默认状态文件路径：`<data_dir>/launcher-state.json`
pub fn default_state_file() -> Result<PathBuf> {
    Ok(data_dir()?.join(STATE_FILE))
}

/// 默认配置文件路径：`<data_dir>/launcher-config.json`
pub fn default_config_file() -> Result<PathBuf> {
    Ok(data_dir()?.join(CONFIG_FILE))
}
