//! 补丁元数据（版本、镜像、下载地址、校验和）获取与进程内缓存。
//!
//! 缓存策略：
//! - 首次调用向原生后端获取并校验，成功后缓存；之后直接返回缓存
//! - 缓存生命周期与 [`PatchCache`] 相同，期间不失效、不刷新
//! - 校验失败不缓存，也不重试
//!
//! 作者：胡桃启动器项目组
//! 创建时间：2026-10-16
//! 修改时间：2026-10-16

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::info;

use crate::bridge::{invoke_as, Bridge, BridgeError, CMD_GET_PATCH, CMD_IS_OVERSEA};

/// 补丁元数据获取错误。
#[derive(Debug, Error)]
pub enum PatchError {
    #[error("获取补丁信息失败")]
    Missing,
    #[error("补丁信息无效: {0}")]
    Invalid(String),
    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

/// 单个镜像（CDN）端点。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MirrorDescriptor {
    pub url: String,
    pub mirror_name: String,
    pub mirror_type: String,
    /// 测速结果，由外部填充。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
}

/// 补丁描述（获取后不可变）。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatchDescriptor {
    pub version: String,
    pub validation: String,
    pub cache_time: String,
    pub mirrors: Vec<MirrorDescriptor>,
    #[serde(default)]
    pub urls: Vec<String>,
    pub sha256: String,
}

impl PatchDescriptor {
    /// 安装包文件名：第一个下载地址的最后一段路径。
    pub fn package_file_name(&self) -> Option<&str> {
        let url = self.urls.first()?;
        let path = url.split(['?', '#']).next().unwrap_or(url);
        path.rsplit('/').next().filter(|name| !name.is_empty())
    }
}

/// 校验原生后端返回的补丁信息并反序列化。
///
/// 异常处理：
/// - `null`：`Missing`
/// - 缺少 `mirrors` 列表或字段类型不符：`Invalid`
fn validate(value: Value) -> Result<PatchDescriptor, PatchError> {
    if value.is_null() {
        return Err(PatchError::Missing);
    }
    if !value.get("mirrors").is_some_and(Value::is_array) {
        return Err(PatchError::Invalid("缺少 mirrors 列表".to_string()));
    }
    serde_json::from_value(value).map_err(|e| PatchError::Invalid(e.to_string()))
}

/// 补丁元数据缓存（一次性填充）。
#[derive(Debug, Default)]
pub struct PatchCache {
    cell: OnceCell<Arc<PatchDescriptor>>,
}

impl PatchCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取补丁描述：有缓存直接返回，否则经桥接获取、校验并缓存。
    ///
    /// 返回值：
    /// - 同一缓存上的多次成功调用返回同一个 `Arc`
    ///
    /// 异常处理：
    /// - 桥接失败：`Bridge`
    /// - 校验失败：`Missing` / `Invalid`
    pub async fn fetch<B: Bridge + ?Sized>(&self, bridge: &B) -> Result<Arc<PatchDescriptor>, PatchError> {
        let descriptor = self
            .cell
            .get_or_try_init(|| async {
                let value = bridge.invoke(CMD_GET_PATCH, json!({})).await?;
                let descriptor = validate(value)?;
                info!(
                    version = %descriptor.version,
                    mirrors = descriptor.mirrors.len(),
                    "patch data cached"
                );
                Ok::<_, PatchError>(Arc::new(descriptor))
            })
            .await?;
        Ok(Arc::clone(descriptor))
    }

    /// 已缓存的补丁描述（不触发获取）。
    pub fn cached(&self) -> Option<Arc<PatchDescriptor>> {
        self.cell.get().cloned()
    }
}

/// 查询当前网络是否为海外（不缓存）。
pub async fn fetch_is_oversea<B: Bridge + ?Sized>(bridge: &B) -> Result<bool, PatchError> {
    Ok(invoke_as(bridge, CMD_IS_OVERSEA, json!({})).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(urls: &[&str]) -> PatchDescriptor {
        PatchDescriptor {
            version: "1.0.0".to_string(),
            validation: String::new(),
            cache_time: String::new(),
            mirrors: Vec::new(),
            urls: urls.iter().map(|u| u.to_string()).collect(),
            sha256: String::new(),
        }
    }

    #[test]
    fn null_is_missing() {
        assert!(matches!(validate(Value::Null), Err(PatchError::Missing)));
    }

    #[test]
    fn mirrors_are_required() {
        let value = json!({
            "version": "1.0.0",
            "validation": "",
            "cache_time": "",
            "urls": [],
            "sha256": ""
        });
        assert!(matches!(validate(value), Err(PatchError::Invalid(_))));

        let value = json!({ "mirrors": null });
        assert!(matches!(validate(value), Err(PatchError::Invalid(_))));
    }

    #[test]
    fn mirror_speed_is_optional() {
        let value = json!({
            "version": "1.12.0",
            "validation": "v",
            "cache_time": "2026-10-16T00:00:00Z",
            "mirrors": [
                { "url": "https://a.invalid/pkg.msix", "mirror_name": "a", "mirror_type": "direct" },
                { "url": "https://b.invalid/pkg.msix", "mirror_name": "b", "mirror_type": "browser", "speed": 12.5 }
            ],
            "urls": ["https://a.invalid/pkg.msix"],
            "sha256": "ABCD"
        });
        let descriptor = validate(value).unwrap();
        assert_eq!(descriptor.mirrors[0].speed, None);
        assert_eq!(descriptor.mirrors[1].speed, Some(12.5));
    }

    #[test]
    fn package_file_name_uses_first_url() {
        let d = descriptor(&["https://cdn.invalid/releases/Snap.Hutao_1.12.0.msix?sig=1", "https://x.invalid/other"]);
        assert_eq!(d.package_file_name(), Some("Snap.Hutao_1.12.0.msix"));
        assert_eq!(descriptor(&[]).package_file_name(), None);
        assert_eq!(descriptor(&["https://cdn.invalid/"]).package_file_name(), None);
    }
}
