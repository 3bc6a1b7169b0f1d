//! 界面语言解析。
//!
//! 规则：
//! - 中文按地区区分简繁：`TW`/`HK` 开头的地区为繁体，其余为简体
//! - 日语、印尼语、俄语、英语按语言子标签识别
//! - 无法识别时固定回退为英语
//!
//! 同一个 [`Locale`] 同时提供字符串表键（[`Locale::table_key`]）与
//! 下游使用的语言代码（[`Locale::lang_code`]），两者不再各自解析。
//!
//! 作者：胡桃启动器项目组
//! 创建时间：2026-10-16
//! 修改时间：2026-10-16

use std::env;

/// 读取宿主语言偏好的环境变量（按优先级排列）。
pub const LOCALE_ENV_KEYS: [&str; 4] = ["HUTAO_LAUNCHER_LOCALE", "LC_ALL", "LC_MESSAGES", "LANG"];

/// 支持的界面语言。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    /// 简体中文（`chs`）。
    ChineseSimplified,
    /// 繁体中文（`cht`）。
    ChineseTraditional,
    /// 英语（`en`），同时是回退语言。
    #[default]
    English,
    /// 日语（`ja`）。
    Japanese,
    /// 印尼语（`id`），暂无字符串表。
    Indonesian,
    /// 俄语（`ru`），暂无字符串表。
    Russian,
}

impl Locale {
    /// 将宿主语言标签解析为界面语言。
    ///
    /// 参数：
    /// - `raw`：形如 `zh-TW`、`zh_HK.UTF-8`、`en-US`、`ja` 的标签
    ///
    /// 返回值：
    /// - 识别成功：对应语言
    /// - 空串、`C`/`POSIX` 或不支持的语言：[`Locale::English`]
    pub fn resolve(raw: &str) -> Locale {
        let raw = raw.trim();
        let raw = raw.split_once('.').map(|(tag, _)| tag).unwrap_or(raw);
        let raw = raw.split_once('@').map(|(tag, _)| tag).unwrap_or(raw);
        let normalized = raw.replace('_', "-");

        let mut subtags = normalized.split('-');
        let language = subtags.next().unwrap_or_default().to_ascii_lowercase();
        let region = subtags.next().map(|s| s.to_ascii_uppercase());

        match language.as_str() {
            "zh" => match region.as_deref() {
                Some(r) if r.starts_with("TW") || r.starts_with("HK") || r.starts_with("HANT") => {
                    Locale::ChineseTraditional
                }
                _ => Locale::ChineseSimplified,
            },
            "ja" => Locale::Japanese,
            "id" => Locale::Indonesian,
            "ru" => Locale::Russian,
            _ => Locale::English,
        }
    }

    /// 从环境变量读取宿主语言偏好并解析。
    ///
    /// 按 [`LOCALE_ENV_KEYS`] 顺序取第一个非空值；都不存在时为英语。
    pub fn from_env() -> Locale {
        for key in LOCALE_ENV_KEYS {
            if let Ok(value) = env::var(key) {
                if !value.trim().is_empty() {
                    return Locale::resolve(&value);
                }
            }
        }
        Locale::English
    }

    /// 字符串表键。
    pub fn table_key(self) -> &'static str {
        match self {
            Locale::ChineseSimplified => "chs",
            Locale::ChineseTraditional => "cht",
            Locale::English => "en",
            Locale::Japanese => "ja",
            Locale::Indonesian => "id",
            Locale::Russian => "ru",
        }
    }

    /// 下游服务使用的语言代码（`zh`/`id`/`ru`/`jp`/`en`）。
    pub fn lang_code(self) -> &'static str {
        match self {
            Locale::ChineseSimplified | Locale::ChineseTraditional => "zh",
            Locale::Indonesian => "id",
            Locale::Russian => "ru",
            Locale::Japanese => "jp",
            Locale::English => "en",
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.table_key())
    }
}
