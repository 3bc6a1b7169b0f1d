//! 本地化字符串表。
//!
//! 约定：
//! - 每种语言一张静态表（键 → 文本），加载后只读
//! - 查找顺序：当前语言 → 英语 → 键本身
//! - 占位符为位置参数 `{0}`、`{1}`……，按参数顺序各替换第一次出现，不做转义
//!
//! 作者：胡桃启动器项目组
//! 创建时间：2026-10-16
//! 修改时间：2026-10-16

use std::fmt::Display;

use crate::locale::Locale;

const CHS: &[(&str, &str)] = &[
    ("dialog.login_failed", "登录失败"),
    ("dialog.register_failed", "注册失败"),
    ("dialog.verify_code_failed", "发送验证码失败"),
    ("dialog.already_registered", "该邮箱已注册，请直接登录"),
    ("dialog.redeem_failed", "兑换码使用失败"),
    ("dialog.redeem_failed_message", "账号已注册，但兑换码使用失败：{0}"),
    ("cli.yes", "是"),
    ("cli.no", "否"),
    ("cli.login_ok", "登录成功"),
    ("cli.login_failed", "登录失败，请检查用户名与密码"),
    ("cli.logout_ok", "已退出登录"),
    ("cli.verify_code_sent", "验证码已发送至 {0}"),
    ("cli.verify_code_failed", "验证码发送失败"),
    ("cli.register_ok", "注册成功，已自动登录"),
    ("cli.register_redeem_failed", "注册成功并已登录，但兑换码未生效"),
    ("cli.register_failed", "注册失败"),
    ("cli.register_no_token", "注册成功，但未获得登录令牌，请使用 login 登录"),
    ("cli.register_redeem_skipped", "未获得登录令牌，兑换码未使用"),
    ("cli.not_logged_in", "尚未登录"),
    ("cli.user", "用户：{0}"),
    ("cli.licensed_developer", "授权开发者：{0}"),
    ("cli.maintainer", "维护者：{0}"),
    ("cli.cdn_expire_at", "CDN 加速到期时间：{0}"),
    ("cli.gacha_log_expire_at", "祈愿记录到期时间：{0}"),
    ("cli.gacha_log_active", "祈愿记录服务有效：{0}"),
    ("cli.cdn_available", "CDN 加速可用：{0}"),
    ("cli.cdn_url", "CDN 下载地址：{0}"),
    ("cli.patch_version", "版本：{0}"),
    ("cli.patch_sha256", "SHA256：{0}"),
    ("cli.patch_mirror", "镜像 {0}（{1}）：{2}"),
    ("cli.patch_url", "下载地址：{0}"),
    ("cli.oversea", "海外网络：{0}"),
    ("cli.locale", "界面语言：{0}（语言代码 {1}）"),
];

const CHT: &[(&str, &str)] = &[
    ("dialog.login_failed", "登入失敗"),
    ("dialog.register_failed", "註冊失敗"),
    ("dialog.verify_code_failed", "發送驗證碼失敗"),
    ("dialog.already_registered", "該郵箱已註冊，請直接登入"),
    ("dialog.redeem_failed", "兌換碼使用失敗"),
    ("dialog.redeem_failed_message", "帳號已註冊，但兌換碼使用失敗：{0}"),
    ("cli.yes", "是"),
    ("cli.no", "否"),
    ("cli.login_ok", "登入成功"),
    ("cli.login_failed", "登入失敗，請檢查使用者名稱與密碼"),
    ("cli.logout_ok", "已登出"),
    ("cli.verify_code_sent", "驗證碼已發送至 {0}"),
    ("cli.verify_code_failed", "驗證碼發送失敗"),
    ("cli.register_ok", "註冊成功，已自動登入"),
    ("cli.register_redeem_failed", "註冊成功並已登入，但兌換碼未生效"),
    ("cli.register_failed", "註冊失敗"),
    ("cli.register_no_token", "註冊成功，但未取得登入權杖，請使用 login 登入"),
    ("cli.register_redeem_skipped", "未取得登入權杖，兌換碼未使用"),
    ("cli.not_logged_in", "尚未登入"),
    ("cli.user", "使用者：{0}"),
    ("cli.licensed_developer", "授權開發者：{0}"),
    ("cli.maintainer", "維護者：{0}"),
    ("cli.cdn_expire_at", "CDN 加速到期時間：{0}"),
    ("cli.gacha_log_expire_at", "祈願紀錄到期時間：{0}"),
    ("cli.gacha_log_active", "祈願紀錄服務有效：{0}"),
    ("cli.cdn_available", "CDN 加速可用：{0}"),
    ("cli.cdn_url", "CDN 下載地址：{0}"),
    ("cli.patch_version", "版本：{0}"),
    ("cli.patch_sha256", "SHA256：{0}"),
    ("cli.patch_mirror", "鏡像 {0}（{1}）：{2}"),
    ("cli.patch_url", "下載地址：{0}"),
    ("cli.oversea", "海外網路：{0}"),
    ("cli.locale", "介面語言：{0}（語言代碼 {1}）"),
];

const EN: &[(&str, &str)] = &[
    ("dialog.login_failed", "Login failed"),
    ("dialog.register_failed", "Registration failed"),
    ("dialog.verify_code_failed", "Failed to send verification code"),
    ("dialog.already_registered", "This email is already registered, please log in"),
    ("dialog.redeem_failed", "Failed to redeem code"),
    ("dialog.redeem_failed_message", "Account registered, but the redeem code was rejected: {0}"),
    ("cli.yes", "yes"),
    ("cli.no", "no"),
    ("cli.login_ok", "Logged in"),
    ("cli.login_failed", "Login failed, check your username and password"),
    ("cli.logout_ok", "Logged out"),
    ("cli.verify_code_sent", "Verification code sent to {0}"),
    ("cli.verify_code_failed", "Failed to send verification code"),
    ("cli.register_ok", "Registered and logged in"),
    ("cli.register_redeem_failed", "Registered and logged in, but the redeem code was not applied"),
    ("cli.register_failed", "Registration failed"),
    ("cli.register_no_token", "Registered, but no login token was issued; run login to sign in"),
    ("cli.register_redeem_skipped", "No login token was issued, so the redeem code was not applied"),
    ("cli.not_logged_in", "Not logged in"),
    ("cli.user", "User: {0}"),
    ("cli.licensed_developer", "Licensed developer: {0}"),
    ("cli.maintainer", "Maintainer: {0}"),
    ("cli.cdn_expire_at", "CDN access expires at: {0}"),
    ("cli.gacha_log_expire_at", "Gacha log expires at: {0}"),
    ("cli.gacha_log_active", "Gacha log service active: {0}"),
    ("cli.cdn_available", "CDN access available: {0}"),
    ("cli.cdn_url", "CDN download URL: {0}"),
    ("cli.patch_version", "Version: {0}"),
    ("cli.patch_sha256", "SHA256: {0}"),
    ("cli.patch_mirror", "Mirror {0} ({1}): {2}"),
    ("cli.patch_url", "Download URL: {0}"),
    ("cli.oversea", "Oversea network: {0}"),
    ("cli.locale", "UI locale: {0} (lang code {1})"),
];

const JA: &[(&str, &str)] = &[
    ("dialog.login_failed", "ログインに失敗しました"),
    ("dialog.register_failed", "登録に失敗しました"),
    ("dialog.verify_code_failed", "認証コードの送信に失敗しました"),
    ("dialog.already_registered", "このメールアドレスは登録済みです。ログインしてください"),
    ("dialog.redeem_failed", "引き換えコードの使用に失敗しました"),
    ("dialog.redeem_failed_message", "アカウントは登録されましたが、引き換えコードが拒否されました：{0}"),
    ("cli.yes", "はい"),
    ("cli.no", "いいえ"),
    ("cli.login_ok", "ログインしました"),
    ("cli.logout_ok", "ログアウトしました"),
    ("cli.verify_code_sent", "認証コードを {0} に送信しました"),
    ("cli.register_ok", "登録してログインしました"),
    ("cli.not_logged_in", "ログインしていません"),
    ("cli.cdn_available", "CDN 利用可能：{0}"),
    ("cli.patch_version", "バージョン：{0}"),
];

/// 按语言取字符串表；没有表的语言返回 `None`。
fn table(locale: Locale) -> Option<&'static [(&'static str, &'static str)]> {
    match locale {
        Locale::ChineseSimplified => Some(CHS),
        Locale::ChineseTraditional => Some(CHT),
        Locale::English => Some(EN),
        Locale::Japanese => Some(JA),
        Locale::Indonesian | Locale::Russian => None,
    }
}

fn lookup(entries: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    entries.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// 绑定到某一语言的字符串表。
#[derive(Debug, Clone, Copy)]
pub struct MessageStore {
    locale: Locale,
}

impl MessageStore {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// 查找本地化文本：当前语言 → 英语 → 键本身。
    pub fn get<'a>(&self, key: &'a str) -> &'a str {
        let found: Option<&'a str> = table(self.locale)
            .and_then(|entries| lookup(entries, key))
            .or_else(|| lookup(EN, key));
        found.unwrap_or(key)
    }

    /// 查找本地化文本并按位置替换 `{0}`、`{1}`……。
    ///
    /// 每个参数只替换其占位符的第一次出现。
    pub fn format(&self, key: &str, args: &[&dyn Display]) -> String {
        let mut text = self.get(key).to_string();
        for (index, arg) in args.iter().enumerate() {
            text = text.replacen(&format!("{{{index}}}"), &arg.to_string(), 1);
        }
        text
    }
}

impl Default for MessageStore {
    fn default() -> Self {
        Self::new(Locale::English)
    }
}
