//! 胡桃启动器命令行入口。
//!
//! 功能：
//! - 经 TCP 桥接调用原生宿主：补丁信息、海外网络判定、通行证登录/注册、CDN 授权
//! - 令牌保存在 `launcher-state.json`，每次启动时载入会话，登录/注册/退出后写回
//! - 所有面向用户的输出都经过本地化字符串表
//!
//! 输出约定：
//! - 结果输出到 stdout；日志输出到 stderr（级别由 `RUST_LOG` 控制，默认 info）
//!
//! 作者：胡桃启动器项目组
//! 创建时间：2026-10-16
//! 修改时间：2026-10-16

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use time::OffsetDateTime;
use tracing::info;

use hutao_core::auth::{RegisterOutcome, Session, VerifyCodeOutcome};
use hutao_core::config::LauncherConfig;
use hutao_core::crypto::CredentialEncryptor;
use hutao_core::ipc::TcpBridge;
use hutao_core::locale::Locale;
use hutao_core::messages::MessageStore;
use hutao_core::patch::{fetch_is_oversea, PatchCache};
use hutao_core::paths;
use hutao_core::state::LauncherState;

/// 命令行参数。
///
/// 说明：
/// - `config` 指定配置文件；缺省时读取数据目录下的 `launcher-config.json`（不存在则用默认值）
/// - `bridge` / `locale` 覆盖配置文件中的同名项
#[derive(Debug, Parser)]
#[command(name = "hutao-launcher", version)]
struct Cli {
    #[arg(long)]
    config: Option<PathBuf>,

    /// 原生宿主地址，例如 `127.0.0.1:47301`。
    #[arg(long)]
    bridge: Option<String>,

    /// 界面语言标签，例如 `zh-CN`、`en-US`。
    #[arg(long)]
    locale: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// 输出补丁信息（版本、校验和、镜像、下载地址）。
    Patch,
    /// 输出当前网络是否为海外。
    Oversea,
    /// 登录通行证。
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// 请求注册验证码。
    RequestCode {
        #[arg(long)]
        username: String,
    },
    /// 注册通行证并可选使用兑换码。
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        verify_code: String,
        #[arg(long, default_value = "")]
        redeem_code: String,
    },
    /// 退出登录（清除保存的令牌）。
    Logout,
    /// 输出当前账号信息。
    UserInfo,
    /// 输出 CDN 加速是否可用。
    CdnStatus,
    /// 获取 CDN 下载地址；缺省文件名取补丁安装包文件名。
    CdnUrl {
        #[arg(long)]
        filename: Option<String>,
    },
    /// 输出解析后的界面语言。
    Locale,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let rt = tokio::runtime::Runtime::new().context("创建 Tokio Runtime 失败")?;
    rt.block_on(run(cli))
}

/// 合并配置文件与命令行参数。
fn load_config(cli: &Cli) -> Result<LauncherConfig> {
    let mut config = match &cli.config {
        Some(path) => LauncherConfig::load(path)?,
        None => LauncherConfig::load_or_default(&paths::default_config_file()?)?,
    };
    if let Some(addr) = &cli.bridge {
        config.bridge_addr = addr.clone();
    }
    if let Some(tag) = &cli.locale {
        config.locale = Some(tag.clone());
    }
    Ok(config)
}

/// 执行子命令。
///
/// 异常处理：
/// - 配置/状态读写失败、桥接失败、未登录等都以错误返回，由 `main` 输出并以非 0 退出
async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    let locale = config.resolve_locale();
    let messages = MessageStore::new(locale);

    let state_path = paths::default_state_file()?;
    let mut state = LauncherState::load_or_default(&state_path)?;

    let bridge = TcpBridge::new(config.bridge_addr.clone());
    info!(bridge = bridge.addr(), locale = %locale, "launcher started");

    let encryptor = CredentialEncryptor::embedded().context("加载通行证公钥失败")?;
    let mut session = Session::new(bridge, encryptor, messages);
    if let Some(token) = &state.token {
        session.load_token(token.clone());
    }
    let patches = PatchCache::new();

    match cli.command {
        Commands::Patch => {
            let patch = patches.fetch(session.bridge()).await?;
            let m = session.messages();
            println!("{}", m.format("cli.patch_version", &[&patch.version]));
            println!("{}", m.format("cli.patch_sha256", &[&patch.sha256]));
            for mirror in &patch.mirrors {
                println!(
                    "{}",
                    m.format(
                        "cli.patch_mirror",
                        &[&mirror.mirror_name, &mirror.mirror_type, &mirror.url]
                    )
                );
            }
            for url in &patch.urls {
                println!("{}", m.format("cli.patch_url", &[url]));
            }
        }
        Commands::Oversea => {
            let oversea = fetch_is_oversea(session.bridge()).await?;
            let m = session.messages();
            println!("{}", m.format("cli.oversea", &[&yes_no(m, oversea)]));
        }
        Commands::Login { username, password } => {
            let ok = session.login(&username, &password).await?;
            if !ok {
                return Err(anyhow!(session.messages().get("cli.login_failed").to_string()));
            }
            persist_token(&mut state, &session, &state_path)?;
            println!("{}", session.messages().get("cli.login_ok"));
        }
        Commands::RequestCode { username } => {
            match session.request_verify_code(&username).await? {
                VerifyCodeOutcome::Sent => {
                    println!("{}", session.messages().format("cli.verify_code_sent", &[&username]));
                }
                VerifyCodeOutcome::AlreadyRegistered => {
                    return Err(anyhow!(session.messages().get("dialog.already_registered").to_string()));
                }
                VerifyCodeOutcome::Rejected => {
                    return Err(anyhow!(session.messages().get("cli.verify_code_failed").to_string()));
                }
            }
        }
        Commands::Register {
            username,
            password,
            verify_code,
            redeem_code,
        } => {
            let outcome = session
                .register(&username, &password, &verify_code, &redeem_code)
                .await?;
            if outcome.logged_in() {
                persist_token(&mut state, &session, &state_path)?;
            }
            match outcome {
                RegisterOutcome::Registered => println!("{}", session.messages().get("cli.register_ok")),
                RegisterOutcome::RegisteredWithoutToken => {
                    println!("{}", session.messages().get("cli.register_no_token"));
                    if !redeem_code.is_empty() {
                        return Err(anyhow!(session.messages().get("cli.register_redeem_skipped").to_string()));
                    }
                }
                RegisterOutcome::RedeemRejected => {
                    return Err(anyhow!(session.messages().get("cli.register_redeem_failed").to_string()));
                }
                RegisterOutcome::Rejected => {
                    return Err(anyhow!(session.messages().get("cli.register_failed").to_string()));
                }
            }
        }
        Commands::Logout => {
            session.logout();
            persist_token(&mut state, &session, &state_path)?;
            println!("{}", session.messages().get("cli.logout_ok"));
        }
        Commands::UserInfo => {
            require_login(&session)?;
            let info = session.user_info().await?;
            let m = session.messages();
            println!("{}", m.format("cli.user", &[&info.display_name()]));
            println!(
                "{}",
                m.format("cli.licensed_developer", &[&yes_no(m, info.is_licensed_developer)])
            );
            println!("{}", m.format("cli.maintainer", &[&yes_no(m, info.is_maintainer)]));
            println!("{}", m.format("cli.cdn_expire_at", &[&info.cdn_expire_at]));
            println!("{}", m.format("cli.gacha_log_expire_at", &[&info.gacha_log_expire_at]));
            let gacha_active = info.gacha_log_active_at(OffsetDateTime::now_utc());
            println!("{}", m.format("cli.gacha_log_active", &[&yes_no(m, gacha_active)]));
        }
        Commands::CdnStatus => {
            let available = session.is_cdn_available().await?;
            let m = session.messages();
            println!("{}", m.format("cli.cdn_available", &[&yes_no(m, available)]));
        }
        Commands::CdnUrl { filename } => {
            require_login(&session)?;
            let filename = match filename {
                Some(name) => name,
                None => {
                    let patch = patches.fetch(session.bridge()).await?;
                    patch
                        .package_file_name()
                        .map(str::to_string)
                        .ok_or_else(|| anyhow!("补丁信息中没有可用的下载地址"))?
                }
            };
            let url = session.cdn_url(&filename).await?;
            println!("{}", session.messages().format("cli.cdn_url", &[&url]));
        }
        Commands::Locale => print_locale(session.messages(), locale),
    }
    Ok(())
}

fn require_login(session: &Session<TcpBridge>) -> Result<()> {
    if session.is_logged_in() {
        Ok(())
    } else {
        Err(anyhow!(session.messages().get("cli.not_logged_in").to_string()))
    }
}

/// 将会话中的令牌写回状态文件。
fn persist_token(state: &mut LauncherState, session: &Session<TcpBridge>, path: &std::path::Path) -> Result<()> {
    state.token = session.token().map(str::to_string);
    state.save(path)
}

fn yes_no(messages: &MessageStore, value: bool) -> &'static str {
    messages.get(if value { "cli.yes" } else { "cli.no" })
}

fn print_locale(messages: &MessageStore, locale: Locale) {
    println!(
        "{}",
        messages.format("cli.locale", &[&locale.table_key(), &locale.lang_code()])
    );
}
