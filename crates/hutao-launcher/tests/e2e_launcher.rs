use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use uuid::Uuid;

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("{prefix}-{}", Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

/// 假宿主：按命令名返回结果，并记录收到的命令。
///
/// 监听线程不会退出，随测试进程结束。
fn spawn_fake_host(handler: fn(&str, &Value) -> Value) -> (String, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind fake host");
    let addr = listener.local_addr().expect("local addr").to_string();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let record = Arc::clone(&seen);
    std::thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            let mut line = String::new();
            let Ok(reader) = stream.try_clone() else { continue };
            if BufReader::new(reader).read_line(&mut line).is_err() {
                continue;
            }
            let req: Value = serde_json::from_str(line.trim()).expect("request json");
            let command = req["command"].as_str().unwrap_or_default().to_string();
            record.lock().unwrap().push(command.clone());
            let resp = json!({
                "type": "ok",
                "request_id": req["request_id"],
                "data": handler(&command, &req["args"]),
            });
            let _ = writeln!(stream, "{resp}");
            let _ = stream.flush();
        }
    });
    (addr, seen)
}

fn host(command: &str, args: &Value) -> Value {
    match command {
        "generic_get_patch" => json!({
            "version": "1.12.0",
            "validation": "sig",
            "cache_time": "2026-10-16T00:00:00Z",
            "mirrors": [
                { "url": "https://a.invalid/Snap.Hutao_1.12.0.msix", "mirror_name": "Alpha", "mirror_type": "direct" }
            ],
            "urls": ["https://a.invalid/Snap.Hutao_1.12.0.msix"],
            "sha256": "ABCDEF0123"
        }),
        "homa_login" => json!({ "retcode": 0, "message": "ok", "data": "e2e-token" }),
        "homa_fetch_userinfo" => {
            assert_eq!(args["token"], "e2e-token");
            json!({
                "UserName": "hutao@example.com",
                "IsLicensedDeveloper": false,
                "IsMaintainer": true,
                "GachaLogExpireAt": "",
                "CdnExpireAt": ""
            })
        }
        "homa_fetch_cdn" => json!(format!("https://cdn.invalid/{}", args["filename"].as_str().unwrap_or_default())),
        _ => Value::Null,
    }
}

fn run(home: &Path, args: &[&str]) -> Output {
    let exe = env!("CARGO_BIN_EXE_hutao-launcher");
    Command::new(exe)
        .env("HUTAO_LAUNCHER_HOME", home)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("run hutao-launcher")
}

fn stdout_of(out: &Output) -> String {
    assert!(
        out.status.success(),
        "launcher failed: status={:?}\nstdout={}\nstderr={}",
        out.status,
        String::from_utf8_lossy(&out.stdout),
        String::from_utf8_lossy(&out.stderr)
    );
    String::from_utf8_lossy(&out.stdout).into_owned()
}

#[test]
fn e2e_patch_prints_descriptor() {
    let home = unique_temp_dir("hutao-launcher-patch");
    let _cleanup = CleanupDir(home.clone());
    let (addr, seen) = spawn_fake_host(host);

    let out = run(&home, &["--bridge", &addr, "--locale", "en-US", "patch"]);
    let stdout = stdout_of(&out);

    assert!(stdout.contains("Version: 1.12.0"), "stdout={stdout}");
    assert!(stdout.contains("SHA256: ABCDEF0123"), "stdout={stdout}");
    assert!(
        stdout.contains("Mirror Alpha (direct): https://a.invalid/Snap.Hutao_1.12.0.msix"),
        "stdout={stdout}"
    );
    assert_eq!(*seen.lock().unwrap(), ["generic_get_patch"]);
}

#[test]
fn e2e_login_persists_token_for_later_runs() {
    let home = unique_temp_dir("hutao-launcher-login");
    let _cleanup = CleanupDir(home.clone());
    let (addr, seen) = spawn_fake_host(host);

    let out = run(
        &home,
        &["--bridge", &addr, "--locale", "en-US", "login", "--username", "u", "--password", "p"],
    );
    assert!(stdout_of(&out).contains("Logged in"));

    let state: Value = serde_json::from_slice(
        &std::fs::read(home.join("launcher-state.json")).expect("read state file"),
    )
    .expect("parse state file");
    assert_eq!(state["token"], "e2e-token");

    let out = run(&home, &["--bridge", &addr, "--locale", "en-US", "user-info"]);
    let stdout = stdout_of(&out);
    assert!(stdout.contains("User: hutao@example.com"), "stdout={stdout}");
    assert!(stdout.contains("Maintainer: yes"), "stdout={stdout}");
    assert!(stdout.contains("Gacha log service active: no"), "stdout={stdout}");

    let out = run(&home, &["--bridge", &addr, "--locale", "en-US", "cdn-url"]);
    let stdout = stdout_of(&out);
    assert!(
        stdout.contains("CDN download URL: https://cdn.invalid/Snap.Hutao_1.12.0.msix"),
        "stdout={stdout}"
    );

    let out = run(&home, &["--bridge", &addr, "--locale", "en-US", "logout"]);
    assert!(stdout_of(&out).contains("Logged out"));
    let state: Value = serde_json::from_slice(&std::fs::read(home.join("launcher-state.json")).unwrap()).unwrap();
    assert!(state["token"].is_null());

    assert_eq!(
        *seen.lock().unwrap(),
        ["homa_login", "homa_fetch_userinfo", "generic_get_patch", "homa_fetch_cdn"]
    );
}

#[test]
fn e2e_logged_out_cdn_status_skips_bridge() {
    let home = unique_temp_dir("hutao-launcher-cdn");
    let _cleanup = CleanupDir(home.clone());
    let (addr, seen) = spawn_fake_host(host);

    let out = run(&home, &["--bridge", &addr, "--locale", "en-US", "cdn-status"]);
    assert!(stdout_of(&out).contains("CDN access available: no"));
    assert!(seen.lock().unwrap().is_empty());

    let out = run(&home, &["--bridge", &addr, "--locale", "en-US", "user-info"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Not logged in"));
}

fn host_without_token(command: &str, _args: &Value) -> Value {
    match command {
        "homa_register" => json!({ "retcode": 0, "message": "" }),
        _ => Value::Null,
    }
}

#[test]
fn e2e_register_without_issued_token_stays_logged_out() {
    let home = unique_temp_dir("hutao-launcher-register");
    let _cleanup = CleanupDir(home.clone());
    let (addr, seen) = spawn_fake_host(host_without_token);

    let mut args = vec!["--bridge", addr.as_str(), "--locale", "en-US", "register"];
    args.extend(["--username", "u", "--password", "p", "--verify-code", "123456"]);
    let out = run(&home, &args);
    assert!(stdout_of(&out).contains("no login token was issued"));
    assert!(!home.join("launcher-state.json").exists());

    args.extend(["--redeem-code", "GIFT"]);
    let out = run(&home, &args);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("redeem code was not applied"));

    assert_eq!(*seen.lock().unwrap(), ["homa_register", "homa_register"]);
}

#[test]
fn e2e_locale_uses_flag_then_config() {
    let home = unique_temp_dir("hutao-launcher-locale");
    let _cleanup = CleanupDir(home.clone());

    let out = run(&home, &["--locale", "zh-TW", "locale"]);
    assert!(stdout_of(&out).contains("介面語言：cht（語言代碼 zh）"));

    std::fs::write(home.join("launcher-config.json"), r#"{ "locale": "zh_CN.UTF-8" }"#)
        .expect("write config");
    let out = run(&home, &["locale"]);
    assert!(stdout_of(&out).contains("界面语言：chs（语言代码 zh）"));
}

struct CleanupDir(PathBuf);

impl Drop for CleanupDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}
