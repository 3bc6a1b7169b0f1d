//! 凭据加密：用户名/密码等明文离开进程前以固定 RSA 公钥加密。
//!
//! 格式：
//! - RSA-OAEP（SHA-1，与服务端解密参数一致）
//! - 密文以标准 base64（带 padding）编码后提交
//!
//! 长度约束：
//! - 提交的原始密文必须恰好 [`CIPHERTEXT_LEN`] 字节；长度不符时重新加密，
//!   最多 [`MAX_ENCRYPT_ATTEMPTS`] 次，仍不符则返回错误
//!
//! 作者：胡桃启动器项目组
//! 创建时间：2026-10-16
//! 修改时间：2026-10-16

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rsa::pkcs8::DecodePublicKey;
use rsa::{Oaep, RsaPublicKey};
use sha1::Sha1;
use thiserror::Error;

/// 通行证服务的加密公钥（SPKI PEM）。
pub const PASSPORT_PUBLIC_KEY: &str = "-----BEGIN PUBLIC KEY-----
MIIBIjANBgkqhkiG9w0BAQEFAAOCAQ8AMIIBCgKCAQEA5W2SEyZSlP2zBI1Sn8Gd
TwbZoXlUGNKyoVrY8SVYu9GMefdGZCrUQNkCG/Np8pWPmSSEFGd5oeug/oIMtCZQ
NOn0drlR+pul/XZ1KQhKmj/arWjN1XNok2qXF7uxhqD0JyNT/Fxy6QvzqIpBsM9S
7ajm8/BOGlPG1SInDPaqTdTRTT30AuN+IhWEEFwT3Ctv1SmDupHs2Oan5qM7Y3uw
b6K1rbnk5YokiV2FzHajGUymmSKXqtG1USZzwPqImpYb4Z0M/StPFWdsKqexBqMM
mkXckI5O98GdlszEmQ0Ejv5Fx9fR2rXRwM76S4iZTfabYpiMbb4bM42mHMauupj6
9QIDAQAB
-----END PUBLIC KEY-----
";

/// 原始密文的固定长度（字节）。
pub const CIPHERTEXT_LEN: usize = 256;

/// 长度不符时的最大加密次数。
pub const MAX_ENCRYPT_ATTEMPTS: usize = 8;

/// 凭据加密错误。
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("公钥解析失败: {0}")]
    InvalidKey(String),
    #[error("RSA 加密失败: {0}")]
    Rsa(#[from] rsa::Error),
    #[error("密文长度异常：期望 {expected} 字节，实际 {actual} 字节")]
    CiphertextLength { expected: usize, actual: usize },
}

/// 凭据加密器（持有解析后的公钥）。
#[derive(Debug, Clone)]
pub struct CredentialEncryptor {
    key: RsaPublicKey,
}

impl CredentialEncryptor {
    /// 使用内置的通行证公钥。
    ///
    /// 异常处理：
    /// - 内置公钥为编译期常量，解析失败只会出现在常量被改坏时
    pub fn embedded() -> Result<Self, CryptoError> {
        Self::from_pem(PASSPORT_PUBLIC_KEY)
    }

    /// 从 SPKI PEM 文本构造。
    pub fn from_pem(pem: &str) -> Result<Self, CryptoError> {
        let key = RsaPublicKey::from_public_key_pem(pem)
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
        Ok(Self { key })
    }

    pub fn from_key(key: RsaPublicKey) -> Self {
        Self { key }
    }

    /// 加密明文并返回 base64 密文。
    ///
    /// 参数：
    /// - `plaintext`：待加密文本（UTF-8 字节参与加密）
    ///
    /// 返回值：
    /// - 解码后恰好 [`CIPHERTEXT_LEN`] 字节的密文的 base64 文本
    ///
    /// 异常处理：
    /// - RSA 层失败（例如明文超长）：`Rsa`，不重试
    /// - 连续 [`MAX_ENCRYPT_ATTEMPTS`] 次长度不符：`CiphertextLength`
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CryptoError> {
        let mut rng = rand::thread_rng();
        let mut actual = 0;
        for _ in 0..MAX_ENCRYPT_ATTEMPTS {
            let cipher = self
                .key
                .encrypt(&mut rng, Oaep::new::<Sha1>(), plaintext.as_bytes())?;
            if cipher.len() == CIPHERTEXT_LEN {
                return Ok(STANDARD.encode(cipher));
            }
            actual = cipher.len();
        }
        Err(CryptoError::CiphertextLength {
            expected: CIPHERTEXT_LEN,
            actual,
        })
    }
}
