// SPDX-License-Identifier: Apache-2.0

//! Stateless session tokens: a signed `v1.payload.signature` string the
//! client carries as a bearer token. No server-side session table; logout is
//! the client dropping the token, and expiry is enforced at decode time.

pub mod password;

use argon2::password_hash::rand_core::{OsRng, RngCore};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;
const SESSION_VERSION_V1: &str = "v1";
const MAX_SESSION_TOKEN_LEN: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionErrorCode {
    InvalidFormat,
    UnsupportedVersion,
    InvalidSignature,
    InvalidPayload,
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionError {
    pub code: SessionErrorCode,
    pub message: String,
}

impl SessionError {
    #[must_use]
    pub fn new(code: SessionErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}
impl std::error::Error for SessionError {}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionPayload {
    #[serde(default = "session_version_v1")]
    pub session_version: String,
    pub user_id: i64,
    pub issued_at: i64,
}

fn session_version_v1() -> String {
    SESSION_VERSION_V1.to_string()
}

impl SessionPayload {
    #[must_use]
    pub fn new(user_id: i64, issued_at: i64) -> Self {
        Self {
            session_version: session_version_v1(),
            user_id,
            issued_at,
        }
    }
}

pub fn encode_session(payload: &SessionPayload, secret: &[u8]) -> Result<String, SessionError> {
    let payload_bytes = serde_json::to_vec(payload)
        .map_err(|e| SessionError::new(SessionErrorCode::InvalidPayload, e.to_string()))?;
    let payload_part = URL_SAFE_NO_PAD.encode(payload_bytes);
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| SessionError::new(SessionErrorCode::InvalidPayload, e.to_string()))?;
    mac.update(payload_part.as_bytes());
    let sig = mac.finalize().into_bytes();
    let sig_part = URL_SAFE_NO_PAD.encode(sig);
    Ok(format!("{SESSION_VERSION_V1}.{payload_part}.{sig_part}"))
}

pub fn decode_session(
    token: &str,
    secret: &[u8],
    now: i64,
    max_age_secs: i64,
) -> Result<SessionPayload, SessionError> {
    if token.len() > MAX_SESSION_TOKEN_LEN {
        return Err(SessionError::new(
            SessionErrorCode::InvalidFormat,
            "session token exceeds max length",
        ));
    }
    let mut parts = token.splitn(3, '.');
    let (Some(version), Some(payload_part), Some(sig_part)) =
        (parts.next(), parts.next(), parts.next())
    else {
        return Err(SessionError::new(
            SessionErrorCode::InvalidFormat,
            "session token must be version.payload.signature",
        ));
    };
    if version != SESSION_VERSION_V1 {
        return Err(SessionError::new(
            SessionErrorCode::UnsupportedVersion,
            format!("unsupported session version: {version}"),
        ));
    }

    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| SessionError::new(SessionErrorCode::InvalidPayload, e.to_string()))?;
    mac.update(payload_part.as_bytes());
    let sig = URL_SAFE_NO_PAD
        .decode(sig_part)
        .map_err(|e| SessionError::new(SessionErrorCode::InvalidFormat, e.to_string()))?;
    mac.verify_slice(&sig).map_err(|_| {
        SessionError::new(
            SessionErrorCode::InvalidSignature,
            "session signature mismatch",
        )
    })?;

    let payload_bytes = URL_SAFE_NO_PAD
        .decode(payload_part)
        .map_err(|e| SessionError::new(SessionErrorCode::InvalidFormat, e.to_string()))?;
    let payload: SessionPayload = serde_json::from_slice(&payload_bytes)
        .map_err(|e| SessionError::new(SessionErrorCode::InvalidPayload, e.to_string()))?;

    if payload.session_version != SESSION_VERSION_V1 {
        return Err(SessionError::new(
            SessionErrorCode::UnsupportedVersion,
            format!("unsupported session version: {}", payload.session_version),
        ));
    }
    if payload.issued_at > now || now - payload.issued_at > max_age_secs {
        return Err(SessionError::new(
            SessionErrorCode::Expired,
            "session expired",
        ));
    }
    Ok(payload)
}

/// Fresh random secret for processes started without one configured.
#[must_use]
pub fn random_secret() -> Vec<u8> {
    let mut secret = vec![0_u8; 32];
    OsRng.fill_bytes(&mut secret);
    secret
}

// Unambiguous alphabets: no 0/O or 1/I/L lookalikes.
const CODE_LETTERS: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ";
const CODE_DIGITS: &[u8] = b"23456789";

/// Account verification code: one letter followed by six digits.
#[must_use]
pub fn verification_code() -> String {
    let mut raw = [0_u8; 7];
    OsRng.fill_bytes(&mut raw);
    let mut code = String::with_capacity(7);
    code.push(CODE_LETTERS[raw[0] as usize % CODE_LETTERS.len()] as char);
    for byte in &raw[1..] {
        code.push(CODE_DIGITS[*byte as usize % CODE_DIGITS.len()] as char);
    }
    code
}

#[cfg(test)]
mod auth_tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret";

    #[test]
    fn session_round_trips() {
        let payload = SessionPayload::new(42, 1_000);
        let token = encode_session(&payload, SECRET).unwrap();
        let decoded = decode_session(&token, SECRET, 1_100, 3_600).unwrap();
        assert_eq!(decoded, payload);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let token = encode_session(&SessionPayload::new(42, 1_000), SECRET).unwrap();
        let mut tampered = token.clone();
        tampered.pop();
        tampered.push('A');
        let err = decode_session(&tampered, SECRET, 1_100, 3_600).unwrap_err();
        assert!(matches!(
            err.code,
            SessionErrorCode::InvalidSignature | SessionErrorCode::InvalidFormat
        ));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = encode_session(&SessionPayload::new(42, 1_000), SECRET).unwrap();
        let err = decode_session(&token, b"other-secret", 1_100, 3_600).unwrap_err();
        assert_eq!(err.code, SessionErrorCode::InvalidSignature);
    }

    #[test]
    fn expiry_and_future_issuance_are_rejected() {
        let token = encode_session(&SessionPayload::new(42, 1_000), SECRET).unwrap();
        let err = decode_session(&token, SECRET, 10_000, 3_600).unwrap_err();
        assert_eq!(err.code, SessionErrorCode::Expired);
        let err = decode_session(&token, SECRET, 500, 3_600).unwrap_err();
        assert_eq!(err.code, SessionErrorCode::Expired);
    }

    #[test]
    fn garbage_tokens_are_format_errors() {
        assert_eq!(
            decode_session("nope", SECRET, 0, 3_600).unwrap_err().code,
            SessionErrorCode::InvalidFormat
        );
        assert_eq!(
            decode_session("v2.a.b", SECRET, 0, 3_600).unwrap_err().code,
            SessionErrorCode::UnsupportedVersion
        );
    }

    #[test]
    fn verification_code_shape() {
        for _ in 0..32 {
            let code = verification_code();
            assert_eq!(code.len(), 7);
            let bytes = code.as_bytes();
            assert!(CODE_LETTERS.contains(&bytes[0]));
            assert!(bytes[1..].iter().all(|b| CODE_DIGITS.contains(b)));
        }
    }
}
