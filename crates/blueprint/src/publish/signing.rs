//! HMAC request signing for the Structurizr API.
//!
//! The signed message is the newline-terminated concatenation of the HTTP
//! method, the request path, the hex MD5 of the body, the content type and
//! the nonce. Both the MD5 and the HMAC travel as base64 of their hex form.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use md5::{Digest, Md5};
use sha2::Sha256;

use crate::publish::PublishError;

type HmacSha256 = Hmac<Sha256>;

/// The parts of a request covered by the signature.
#[derive(Debug, Clone, Copy)]
pub struct SignedRequest<'a> {
    pub method: &'a str,
    pub path: &'a str,
    pub body: &'a str,
    pub content_type: &'a str,
    pub nonce: &'a str,
}

/// Header values produced by [`sign`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// Value of the `Content-MD5` header.
    pub content_md5: String,
    /// Value of the `X-Authorization` header.
    pub authorization: String,
}

pub fn md5_hex(body: &str) -> String {
    hex::encode(Md5::digest(body.as_bytes()))
}

/// Signs `request` with the given key pair.
///
/// # Errors
///
/// Returns [`PublishError::Signing`] if the secret is rejected as an HMAC key.
pub fn sign(
    api_key: &str,
    secret_key: &str,
    request: &SignedRequest<'_>,
) -> Result<Signature, PublishError> {
    let body_md5 = md5_hex(request.body);
    let content = format!(
        "{}\n{}\n{}\n{}\n{}\n",
        request.method, request.path, body_md5, request.content_type, request.nonce
    );

    let mut mac = HmacSha256::new_from_slice(secret_key.as_bytes())
        .map_err(|err| PublishError::Signing(err.to_string()))?;
    mac.update(content.as_bytes());
    let digest = hex::encode(mac.finalize().into_bytes());

    Ok(Signature {
        content_md5: STANDARD.encode(&body_md5),
        authorization: format!("{api_key}:{}", STANDARD.encode(&digest)),
    })
}
