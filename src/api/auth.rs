//! Shared Key authentication for Azure Files requests.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;
use url::Url;

use crate::error::{Error, Result};

type HmacSha256 = Hmac<Sha256>;

/// Storage account name and decoded shared key.
#[derive(Clone)]
pub struct SharedKeyCredential {
    account_name: String,
    key: Vec<u8>,
}

impl fmt::Debug for SharedKeyCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedKeyCredential")
            .field("account_name", &self.account_name)
            .field("key", &"<redacted>")
            .finish()
    }
}

impl SharedKeyCredential {
    /// Build a credential from an account name and its base64 account key.
    pub fn new(account_name: &str, account_key: &str) -> Result<Self> {
        if account_name.is_empty() {
            return Err(Error::Credential("account name is empty".to_string()));
        }

        let key = STANDARD
            .decode(account_key.trim())
            .map_err(|e| Error::Credential(format!("account key is not valid base64: {}", e)))?;

        if key.is_empty() {
            return Err(Error::Credential("account key is empty".to_string()));
        }

        Ok(Self {
            account_name: account_name.to_string(),
            key,
        })
    }

    pub fn account_name(&self) -> &str {
        &self.account_name
    }

    /// HMAC-SHA256 of `string_to_sign`, base64 encoded.
    pub fn sign(&self, string_to_sign: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(&self.key).expect("HMAC can take key of any size");
        mac.update(string_to_sign.as_bytes());
        STANDARD.encode(mac.finalize().into_bytes())
    }

    /// Value for the `Authorization` header of a body-less request.
    pub fn authorization(&self, method: &str, url: &Url, ms_headers: &[(String, String)]) -> String {
        let to_sign = string_to_sign(&self.account_name, method, url, ms_headers);
        format!("SharedKey {}:{}", self.account_name, self.sign(&to_sign))
    }
}

/// Build the Shared Key string-to-sign for a request without a body.
///
/// The eleven standard header slots are left empty: requests only carry
/// `x-ms-*` headers, and ranges go through `x-ms-range`.
pub fn string_to_sign(
    account_name: &str,
    method: &str,
    url: &Url,
    ms_headers: &[(String, String)],
) -> String {
    let mut out = String::new();
    out.push_str(method);
    out.push('\n');
    out.push_str(&"\n".repeat(11));
    out.push_str(&canonicalized_headers(ms_headers));
    out.push_str(&canonicalized_resource(account_name, url));
    out
}

fn canonicalized_headers(ms_headers: &[(String, String)]) -> String {
    let mut headers: Vec<(String, &str)> = ms_headers
        .iter()
        .map(|(k, v)| (k.trim().to_lowercase(), v.trim()))
        .filter(|(k, _)| k.starts_with("x-ms-"))
        .collect();
    headers.sort_by(|a, b| a.0.cmp(&b.0));

    headers
        .into_iter()
        .map(|(k, v)| format!("{}:{}\n", k, v))
        .collect()
}

fn canonicalized_resource(account_name: &str, url: &Url) -> String {
    let mut out = format!("/{}{}", account_name, url.path());

    let mut params: Vec<(String, Vec<String>)> = Vec::new();
    for (name, value) in url.query_pairs() {
        let name = name.to_lowercase();
        match params.iter_mut().find(|(n, _)| *n == name) {
            Some((_, values)) => values.push(value.into_owned()),
            None => params.push((name, vec![value.into_owned()])),
        }
    }
    params.sort_by(|a, b| a.0.cmp(&b.0));

    for (name, mut values) in params {
        values.sort();
        out.push_str(&format!("\n{}:{}", name, values.join(",")));
    }
    out
}

/// Format a timestamp for the `x-ms-date` header.
pub fn rfc1123(now: DateTime<Utc>) -> String {
    now.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
