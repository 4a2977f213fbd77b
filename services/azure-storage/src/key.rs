use quick_xml::{de, se};
use sassign_core::time::{format_rfc3339, parse_rfc3339, DateTime};
use sassign_core::utils::Redact;
use sassign_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// The storage service a delegation key was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignedService {
    /// Blob, `b`.
    Blob,
    /// Blob version, `bv`.
    BlobVersion,
    /// Blob snapshot, `bs`.
    BlobSnapshot,
    /// Container, `c`.
    Container,
    /// Directory, `d`.
    Directory,
}

impl SignedService {
    /// The short code used on the wire and in the string-to-sign.
    pub fn as_str(&self) -> &'static str {
        match self {
            SignedService::Blob => "b",
            SignedService::BlobVersion => "bv",
            SignedService::BlobSnapshot => "bs",
            SignedService::Container => "c",
            SignedService::Directory => "d",
        }
    }
}

impl Display for SignedService {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignedService {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "b" => Ok(SignedService::Blob),
            "bv" => Ok(SignedService::BlobVersion),
            "bs" => Ok(SignedService::BlobSnapshot),
            "c" => Ok(SignedService::Container),
            "d" => Ok(SignedService::Directory),
            v => Err(Error::credential_invalid(format!(
                "unknown signed service code: {v}"
            ))),
        }
    }
}

/// UserDelegationKey is the signing key issued by the storage service.
///
/// It is only valid within `[signed_start, signed_expiry]`, which the
/// service enforces when it verifies a signature made with it.
#[derive(Clone, PartialEq, Eq)]
pub struct UserDelegationKey {
    /// Base64 encoded key material.
    pub value: String,
    /// Object id of the identity the key was issued to.
    pub signed_oid: String,
    /// Tenant id of the identity the key was issued to.
    pub signed_tid: String,
    /// Start of the key's validity window.
    pub signed_start: DateTime,
    /// End of the key's validity window.
    pub signed_expiry: DateTime,
    /// Service the key was issued for.
    pub signed_service: SignedService,
    /// Storage API version the key was issued under.
    pub signed_version: String,
}

impl Debug for UserDelegationKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserDelegationKey")
            .field("value", &Redact::from(&self.value))
            .field("signed_oid", &self.signed_oid)
            .field("signed_tid", &self.signed_tid)
            .field("signed_start", &self.signed_start)
            .field("signed_expiry", &self.signed_expiry)
            .field("signed_service", &self.signed_service)
            .field("signed_version", &self.signed_version)
            .finish()
    }
}

impl UserDelegationKey {
    /// Parse the `UserDelegationKey` document returned by the service.
    pub fn from_xml(content: &str) -> Result<Self> {
        let resp: UserDelegationKeyResponse = de::from_str(content).map_err(|e| {
            Error::credential_invalid("failed to parse user delegation key response")
                .with_source(e)
        })?;

        let parse_time = |v: &str| {
            parse_rfc3339(v).map_err(|e| {
                Error::credential_invalid("invalid timestamp in user delegation key")
                    .with_source(e)
            })
        };

        Ok(Self {
            signed_start: parse_time(&resp.signed_start)?,
            signed_expiry: parse_time(&resp.signed_expiry)?,
            signed_service: resp.signed_service.parse()?,
            value: resp.value,
            signed_oid: resp.signed_oid,
            signed_tid: resp.signed_tid,
            signed_version: resp.signed_version,
        })
    }
}

// Every element is required, a missing one fails the parse.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct UserDelegationKeyResponse {
    signed_oid: String,
    signed_tid: String,
    signed_start: String,
    signed_expiry: String,
    signed_service: String,
    signed_version: String,
    value: String,
}

#[derive(Debug, Serialize)]
#[serde(rename = "KeyInfo", rename_all = "PascalCase")]
struct KeyInfo {
    start: String,
    expiry: String,
}

/// Build the body of a delegation key request for the given window.
pub(crate) fn key_info_xml(start: DateTime, expiry: DateTime) -> Result<String> {
    let key_info = KeyInfo {
        start: format_rfc3339(start),
        expiry: format_rfc3339(expiry),
    };
    let body = se::to_string(&key_info).map_err(|e| {
        Error::request_invalid("failed to serialize key info").with_source(e)
    })?;

    Ok(format!(r#"<?xml version="1.0" encoding="utf-8"?>{body}"#))
}
