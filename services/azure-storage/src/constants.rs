use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};

// Headers used in azure services.
pub const X_MS_VERSION: &str = "x-ms-version";

/// Storage REST API version used for the delegation key request.
pub const STORAGE_SERVICE_VERSION: &str = "2022-11-02";

// Env values used in azure services.
pub const AZURE_TENANT_ID: &str = "AZURE_TENANT_ID";
pub const AZURE_CLIENT_ID: &str = "AZURE_CLIENT_ID";
pub const AZURE_CLIENT_SECRET: &str = "AZURE_CLIENT_SECRET";
pub const AZURE_AUTHORITY_HOST: &str = "AZURE_AUTHORITY_HOST";
pub const AZURE_STORAGE_ACCOUNT_NAME: &str = "AZURE_STORAGE_ACCOUNT_NAME";
pub const AZURE_STORAGE_ACCOUNT_URL: &str = "AZURE_STORAGE_ACCOUNT_URL";

pub const AZURE_PUBLIC_CLOUD: &str = "https://login.microsoftonline.com";
pub const STORAGE_SCOPE: &str = "https://storage.azure.com/.default";

/// The only protocol we issue signatures for.
pub const SAS_PROTOCOL: &str = "https";

/// Unreserved characters of RFC 3986 stay as is, everything else is escaped.
pub static AZURE_QUERY_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Same as [`AZURE_QUERY_ENCODE_SET`] but keeps `/` between path segments.
pub static AZURE_PATH_ENCODE_SET: AsciiSet = AZURE_QUERY_ENCODE_SET.remove(b'/');
