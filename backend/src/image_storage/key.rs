//! Object key layout and retrieval URL derivation
//!
//! Every image lives under the flat `uploads/` prefix with a key of the form
//! `uploads/<millis>-<originalFileName>`. External tools read the bucket
//! directly, so this layout must not change.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Prefix under which all gallery objects are stored
pub const UPLOADS_PREFIX: &str = "uploads/";

/// Characters escaped when a key is placed in a URL path. `/` is kept so the
/// key's segments stay readable.
const KEY_PATH: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

/// Builds the object key for a new upload
#[must_use]
pub fn new_upload_key(timestamp_millis: i64, original_name: &str) -> String {
    format!("{UPLOADS_PREFIX}{timestamp_millis}-{original_name}")
}

/// Derives the presentation name from a full object key
///
/// Strips the `uploads/` prefix and the leading `<millis>-` segment. Keys that
/// don't follow the layout are returned with only the prefix removed.
#[must_use]
pub fn display_name(key: &str) -> &str {
    let name = key.strip_prefix(UPLOADS_PREFIX).unwrap_or(key);

    match name.split_once('-') {
        Some((millis, rest))
            if !millis.is_empty()
                && !rest.is_empty()
                && millis.bytes().all(|b| b.is_ascii_digit()) =>
        {
            rest
        }
        _ => name,
    }
}

/// Percent-encodes a key for use in a URL path
#[must_use]
pub fn encode_key(key: &str) -> String {
    utf8_percent_encode(key, KEY_PATH).to_string()
}

/// Reduces a client supplied file name to its final path component
///
/// Some browsers send the full local path of the selected file.
#[must_use]
pub fn sanitize_file_name(file_name: &str) -> &str {
    file_name
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(file_name)
        .trim()
}

/// Computes the public retrieval URL of an object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectUrlBuilder {
    base: String,
}

impl ObjectUrlBuilder {
    /// AWS virtual-hosted style: `https://<bucket>.s3.<region>.amazonaws.com/<key>`
    #[must_use]
    pub fn virtual_hosted(bucket_name: &str, region: &str) -> Self {
        Self {
            base: format!("https://{bucket_name}.s3.{region}.amazonaws.com/"),
        }
    }

    /// Path style against a custom endpoint: `<endpoint>/<bucket>/<key>`
    #[must_use]
    pub fn path_style(endpoint_url: &str, bucket_name: &str) -> Self {
        Self {
            base: format!("{}/{bucket_name}/", endpoint_url.trim_end_matches('/')),
        }
    }

    /// Returns the URL of the object stored under `key`
    #[must_use]
    pub fn url_for(&self, key: &str) -> String {
        format!("{}{}", self.base, encode_key(key))
    }
}
