use base64ct::{Base64, Encoding};

/// Builds the `Authorization` header value for HTTP Basic auth.
///
/// Credentials are joined as `username:password` and encoded with the
/// standard, padded base64 alphabet. Control characters are not rejected.
pub fn basic_auth_header(username: &str, password: &str) -> String {
    let credentials = format!("{}:{}", username, password);
    format!("Basic {}", Base64::encode_string(credentials.as_bytes()))
}
