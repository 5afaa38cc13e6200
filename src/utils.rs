// Extracts the token from an `Authorization: Bearer <token>` header value, if present
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    let value = header?.trim();
    // The scheme is case-insensitive
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}
