//! Anti-forgery token lookup over a `Cookie`-style string.

/// Name of the cookie carrying the anti-forgery token.
pub const CSRF_COOKIE: &str = "csrftoken";

/// Header the backend expects the anti-forgery token in.
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Look up `name` in a `;`-separated cookie string.
///
/// Each segment is trimmed and must start with exactly `name=`. The first
/// match wins and its value is percent-decoded. Returns `None` when the
/// string is empty or no segment matches.
pub fn get_cookie(cookies: &str, name: &str) -> Option<String> {
    if cookies.is_empty() {
        return None;
    }
    let prefix = format!("{name}=");
    cookies
        .split(';')
        .map(str::trim)
        .find_map(|segment| segment.strip_prefix(prefix.as_str()))
        .map(percent_decode)
}

/// Decode `%XX` escapes as UTF-8.
///
/// A value with a malformed escape or an invalid UTF-8 byte sequence is
/// returned unchanged. `+` is not treated as a space.
pub fn percent_decode(raw: &str) -> String {
    decode_escapes(raw).unwrap_or_else(|| raw.to_string())
}

fn decode_escapes(raw: &str) -> Option<String> {
    if !raw.contains('%') {
        return Some(raw.to_string());
    }
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes.get(i + 1..i + 3)?;
            let hi = hex_value(hex[0])?;
            let lo = hex_value(hex[1])?;
            out.push(hi << 4 | lo);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_cookie_among_several() {
        let jar = "sessionid=abc; csrftoken=tok123; theme=dark";
        assert_eq!(get_cookie(jar, "csrftoken"), Some("tok123".to_string()));
        assert_eq!(get_cookie(jar, "sessionid"), Some("abc".to_string()));
        assert_eq!(get_cookie(jar, "theme"), Some("dark".to_string()));
    }

    #[test]
    fn missing_cookie_is_none() {
        assert_eq!(get_cookie("a=1; b=2", "csrftoken"), None);
        assert_eq!(get_cookie("", "csrftoken"), None);
    }

    #[test]
    fn requires_exact_name_prefix() {
        // `xcsrftoken` and `csrftoken2` must not match `csrftoken`
        let jar = "xcsrftoken=bad; csrftoken2=bad2; csrftoken=good";
        assert_eq!(get_cookie(jar, "csrftoken"), Some("good".to_string()));
    }

    #[test]
    fn first_match_wins() {
        assert_eq!(get_cookie("k=1; k=2", "k"), Some("1".to_string()));
    }

    #[test]
    fn decodes_percent_encoded_values() {
        let jar = "name=J%C3%BCrgen%20M; other=x";
        assert_eq!(get_cookie(jar, "name"), Some("Jürgen M".to_string()));
    }

    #[test]
    fn empty_value_is_present() {
        assert_eq!(get_cookie("csrftoken=; a=b", "csrftoken"), Some(String::new()));
    }

    #[test]
    fn malformed_escape_is_left_as_is() {
        assert_eq!(percent_decode("100%"), "100%");
        assert_eq!(percent_decode("%zz"), "%zz");
        assert_eq!(percent_decode("%FF"), "%FF");
    }

    #[test]
    fn plus_is_not_a_space() {
        assert_eq!(percent_decode("a+b"), "a+b");
    }
}
