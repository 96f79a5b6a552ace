/// Languages the AgriGuide backend can answer in, as `(code, name)` pairs.
///
/// Mirrors the list served by `GET /api/languages/`; used to populate the
/// selector when the page is built offline.
pub const SUPPORTED: &[(&str, &str)] = &[
    ("en", "English"),
    ("hi", "Hindi"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("de", "German"),
    ("it", "Italian"),
    ("pt", "Portuguese"),
    ("ru", "Russian"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("zh", "Chinese"),
    ("ar", "Arabic"),
    ("bn", "Bengali"),
    ("ta", "Tamil"),
    ("te", "Telugu"),
    ("ml", "Malayalam"),
    ("kn", "Kannada"),
    ("gu", "Gujarati"),
    ("pa", "Punjabi"),
    ("or", "Odia"),
    ("as", "Assamese"),
    ("ne", "Nepali"),
    ("si", "Sinhala"),
    ("my", "Burmese"),
    ("th", "Thai"),
    ("vi", "Vietnamese"),
    ("id", "Indonesian"),
    ("ms", "Malay"),
    ("tl", "Filipino"),
];

/// Language used when no selector is present.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Display name for a language code, if it is one the backend advertises.
pub fn name_for(code: &str) -> Option<&'static str> {
    SUPPORTED
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_and_unknown_codes() {
        assert_eq!(name_for("hi"), Some("Hindi"));
        assert_eq!(name_for("tl"), Some("Filipino"));
        assert_eq!(name_for("xx"), None);
    }

    #[test]
    fn codes_are_unique() {
        let mut codes: Vec<&str> = SUPPORTED.iter().map(|(c, _)| *c).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), SUPPORTED.len());
    }
}
