//! PS3 system language from the frontend language.

/// Frontend option holding the UI locale (`fr_FR`, `pt_BR`, ...).
pub const FRONTEND_LANGUAGE: &str = "Language";

const LANGUAGES: &[(&str, &str)] = &[
    ("en", "English (US)"),
    ("fr", "French"),
    ("de", "German"),
    ("zh", "Chinese (Simplified)"),
    ("nl", "Dutch"),
    ("es", "Spanish"),
    ("fi", "Finnish"),
    ("it", "Italian"),
    ("jp", "Japanese"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("pl", "Polish"),
    ("pt", "Portuguese (Portugal)"),
    ("ru", "Russian"),
    ("sv", "Swedish"),
    ("tr", "Turkish"),
    ("nn", "Norwegian"),
    ("nb", "Norwegian"),
];

const FALLBACK: &str = "English (US)";

/// System language RPCS3 should use when `ps3_language` is not set.
pub fn default_ps3_language(frontend: Option<&str>) -> &'static str {
    let Some(locale) = frontend.map(str::trim).filter(|l| !l.is_empty()) else {
        return FALLBACK;
    };

    match locale {
        "zh_TW" => return "Chinese (Traditional)",
        "pt_BR" => return "Portuguese (Brazil)",
        "en_GB" => return "English (UK)",
        _ => {}
    }

    let prefix = locale
        .split(['_', '-'])
        .next()
        .unwrap_or(locale)
        .to_ascii_lowercase();
    LANGUAGES
        .iter()
        .find(|(code, _)| *code == prefix)
        .map(|(_, name)| *name)
        .unwrap_or(FALLBACK)
}
