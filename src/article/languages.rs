//! Language codes, display names and script direction

use serde::{Deserialize, Serialize};

/// An entry in the article language picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageOption {
    pub code: String,
    pub display_name: String,
}

impl LanguageOption {
    pub fn new(code: &str) -> Self {
        Self {
            code: code.to_string(),
            display_name: language_name(code).to_string(),
        }
    }

    pub fn is_rtl(&self) -> bool {
        is_rtl(&self.code)
    }
}

/// English names for Wikipedia language codes, sorted by code
const LANGUAGE_NAMES: &[(&str, &str)] = &[
    ("af", "Afrikaans"),
    ("am", "Amharic"),
    ("ar", "Arabic"),
    ("arz", "Egyptian Arabic"),
    ("ast", "Asturian"),
    ("az", "Azerbaijani"),
    ("azb", "South Azerbaijani"),
    ("be", "Belarusian"),
    ("be-tarask", "Belarusian (Taraškievica)"),
    ("bg", "Bulgarian"),
    ("bn", "Bangla"),
    ("br", "Breton"),
    ("bs", "Bosnian"),
    ("ca", "Catalan"),
    ("ce", "Chechen"),
    ("ceb", "Cebuano"),
    ("ckb", "Central Kurdish"),
    ("cs", "Czech"),
    ("cy", "Welsh"),
    ("da", "Danish"),
    ("de", "German"),
    ("el", "Greek"),
    ("en", "English"),
    ("eo", "Esperanto"),
    ("es", "Spanish"),
    ("et", "Estonian"),
    ("eu", "Basque"),
    ("fa", "Persian"),
    ("fi", "Finnish"),
    ("fr", "French"),
    ("fy", "Western Frisian"),
    ("ga", "Irish"),
    ("gl", "Galician"),
    ("gu", "Gujarati"),
    ("he", "Hebrew"),
    ("hi", "Hindi"),
    ("hr", "Croatian"),
    ("ht", "Haitian Creole"),
    ("hu", "Hungarian"),
    ("hy", "Armenian"),
    ("id", "Indonesian"),
    ("is", "Icelandic"),
    ("it", "Italian"),
    ("ja", "Japanese"),
    ("ka", "Georgian"),
    ("kk", "Kazakh"),
    ("km", "Khmer"),
    ("kn", "Kannada"),
    ("ko", "Korean"),
    ("ku", "Kurdish"),
    ("ky", "Kyrgyz"),
    ("la", "Latin"),
    ("lb", "Luxembourgish"),
    ("lt", "Lithuanian"),
    ("lv", "Latvian"),
    ("mk", "Macedonian"),
    ("ml", "Malayalam"),
    ("mn", "Mongolian"),
    ("mr", "Marathi"),
    ("ms", "Malay"),
    ("my", "Burmese"),
    ("mzn", "Mazanderani"),
    ("ne", "Nepali"),
    ("nl", "Dutch"),
    ("nn", "Norwegian Nynorsk"),
    ("no", "Norwegian"),
    ("oc", "Occitan"),
    ("pa", "Punjabi"),
    ("pl", "Polish"),
    ("pnb", "Western Punjabi"),
    ("ps", "Pashto"),
    ("pt", "Portuguese"),
    ("ro", "Romanian"),
    ("ru", "Russian"),
    ("sd", "Sindhi"),
    ("sh", "Serbo-Croatian"),
    ("si", "Sinhala"),
    ("simple", "Simple English"),
    ("sk", "Slovak"),
    ("sl", "Slovenian"),
    ("sq", "Albanian"),
    ("sr", "Serbian"),
    ("sv", "Swedish"),
    ("sw", "Swahili"),
    ("ta", "Tamil"),
    ("te", "Telugu"),
    ("tg", "Tajik"),
    ("th", "Thai"),
    ("tl", "Tagalog"),
    ("tr", "Turkish"),
    ("tt", "Tatar"),
    ("ug", "Uyghur"),
    ("uk", "Ukrainian"),
    ("ur", "Urdu"),
    ("uz", "Uzbek"),
    ("vi", "Vietnamese"),
    ("war", "Waray"),
    ("yi", "Yiddish"),
    ("yo", "Yoruba"),
    ("zh", "Chinese"),
    ("zh-min-nan", "Min Nan Chinese"),
    ("zh-yue", "Cantonese"),
];

/// Scripts written right to left; `fa-*` regional variants are matched by prefix
const RTL_LANGUAGES: &[&str] = &[
    "ar", "arz", "azb", "ckb", "dv", "fa", "glk", "he", "ks", "mzn", "pnb", "ps", "sd", "ug",
    "ur", "yi",
];

/// English display name for a language code, or the code itself when unknown
pub fn language_name(code: &str) -> &str {
    LANGUAGE_NAMES
        .binary_search_by(|(known, _)| known.cmp(&code))
        .map(|idx| LANGUAGE_NAMES[idx].1)
        .unwrap_or(code)
}

/// Lowercase ASCII letters, digits and hyphens only, as in Wikipedia subdomains
pub fn is_valid_code(code: &str) -> bool {
    !code.is_empty()
        && code
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

pub fn is_rtl(code: &str) -> bool {
    RTL_LANGUAGES.contains(&code) || code.starts_with("fa-")
}

/// Build the picker list from cross-language link codes
///
/// Duplicate codes keep their first occurrence. The current language always
/// appears exactly once; it is prepended when the links don't mention it.
pub fn build_language_options<'a, I>(link_codes: I, current: &str) -> Vec<LanguageOption>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut options: Vec<LanguageOption> = Vec::new();
    for code in link_codes {
        let code = code.trim();
        if code.is_empty() || options.iter().any(|o| o.code == code) {
            continue;
        }
        options.push(LanguageOption::new(code));
    }

    if !options.iter().any(|o| o.code == current) {
        options.insert(0, LanguageOption::new(current));
    }
    options
}

/// Case-insensitive match on display name or code
pub fn filter_languages<'a>(options: &'a [LanguageOption], query: &str) -> Vec<&'a LanguageOption> {
    let query = query.trim().to_lowercase();
    options
        .iter()
        .filter(|o| {
            o.display_name.to_lowercase().contains(&query) || o.code.to_lowercase().contains(&query)
        })
        .collect()
}
