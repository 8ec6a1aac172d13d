//! Supported UI languages.
//!
//! The set is closed: anything the host or the user hands us is coerced into
//! one of these codes, with English as the permanent fallback.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A supported UI language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    En,
    Ru,
    Uz,
    Fa,
}

impl Lang {
    /// The fallback language whose table backs every lookup.
    pub const DEFAULT: Lang = Lang::En;

    /// Every supported language, in picker order.
    pub const ALL: [Lang; 4] = [Lang::En, Lang::Ru, Lang::Uz, Lang::Fa];

    /// Two-letter code, also the table file stem.
    pub fn code(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ru => "ru",
            Self::Uz => "uz",
            Self::Fa => "fa",
        }
    }

    /// Whether the language is written right-to-left.
    pub fn is_rtl(&self) -> bool {
        matches!(self, Self::Fa)
    }

    /// Coerce an arbitrary locale tag into a supported language.
    ///
    /// `None`, empty, and unknown tags all map to [`Lang::DEFAULT`];
    /// `"ru-RU"` and `"RU_ru"` both map to [`Lang::Ru`].
    pub fn normalize(tag: Option<&str>) -> Lang {
        let Some(tag) = tag else {
            return Self::DEFAULT;
        };
        primary_tag(tag).parse().unwrap_or(Self::DEFAULT)
    }
}

/// Lower-cased primary subtag of a locale (`"fa-IR"` → `"fa"`).
pub fn primary_tag(tag: &str) -> String {
    tag.trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Returned by [`Lang::from_str`] for codes outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported language: {0}")]
pub struct UnsupportedLang(pub String);

impl FromStr for Lang {
    type Err = UnsupportedLang;

    /// Strict parse of an exact code. Use [`Lang::normalize`] for locale tags.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Self::En),
            "ru" => Ok(Self::Ru),
            "uz" => Ok(Self::Uz),
            "fa" => Ok(Self::Fa),
            other => Err(UnsupportedLang(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_region() {
        assert_eq!(Lang::normalize(Some("ru-RU")), Lang::Ru);
        assert_eq!(Lang::normalize(Some("fa_IR")), Lang::Fa);
        assert_eq!(Lang::normalize(Some("UZ")), Lang::Uz);
    }

    #[test]
    fn test_normalize_unknown_and_absent_fall_back() {
        assert_eq!(Lang::normalize(None), Lang::DEFAULT);
        assert_eq!(Lang::normalize(Some("")), Lang::DEFAULT);
        assert_eq!(Lang::normalize(Some("xx")), Lang::DEFAULT);
        assert_eq!(Lang::normalize(Some("-RU")), Lang::DEFAULT);
    }

    #[test]
    fn test_from_str_is_strict() {
        assert_eq!("fa".parse::<Lang>(), Ok(Lang::Fa));
        assert!("FA".parse::<Lang>().is_err());
        assert!("fa-IR".parse::<Lang>().is_err());
    }

    #[test]
    fn test_unsupported_lang_error() {
        let err = "de".parse::<Lang>().unwrap_err();
        assert_eq!(err, UnsupportedLang("de".to_string()));
        assert_eq!(err.to_string(), "unsupported language: de");
        let boxed: Box<dyn std::error::Error> = Box::new(err);
        assert_eq!(boxed.to_string(), "unsupported language: de");
    }

    #[test]
    fn test_only_persian_is_rtl() {
        let rtl: Vec<Lang> = Lang::ALL.into_iter().filter(Lang::is_rtl).collect();
        assert_eq!(rtl, vec![Lang::Fa]);
    }

    #[test]
    fn test_serde_uses_codes() {
        assert_eq!(serde_json::to_string(&Lang::Uz).unwrap(), "\"uz\"");
        let parsed: Lang = serde_json::from_str("\"ru\"").unwrap();
        assert_eq!(parsed, Lang::Ru);
    }
}
