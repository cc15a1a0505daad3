//! Plural form selection.
//!
//! A [`Plural`] strategy maps a count to the index of the grammatical form
//! to use and reports how many forms the language has. Indices follow the
//! gettext convention: index 0 is the singular (or only) form.

use std::fmt;

/// Pluralization strategy consumed by the [`Translator`](crate::Translator).
///
/// Implementations must be pure: the same count always yields the same
/// index, and that index is always `< plurals_count()`.
pub trait Plural: fmt::Debug + Send + Sync {
    /// Index of the plural form to use for `count`.
    fn plural(&self, count: i64) -> usize;

    /// Number of distinct plural forms, at least 1.
    fn plurals_count(&self) -> usize;
}

/// Built-in plural rules covering the common language families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluralRule {
    /// One form only (Japanese, Chinese, Korean, Vietnamese, Thai...).
    Single,
    /// `1` is singular, everything else plural (English, German, Spanish...).
    English,
    /// `0` and `1` are singular (French, Brazilian Portuguese, Hindi).
    French,
    /// `1`, `2..=4`, everything else (Czech, Slovak).
    Czech,
    /// Three forms by the last digits: 1/21/31, 2-4/22-24, rest (Russian, Ukrainian...).
    Russian,
    /// Like Russian, but only exactly `1` takes the singular.
    Polish,
    /// Six forms: 0, 1, 2, 3-10, 11-99, rest (by the last two digits).
    Arabic,
}

impl PluralRule {
    /// All built-in rules.
    pub const ALL: &'static [Self] = &[
        Self::Single,
        Self::English,
        Self::French,
        Self::Czech,
        Self::Russian,
        Self::Polish,
        Self::Arabic,
    ];

    /// Select the rule for a locale tag (`"en"`, `"pt-BR"`, `"ru_RU.UTF-8"`).
    ///
    /// Falls back to [`PluralRule::English`] for unknown languages.
    #[must_use]
    pub fn for_locale(locale: &str) -> Self {
        let mut subtags = locale.split(['-', '_', '.']);
        let language = subtags.next().unwrap_or_default().to_ascii_lowercase();
        let region = subtags.next().unwrap_or_default().to_ascii_uppercase();

        match (language.as_str(), region.as_str()) {
            ("pt", "BR") => Self::French,
            ("ja" | "zh" | "ko" | "vi" | "th" | "id" | "ms" | "tr" | "fa" | "ka", _) => Self::Single,
            ("fr" | "hi" | "bn" | "am", _) => Self::French,
            ("cs" | "sk", _) => Self::Czech,
            ("ru" | "uk" | "be" | "sr" | "hr" | "bs", _) => Self::Russian,
            ("pl", _) => Self::Polish,
            ("ar", _) => Self::Arabic,
            _ => Self::English,
        }
    }

    /// Parse the name used in configuration files (`"english"`, `"czech"`...).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|rule| rule.name().eq_ignore_ascii_case(name))
    }

    /// Configuration name of the rule.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::English => "english",
            Self::French => "french",
            Self::Czech => "czech",
            Self::Russian => "russian",
            Self::Polish => "polish",
            Self::Arabic => "arabic",
        }
    }
}

impl fmt::Display for PluralRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Plural for PluralRule {
    fn plural(&self, count: i64) -> usize {
        let n = count.unsigned_abs();
        match self {
            Self::Single => 0,
            Self::English => usize::from(n != 1),
            Self::French => usize::from(n > 1),
            Self::Czech => match n {
                1 => 0,
                2..=4 => 1,
                _ => 2,
            },
            Self::Russian => {
                if n % 10 == 1 && n % 100 != 11 {
                    0
                } else if is_few(n) {
                    1
                } else {
                    2
                }
            }
            Self::Polish => {
                if n == 1 {
                    0
                } else if is_few(n) {
                    1
                } else {
                    2
                }
            }
            Self::Arabic => match (n, n % 100) {
                (0, _) => 0,
                (1, _) => 1,
                (2, _) => 2,
                (_, 3..=10) => 3,
                (_, 11..=99) => 4,
                _ => 5,
            },
        }
    }

    fn plurals_count(&self) -> usize {
        match self {
            Self::Single => 1,
            Self::English | Self::French => 2,
            Self::Czech | Self::Russian | Self::Polish => 3,
            Self::Arabic => 6,
        }
    }
}

/// Slavic "few": last digit 2-4, except 12-14.
const fn is_few(n: u64) -> bool {
    matches!(n % 10, 2..=4) && !matches!(n % 100, 12..=14)
}
