//! URL slug derivation from free text (Latin and Persian).

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

static DISALLOWED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^a-z0-9\x{0600}-\x{06FF}\s-]").expect("slug character class is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlugError {
    #[error("Slug source cannot be empty")]
    EmptySource,
}

/// Derive a lowercase slug from `input`, optionally suffixed with `-YYYY-MM-DD`.
///
/// Spaces are kept; [`build_slug`] turns them into hyphens.
pub fn generate(input: &str, date: Option<NaiveDate>) -> Result<String, SlugError> {
    if input.trim().is_empty() {
        return Err(SlugError::EmptySource);
    }

    let lowered = input.to_lowercase();
    let folded = persian_digits_to_ascii(&strip_diacritics(&lowered));
    let cleaned = DISALLOWED.replace_all(&folded, "");
    let mut slug = cleaned.trim_matches('-').to_string();

    if let Some(date) = date {
        slug.push('-');
        slug.push_str(&date.format("%Y-%m-%d").to_string());
    }
    Ok(slug)
}

/// Pick the explicit slug when it is non-blank, otherwise derive one from
/// `fallback`, then replace spaces with hyphens.
pub fn build_slug(
    explicit: Option<&str>,
    fallback: &str,
    date: Option<NaiveDate>,
) -> Result<String, SlugError> {
    let raw = explicit
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(fallback);
    Ok(generate(raw.trim(), date)?.replace(' ', "-"))
}

fn strip_diacritics(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .nfc()
        .collect()
}

fn persian_digits_to_ascii(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{06F0}'..='\u{06F9}' => {
                char::from_digit(c as u32 - 0x06F0, 10).unwrap_or(c)
            }
            _ => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_input_is_rejected() {
        assert_eq!(generate("", None), Err(SlugError::EmptySource));
        assert_eq!(generate("   \t", None), Err(SlugError::EmptySource));
        assert_eq!(
            SlugError::EmptySource.to_string(),
            "Slug source cannot be empty"
        );
    }

    #[test]
    fn lowercases_and_keeps_spaces() {
        assert_eq!(generate("Ali Karimi", None).unwrap(), "ali karimi");
    }

    #[test]
    fn strips_diacritics() {
        assert_eq!(generate("Café Müller", None).unwrap(), "cafe muller");
        assert_eq!(generate("Gillis Grafström", None).unwrap(), "gillis grafstrom");
    }

    #[test]
    fn removes_punctuation_and_trims_hyphens() {
        assert_eq!(generate("--Hello, World!--", None).unwrap(), "hello world");
        assert_eq!(generate("Iran vs. USA (1998)", None).unwrap(), "iran vs usa 1998");
    }

    #[test]
    fn keeps_persian_letters_and_folds_persian_digits() {
        assert_eq!(generate("رضا۱۲۳", None).unwrap(), "رضا123");
        assert_eq!(generate("علی دایی", None).unwrap(), "علی دایی");
    }

    #[test]
    fn appends_date_suffix() {
        let date = NaiveDate::from_ymd_opt(1998, 6, 21).unwrap();
        assert_eq!(
            generate("Iran vs USA", Some(date)).unwrap(),
            "iran vs usa-1998-06-21"
        );
    }

    #[test]
    fn output_only_contains_allowed_characters() {
        let inputs = ["Zürich 2024!", "ÀÉÎÕÜ & co.", "فوتبال ۲۰۲۴: final", "a_b*c/d"];
        for input in inputs {
            let slug = generate(input, None).unwrap();
            assert!(
                slug.chars().all(|c| c.is_ascii_lowercase()
                    || c.is_ascii_digit()
                    || ('\u{0600}'..='\u{06FF}').contains(&c)
                    || c.is_whitespace()
                    || c == '-'),
                "{input:?} -> {slug:?}"
            );
            assert!(!slug.starts_with('-') && !slug.ends_with('-'));
        }
    }

    #[test]
    fn build_slug_prefers_non_blank_explicit_value() {
        assert_eq!(
            build_slug(Some("My Custom Slug"), "Ignored", None).unwrap(),
            "my-custom-slug"
        );
        assert_eq!(build_slug(Some("  "), "Ice Hockey", None).unwrap(), "ice-hockey");
        assert_eq!(build_slug(None, "  Ice Hockey  ", None).unwrap(), "ice-hockey");
    }

    #[test]
    fn build_slug_with_date() {
        let date = NaiveDate::from_ymd_opt(1928, 2, 19).unwrap();
        assert_eq!(
            build_slug(None, "Canada routs Switzerland", Some(date)).unwrap(),
            "canada-routs-switzerland-1928-02-19"
        );
    }

    #[test]
    fn build_slug_propagates_empty_source() {
        assert_eq!(build_slug(None, " ", None), Err(SlugError::EmptySource));
    }
}
