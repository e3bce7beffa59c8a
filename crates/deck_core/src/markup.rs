//! Text helpers for catalog strings
//!
//! Card text in the catalog carries inline markup (`<b>`, `<i>`, `[x]`
//! layout hints) and upper-case enumerator tokens that need cleaning
//! before they are shown to a reader.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

const LAYOUT_MARKER: &str = "[x]";

/// Remove markup tags and `[x]` markers, then collapse whitespace
///
/// Removal repeats until nothing changes, so text such as `[[x]x]` is
/// fully cleaned and applying the function twice gives the same result.
pub fn strip_markup(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let without_tags = TAG_RE.replace_all(&current, "");
        let next = match without_tags {
            Cow::Borrowed(s) if !s.contains(LAYOUT_MARKER) => break,
            other => other.replace(LAYOUT_MARKER, ""),
        };
        if next == current {
            break;
        }
        current = next;
    }

    WHITESPACE_RE.replace_all(&current, " ").trim().to_string()
}

/// Title-case a token: the first letter of every alphabetic run is upper-case,
/// the rest lower-case (`HERO_POWER` -> `Hero_Power`, `DEMON HUNTER` -> `Demon Hunter`)
pub fn title_case(token: &str) -> String {
    let mut result = String::with_capacity(token.len());
    let mut previous_is_letter = false;
    for ch in token.chars() {
        if ch.is_alphabetic() {
            if previous_is_letter {
                result.extend(ch.to_lowercase());
            } else {
                result.extend(ch.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            result.push(ch);
            previous_is_letter = false;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_markup_removes_tags() {
        let text = "<b>Battlecry:</b> Deal $3 damage.";
        assert_eq!(strip_markup(text), "Battlecry: Deal $3 damage.");
    }

    #[test]
    fn test_strip_markup_removes_layout_marker_and_whitespace() {
        let text = "[x]<b>Taunt</b>\n  Whenever this\ntakes damage,   gain +1 Attack.  ";
        assert_eq!(
            strip_markup(text),
            "Taunt Whenever this takes damage, gain +1 Attack."
        );
    }

    #[test]
    fn test_strip_markup_is_idempotent() {
        let samples = [
            "",
            "   ",
            "plain text",
            "<b>Rush</b>. <i>Deathrattle:</i> summon a 2/2.",
            "[[x]x]nested marker",
            "[<i></i>x]tag inside marker",
            "a < b and c > d",
            "line\nbreak\ttab",
        ];
        for sample in samples {
            let once = strip_markup(sample);
            assert_eq!(strip_markup(&once), once, "not idempotent for {:?}", sample);
        }
    }

    #[test]
    fn test_strip_markup_nested_marker() {
        assert_eq!(strip_markup("[[x]x]Discover"), "Discover");
        assert_eq!(strip_markup("[<i></i>x]Discover"), "Discover");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("MINION"), "Minion");
        assert_eq!(title_case("HERO_POWER"), "Hero_Power");
        assert_eq!(title_case("DEMON HUNTER"), "Demon Hunter");
        assert_eq!(title_case("?"), "?");
        assert_eq!(title_case(""), "");
    }
}
