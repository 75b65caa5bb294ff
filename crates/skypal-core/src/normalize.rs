#![forbid(unsafe_code)]

//! Text normalization for script-insensitive matching.
//!
//! [`normalize`] maps a string to a canonical comparable form:
//!
//! 1. Unicode NFKC, which folds half-width katakana and full-width Latin into
//!    their ordinary forms.
//! 2. Full Unicode lowercasing.
//! 3. Katakana to hiragana.
//!
//! Everything else passes through untouched. The function is total and
//! idempotent: `normalize(&normalize(s)) == normalize(s)`.

use unicode_normalization::UnicodeNormalization;

/// Offset between a katakana code point and its hiragana counterpart.
const KANA_OFFSET: u32 = 0x60;

/// Canonical comparable form of `s`.
#[must_use]
pub fn normalize(s: &str) -> String {
    s.nfkc()
        .flat_map(char::to_lowercase)
        .map(katakana_to_hiragana)
        .collect()
}

/// Fold a single katakana character to hiragana.
///
/// Covers ァ..=ヶ and the iteration marks ヽ/ヾ. Characters without a hiragana
/// counterpart (ヷ..ヺ, the prolonged sound mark ー) are returned unchanged.
#[must_use]
pub fn katakana_to_hiragana(c: char) -> char {
    match c {
        '\u{30A1}'..='\u{30F6}' | '\u{30FD}' | '\u{30FE}' => {
            char::from_u32(c as u32 - KANA_OFFSET).unwrap_or(c)
        }
        _ => c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_in_empty_out() {
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn latin_is_lowercased() {
        assert_eq!(normalize("App Passwords"), "app passwords");
        assert_eq!(normalize("SET"), "set");
    }

    #[test]
    fn katakana_folds_to_hiragana() {
        assert_eq!(normalize("ホーム"), "ほーむ");
        assert_eq!(normalize("チャット"), "ちゃっと");
        assert_eq!(normalize("フィード"), "ふぃーど");
    }

    #[test]
    fn hiragana_and_kanji_pass_through() {
        assert_eq!(normalize("ほーむ"), "ほーむ");
        assert_eq!(normalize("検索"), "検索");
        assert_eq!(normalize("保存済み"), "保存済み");
    }

    #[test]
    fn half_width_katakana_matches_full_width() {
        assert_eq!(normalize("ﾎｰﾑ"), normalize("ホーム"));
    }

    #[test]
    fn full_width_latin_folds() {
        assert_eq!(normalize("ＳＥＴ"), "set");
    }

    #[test]
    fn mixed_script() {
        assert_eq!(normalize("Chat チャット"), "chat ちゃっと");
    }

    #[test]
    fn iteration_marks_fold() {
        assert_eq!(katakana_to_hiragana('ヽ'), 'ゝ');
        assert_eq!(katakana_to_hiragana('ヾ'), 'ゞ');
    }

    #[test]
    fn kana_without_hiragana_counterpart_unchanged() {
        assert_eq!(katakana_to_hiragana('ヷ'), 'ヷ');
        assert_eq!(katakana_to_hiragana('ー'), 'ー');
        assert_eq!(katakana_to_hiragana('a'), 'a');
    }

    #[test]
    fn idempotent_on_registry_names() {
        for s in ["Home", "ホーム", "アプリパスワード", "Keyboard Shortcut", "通知", "ｱﾌﾟﾘ"] {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
        }
    }
}
