//! Result classification and cleanup of the model's raw answer.
//!
//! Short alphanumeric answers are verification codes and are only
//! uppercased. Everything else gets LaTeX delimiter repair, because the
//! model is inconsistent about math spacing and sometimes escapes
//! full-width parentheses.
//!
//! ## Rule Order (text case)
//! 1. `\（` / `\）` → `\(` / `\)`
//! 2. Collapse 3+ newlines to exactly 2
//! 3. Strip whitespace just inside `$$…$$` and `$…$`
//! 4. Trim the whole string
//!
//! Single newlines are left alone. Every rule only removes or shortens,
//! so running the pipeline twice is a no-op.

use once_cell::sync::Lazy;
use regex::Regex;

use glyphgate_common::constants::CAPTCHA_MAX_LEN;
use glyphgate_common::{PromptMode, ResultType};

static RE_CAPTCHA: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9]+$").unwrap());

static RE_EXCESS_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

static RE_DISPLAY_MATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\$\$(.+?)\$\$").unwrap());

static RE_INLINE_MATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$([^$]+)\$").unwrap());

/// Classify the raw answer and normalize it for the caller.
///
/// Advanced mode returns the text untouched as `Text`.
pub fn classify(raw: &str, mode: &PromptMode) -> (ResultType, String) {
    if mode.is_advanced() {
        return (ResultType::Text, raw.to_string());
    }

    if is_captcha(raw) {
        return (ResultType::Captcha, raw.to_ascii_uppercase());
    }

    (ResultType::Text, normalize_text(raw))
}

/// At most ten ASCII letters/digits, nothing else.
pub fn is_captcha(raw: &str) -> bool {
    raw.len() <= CAPTCHA_MAX_LEN && RE_CAPTCHA.is_match(raw)
}

pub fn normalize_text(raw: &str) -> String {
    let s = repair_fullwidth_escapes(raw);
    let s = collapse_newlines(&s);
    let s = tighten_math(&s);
    s.trim().to_string()
}

fn repair_fullwidth_escapes(input: &str) -> String {
    input.replace("\\（", "\\(").replace("\\）", "\\)")
}

fn collapse_newlines(input: &str) -> String {
    RE_EXCESS_NEWLINES.replace_all(input, "\n\n").into_owned()
}

fn tighten_math(input: &str) -> String {
    // Runs of three or more `$` have no unambiguous pairing
    if input.contains("$$$") {
        return input.to_string();
    }

    let s = RE_DISPLAY_MATH.replace_all(input, |caps: &regex::Captures| {
        wrap_trimmed("$$", &caps[0], &caps[1])
    });
    RE_INLINE_MATH
        .replace_all(&s, |caps: &regex::Captures| {
            wrap_trimmed("$", &caps[0], &caps[1])
        })
        .into_owned()
}

// Blank bodies stay as-is: `$ $` must not turn into a `$$` delimiter.
fn wrap_trimmed(delim: &str, whole: &str, inner: &str) -> String {
    let trimmed = inner.trim();
    if trimmed.is_empty() {
        whole.to_string()
    } else {
        format!("{delim}{trimmed}{delim}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_mode(raw: &str) -> (ResultType, String) {
        classify(raw, &PromptMode::Default)
    }

    #[test]
    fn test_captcha_uppercased() {
        assert_eq!(
            default_mode("AB12"),
            (ResultType::Captcha, "AB12".to_string())
        );
        assert_eq!(
            default_mode("x7kp9"),
            (ResultType::Captcha, "X7KP9".to_string())
        );
    }

    #[test]
    fn test_captcha_idempotent_under_uppercase() {
        let (_, once) = default_mode("abC9");
        let (kind, twice) = default_mode(&once);
        assert_eq!(kind, ResultType::Captcha);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_captcha_boundaries() {
        assert!(is_captcha("ABCDEFGHIJ"));
        assert!(!is_captcha("ABCDEFGHIJK"));
        assert!(!is_captcha(""));
        assert!(!is_captcha("AB 12"));
        assert!(!is_captcha("AB-12"));
        assert!(!is_captcha("验证"));
        assert!(!is_captcha("ab12\n"));
    }

    #[test]
    fn test_short_non_alnum_is_text() {
        let (kind, text) = default_mode(" x+y ");
        assert_eq!(kind, ResultType::Text);
        assert_eq!(text, "x+y");
    }

    #[test]
    fn test_fullwidth_escapes_and_newlines() {
        let (kind, text) = default_mode("x\\（y\\）\n\n\n\nz");
        assert_eq!(kind, ResultType::Text);
        assert_eq!(text, "x\\(y\\)\n\nz");
    }

    #[test]
    fn test_three_or_more_newlines_become_two() {
        for n in 3..8 {
            let raw = format!("first paragraph{}second paragraph", "\n".repeat(n));
            assert_eq!(normalize_text(&raw), "first paragraph\n\nsecond paragraph");
        }
    }

    #[test]
    fn test_single_newlines_preserved() {
        let raw = "line one\nline two\nline three";
        assert_eq!(normalize_text(raw), raw);
        assert_eq!(normalize_text("a\n\nb"), "a\n\nb");
    }

    #[test]
    fn test_inline_math_whitespace_stripped() {
        assert_eq!(
            normalize_text("area is $ \\pi r^2 $ units"),
            "area is $\\pi r^2$ units"
        );
        assert_eq!(normalize_text("$ a $ and $ b $"), "$a$ and $b$");
    }

    #[test]
    fn test_display_math_whitespace_stripped() {
        assert_eq!(
            normalize_text("sum:\n$$ \\sum_{i=1}^n i^2 $$\ndone"),
            "sum:\n$$\\sum_{i=1}^n i^2$$\ndone"
        );
        assert_eq!(normalize_text("$$\nx = 1\n$$"), "$$x = 1$$");
    }

    #[test]
    fn test_dollar_runs_left_alone() {
        assert_eq!(normalize_text("$$$ $ $$"), "$$$ $ $$");
    }

    #[test]
    fn test_blank_math_left_alone() {
        assert_eq!(normalize_text("a $ $ b"), "a $ $ b");
    }

    #[test]
    fn test_normalization_idempotent() {
        let samples = [
            "x\\（y\\）\n\n\n\nz",
            "  $ x $ and $$ y $$\n\n\n\ntail  ",
            "plain\ntext\n\nparagraph",
            "cost $5 and $ x $",
            "a $ $ b",
            "$$$ $ $$",
            "$$$$ x $ y $$",
            "混合 $ \\alpha $ 文本\n\n\n结束",
        ];
        for raw in samples {
            let once = normalize_text(raw);
            assert_eq!(normalize_text(&once), once, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn test_advanced_mode_untouched() {
        let mode = PromptMode::Advanced {
            prompt: "anything".to_string(),
        };
        assert_eq!(classify("ab12", &mode), (ResultType::Text, "ab12".to_string()));
        let raw = "  x\\（y\\）\n\n\n\n$ z $ ";
        assert_eq!(classify(raw, &mode), (ResultType::Text, raw.to_string()));
    }
}
