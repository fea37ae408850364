//! # Glob Patterns
//!
//! Shell-style key matching for cache `keys` and `delete_pattern`.
//!
//! | Pattern | Matches |
//! |---------|---------|
//! | `*` | any run of characters, including none |
//! | `?` | exactly one character |
//! | `[abc]`, `[a-z]` | one character from the set |
//! | `[!abc]` | one character not in the set |
//!
//! A `]` right after `[` or `[!` is a literal member of the set, and a `[`
//! without a closing `]` matches itself. Matching is case-sensitive and
//! covers the whole key.
//!
//! # Examples
//!
//! ```
//! use trading_data_adapter::infrastructure::persistence::in_memory::pattern::GlobPattern;
//!
//! let pattern = GlobPattern::new("orders:[!0]?").unwrap();
//! assert!(pattern.matches("orders:12"));
//! assert!(!pattern.matches("orders:01"));
//! assert!(!pattern.matches("orders:123"));
//! ```

use regex::Regex;

/// A compiled glob pattern.
#[derive(Debug, Clone)]
pub struct GlobPattern {
    regex: Regex,
}

impl GlobPattern {
    /// Compiles a glob pattern.
    ///
    /// # Errors
    ///
    /// Returns `regex::Error` if the translated expression exceeds the
    /// regex engine's size limits.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(&translate(pattern))?,
        })
    }

    /// Returns true if `key` matches the whole pattern.
    #[must_use]
    pub fn matches(&self, key: &str) -> bool {
        self.regex.is_match(key)
    }
}

fn escape(c: char) -> String {
    regex::escape(c.encode_utf8(&mut [0; 4]))
}

/// Translates a glob into an anchored regular expression.
fn translate(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::from("(?s)^");
    let mut i = 0;
    while let Some(&c) = chars.get(i) {
        i += 1;
        match c {
            '*' => {
                while chars.get(i) == Some(&'*') {
                    i += 1;
                }
                out.push_str(".*");
            }
            '?' => out.push('.'),
            '[' => match translate_class(&chars, i) {
                Some((class, next)) => {
                    out.push_str(&class);
                    i = next;
                }
                None => out.push_str(r"\["),
            },
            _ => out.push_str(&escape(c)),
        }
    }
    out.push_str(r"\z");
    out
}

/// Translates the set starting after `[` at `start`.
///
/// Returns the regex class and the index after the closing `]`, or `None`
/// when the set is never closed.
fn translate_class(chars: &[char], start: usize) -> Option<(String, usize)> {
    let mut j = start;
    let negate = chars.get(j) == Some(&'!');
    if negate {
        j += 1;
    }
    let body_start = j;
    if chars.get(j) == Some(&']') {
        j += 1;
    }
    while chars.get(j).is_some_and(|&c| c != ']') {
        j += 1;
    }
    chars.get(j)?;
    let body = chars.get(body_start..j)?;

    let mut members = String::new();
    let mut k = 0;
    while let Some(&lo) = body.get(k) {
        match (body.get(k + 1), body.get(k + 2)) {
            (Some('-'), Some(&hi)) => {
                // Reversed ranges match nothing.
                if lo <= hi {
                    members.push_str(&escape(lo));
                    members.push('-');
                    members.push_str(&escape(hi));
                }
                k += 3;
            }
            _ => {
                members.push_str(&escape(lo));
                k += 1;
            }
        }
    }

    let class = match (members.is_empty(), negate) {
        (true, false) => r"[^\s\S]".to_string(),
        (true, true) => ".".to_string(),
        (false, false) => format!("[{members}]"),
        (false, true) => format!("[^{members}]"),
    };
    Some((class, j + 1))
}
