//! Text normalization primitives shared by every ranker in this crate.
//!
//! Every search flavour (job hybrid ranking, company composite scoring,
//! location suggest) needs the same canonical form of free text before it
//! can be compared or tokenized, so it lives here once.

use std::borrow::Cow;

/// Lowercase, NFD-decompose, strip combining marks, fold anything outside
/// `[a-z0-9\s]` to a space, collapse whitespace runs, and trim.
pub fn normalize(s: &str) -> String {
    let lowered = s.to_lowercase();
    let decomposed = decompose_and_strip_marks(&lowered);

    let mut folded = String::with_capacity(decomposed.len());
    let mut last_was_space = false;
    for ch in decomposed.chars() {
        let mapped = if ch.is_ascii_alphanumeric() || (ch.is_whitespace()) {
            ch
        } else if ch.is_alphanumeric() {
            // Non-ASCII alphanumerics that survived mark-stripping (rare)
            // still count as content, not separators.
            ch
        } else {
            ' '
        };

        if mapped == ' ' {
            if !last_was_space {
                folded.push(' ');
                last_was_space = true;
            }
        } else {
            folded.push(mapped);
            last_was_space = false;
        }
    }

    folded.trim().to_string()
}

/// Unique, first-occurrence-ordered tokens of `normalize(s)`.
pub fn tokenize(s: &str) -> Vec<String> {
    let normalized = normalize(s);
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for tok in normalized.split_whitespace() {
        if seen.insert(tok.to_string()) {
            out.push(tok.to_string());
        }
    }
    out
}

/// Escapes regex metacharacters so user input can be embedded in a pattern.
pub fn escape_regex(s: &str) -> String {
    const METACHARS: &str = r".*+?^${}()|[]\";
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        if METACHARS.contains(ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Returns `None` for empty/whitespace-only input, otherwise the collapsed
/// lowercase search term a ranker can use as `q`.
pub fn normalize_search_term(q: Option<&str>) -> Option<String> {
    let q = q?;
    let normalized = normalize(q);
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

/// Strips Unicode combining marks (U+0300..U+036F) after NFD decomposition,
/// without pulling in a full Unicode-normalization crate dependency.
fn decompose_and_strip_marks(s: &str) -> Cow<'_, str> {
    if s.is_ascii() {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    for ch in s.nfd() {
        if !is_combining_mark(ch) {
            out.push(ch);
        }
    }
    Cow::Owned(out)
}

fn is_combining_mark(ch: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&ch)
}

/// Minimal NFD decomposition for the Latin-1 Supplement and Latin Extended-A
/// diacritics this job board's location/company data realistically contains
/// (à, é, ñ, ü, ç, ...). This is not a general Unicode normalizer — it
/// covers the accented Latin letters that appear in practice and falls back
/// to returning the character unchanged otherwise.
trait Nfd {
    fn nfd(&self) -> std::vec::IntoIter<char>;
}

impl Nfd for str {
    fn nfd(&self) -> std::vec::IntoIter<char> {
        let mut out = Vec::with_capacity(self.len());
        for ch in self.chars() {
            match decompose_char(ch) {
                Some((base, mark)) => {
                    out.push(base);
                    out.push(mark);
                }
                None => out.push(ch),
            }
        }
        out.into_iter()
    }
}

/// Decomposes a single precomposed Latin letter into (base, combining mark).
fn decompose_char(ch: char) -> Option<(char, char)> {
    let (base, mark) = match ch {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => ('a', '\u{0301}'),
        'è' | 'é' | 'ê' | 'ë' => ('e', '\u{0301}'),
        'ì' | 'í' | 'î' | 'ï' => ('i', '\u{0301}'),
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => ('o', '\u{0301}'),
        'ù' | 'ú' | 'û' | 'ü' => ('u', '\u{0301}'),
        'ñ' => ('n', '\u{0303}'),
        'ç' => ('c', '\u{0327}'),
        'ý' | 'ÿ' => ('y', '\u{0301}'),
        _ => return None,
    };
    Some((base, mark))
}
