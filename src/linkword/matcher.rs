//! Per-word match patterns.

use crate::utils::path::slug::is_cjk;
use regex::{Regex, escape};

/// Case-insensitive pattern for a link word.
///
/// Latin words match whole words only: `\b` guards each edge that is a word
/// character (`C++` gets a boundary before `C` only). Words containing any
/// CJK character match anywhere, since those scripts have no word breaks.
pub fn word_pattern(word: &str) -> String {
    let escaped = escape(word);
    if word.chars().any(is_cjk) {
        return format!("(?i){escaped}");
    }

    let is_word = |c: Option<char>| c.is_some_and(|c| c.is_alphanumeric() || c == '_');
    let lead = if is_word(word.chars().next()) { r"\b" } else { "" };
    let tail = if is_word(word.chars().next_back()) { r"\b" } else { "" };
    format!("(?i){lead}{escaped}{tail}")
}

pub fn compile(word: &str) -> Result<Regex, regex::Error> {
    Regex::new(&word_pattern(word))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finds(word: &str, text: &str) -> Vec<String> {
        compile(word)
            .unwrap()
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    #[test]
    fn test_latin_boundaries() {
        assert_eq!(finds("rust", "Rust, rusty, RUST."), vec!["Rust", "RUST"]);
        assert!(finds("rust", "trust").is_empty());
    }

    #[test]
    fn test_symbol_edges() {
        assert_eq!(finds("C++", "I like C++ a lot"), vec!["C++"]);
        assert!(finds("C++", "ABC++").is_empty());
    }

    #[test]
    fn test_cjk_without_boundaries() {
        assert_eq!(finds("学习", "我在学习Rust"), vec!["学习"]);
        assert_eq!(finds("Rust学习", "关于rust学习笔记"), vec!["rust学习"]);
    }

    #[test]
    fn test_regex_metacharacters_escaped() {
        assert_eq!(finds("a.b", "a.b axb"), vec!["a.b"]);
    }
}
