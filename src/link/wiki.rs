//! Wiki link normalization: `[[target]]` / `[[target|alias]]` to
//! `[target](target)`.

use crate::span::CodeSpans;
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

static WIKI_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([^\[\]\n]+?)\]\]").unwrap());

/// Rewrite wiki links as markdown links. The alias is dropped.
///
/// Occurrences starting inside code (per `spans`, computed on `text`) are
/// left alone.
pub fn normalize_wiki_links<'a>(text: &'a str, spans: &CodeSpans) -> Cow<'a, str> {
    if !text.contains("[[") {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in WIKI_LINK.captures_iter(text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if spans.in_span(whole.start()) {
            continue;
        }
        let target = inner.as_str().split('|').next().unwrap_or_default().trim();
        if target.is_empty() {
            continue;
        }
        out.push_str(&text[last..whole.start()]);
        out.push('[');
        out.push_str(target);
        out.push_str("](");
        out.push_str(target);
        out.push(')');
        last = whole.end();
    }

    if last == 0 {
        return Cow::Borrowed(text);
    }
    out.push_str(&text[last..]);
    Cow::Owned(out)
}
