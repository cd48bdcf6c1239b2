//! Marker attribute-list parsing.
//!
//! The text inside a marker's angle brackets is a comma-separated list of
//! attributes. Items without `=` are positional (for a term marker they form
//! the hierarchy path); items with `=` are keyword attributes. A literal
//! comma or equals sign is written doubled (`,,` / `==`).
//!
//! Parsing never fails: malformed input degenerates to a best-effort split.

use std::collections::BTreeMap;

/// Free-form string attribute mapping (keyword attributes, target attributes).
pub type AttrMap = BTreeMap<String, String>;

/// Parse an attribute list into its positional tuple and keyword mapping.
///
/// Splitting rules:
/// - items are separated by single commas; `,,` is a literal comma
/// - each item splits on its first `=` after collapsing `==` to a literal `=`
/// - items are whitespace-trimmed; a repeated keyword keeps the last value
/// - empty input yields an empty tuple and an empty mapping
pub fn parse_attr_list(input: &str) -> (Vec<String>, AttrMap) {
    let items = split_items(input);
    if items.len() == 1 && items[0].is_empty() {
        return (Vec::new(), AttrMap::new());
    }

    let mut positional = Vec::new();
    let mut keyword = AttrMap::new();
    for item in items {
        let item = collapse_equals(item.trim());
        match item.split_once('=') {
            Some((key, value)) => {
                keyword.insert(key.to_string(), value.to_string());
            }
            None => positional.push(item),
        }
    }
    (positional, keyword)
}

/// Split on commas, consuming `,,` pairs as literal commas.
fn split_items(input: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == ',' {
            if chars.peek() == Some(&',') {
                chars.next();
                current.push(',');
            } else {
                items.push(std::mem::take(&mut current));
            }
        } else {
            current.push(ch);
        }
    }
    items.push(current);
    items
}

/// Collapse `==` pairs to a single `=`.
fn collapse_equals(item: &str) -> String {
    let mut out = String::with_capacity(item.len());
    let mut chars = item.chars().peekable();
    while let Some(ch) = chars.next() {
        out.push(ch);
        if ch == '=' && chars.peek() == Some(&'=') {
            chars.next();
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        let (pos, kw) = parse_attr_list("");
        assert!(pos.is_empty());
        assert!(kw.is_empty());
    }

    #[test]
    fn test_positional_only() {
        let (pos, kw) = parse_attr_list("Animals, Dog ,Poodle");
        assert_eq!(pos, vec!["Animals", "Dog", "Poodle"]);
        assert!(kw.is_empty());
    }

    #[test]
    fn test_mixed_positional_and_keyword() {
        let (pos, kw) = parse_attr_list("a,b=c,d==e,,f");
        assert_eq!(pos, vec!["a"]);
        assert_eq!(kw.get("b").map(String::as_str), Some("c"));
        assert_eq!(kw.get("d").map(String::as_str), Some("e,f"));
        assert_eq!(kw.len(), 2);
    }

    #[test]
    fn test_escaped_comma_in_value() {
        let (pos, kw) = parse_attr_list("text=one,, two");
        assert!(pos.is_empty());
        assert_eq!(kw.get("text").map(String::as_str), Some("one, two"));
    }

    #[test]
    fn test_repeated_keyword_last_wins() {
        let (_, kw) = parse_attr_list("k=first,k=second");
        assert_eq!(kw.get("k").map(String::as_str), Some("second"));
    }

    #[test]
    fn test_escaped_equals_in_value() {
        let (_, kw) = parse_attr_list("expr=a==b");
        assert_eq!(kw.get("expr").map(String::as_str), Some("a=b"));
    }
}
