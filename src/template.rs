//! Template substitution.
//!
//! Style markup is written as literal text with `{name}` placeholders.
//! Templates parse once into a token sequence when the style loads and are
//! replayed for every rendered entry, so the same template string is never
//! re-parsed per entry.
//!
//! Placeholder resolution order: per-call named overrides, then each
//! attribute source in turn, then the constant attribute table (`sp`, `nl`,
//! plus anything configured under `attributes.*`). An unresolved placeholder
//! stays literal in the output and records a diagnostic; leaving it visible
//! in the generated markup is the debugging aid, not a failure.

use crate::attr::AttrMap;
use crate::diag::Diagnostics;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Placeholder(String),
}

/// A parsed template, ready to render against attribute sources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    tokens: Vec<Token>,
}

impl Template {
    /// Parse a template string.
    ///
    /// `{{` and `}}` escape literal braces; an unterminated `{...` is kept
    /// as literal text.
    pub fn parse(text: &str) -> Self {
        let mut tokens = Vec::new();
        let mut literal = String::new();
        let mut rest = text;
        while let Some(pos) = rest.find(['{', '}']) {
            literal.push_str(&rest[..pos]);
            let brace = rest.as_bytes()[pos];
            let after = &rest[pos + 1..];
            if after.as_bytes().first() == Some(&brace) {
                // doubled brace, literal
                literal.push(brace as char);
                rest = &after[1..];
                continue;
            }
            if brace == b'}' {
                // stray close brace, keep literal
                literal.push('}');
                rest = after;
                continue;
            }
            match after.find('}') {
                Some(end) => {
                    if !literal.is_empty() {
                        tokens.push(Token::Literal(std::mem::take(&mut literal)));
                    }
                    tokens.push(Token::Placeholder(after[..end].to_string()));
                    rest = &after[end + 1..];
                }
                None => {
                    literal.push('{');
                    rest = after;
                }
            }
        }
        literal.push_str(rest);
        if !literal.is_empty() {
            tokens.push(Token::Literal(literal));
        }
        Self { tokens }
    }

    /// True if rendering can never produce output.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Render into `out`.
    ///
    /// `overrides` are checked first, then every map in `sources` in order,
    /// then `constants`. A missing name records a warning and emits the
    /// placeholder literally.
    pub fn render(
        &self,
        out: &mut String,
        overrides: &[(&str, &str)],
        sources: &[&AttrMap],
        constants: &AttrMap,
        line: Option<usize>,
        diag: &mut Diagnostics,
    ) {
        for token in &self.tokens {
            match token {
                Token::Literal(text) => out.push_str(text),
                Token::Placeholder(name) => {
                    if let Some(value) = resolve(name, overrides, sources, constants) {
                        out.push_str(value);
                    } else {
                        diag.warn(
                            line,
                            format!("attribute '{name}' not found, left in output"),
                        );
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                }
            }
        }
    }
}

fn resolve<'a>(
    name: &str,
    overrides: &'a [(&str, &str)],
    sources: &'a [&AttrMap],
    constants: &'a AttrMap,
) -> Option<&'a str> {
    if let Some((_, value)) = overrides.iter().find(|(k, _)| *k == name) {
        return Some(value);
    }
    for source in sources {
        if let Some(value) = source.get(name) {
            return Some(value);
        }
    }
    constants.get(name).map(String::as_str)
}

/// The built-in constant attribute table: a single space and a newline.
///
/// Extended at load time from configured `attributes.*` keys.
pub fn builtin_constants() -> AttrMap {
    let mut constants = AttrMap::new();
    constants.insert("sp".to_string(), " ".to_string());
    constants.insert("nl".to_string(), "\n".to_string());
    constants
}
