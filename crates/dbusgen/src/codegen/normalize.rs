//! Well-formedness check and canonical layout of generated source.
//!
//! The generators write flat, unindented text. [`normalize`] first parses the
//! whole unit with `syn`, so a template bug fails the run instead of
//! producing broken output, then re-indents every line from its bracket depth
//! and canonicalises blank lines.

use crate::diagnostic::GeneratorError;

const INDENT: &str = "    ";

/// Validates `source` as a Rust file and returns it in canonical layout.
pub fn normalize(source: &str) -> Result<String, GeneratorError> {
    syn::parse_file(source).map_err(|e| {
        let start = e.span().start();
        GeneratorError::MalformedOutput {
            message: e.to_string(),
            line: start.line,
            column: start.column + 1,
        }
    })?;

    Ok(reformat(source))
}

/// A line of output; verbatim lines continue a multi-line literal or comment.
struct Line {
    text: String,
    verbatim: bool,
}

fn reformat(source: &str) -> String {
    let mut scanner = Scanner::default();
    let mut lines = Vec::new();

    for raw in source.lines() {
        if scanner.in_literal() {
            scanner.scan(raw);
            lines.push(Line {
                text: raw.to_string(),
                verbatim: true,
            });
            continue;
        }

        let trimmed = raw.trim();
        let closers = trimmed
            .chars()
            .take_while(|&c| matches!(c, '}' | ')' | ']'))
            .count();
        let level = scanner.depth.saturating_sub(closers);
        let text = if trimmed.is_empty() {
            String::new()
        } else {
            format!("{}{}", INDENT.repeat(level), trimmed)
        };

        scanner.scan(trimmed);
        lines.push(Line { text, verbatim: false });
    }

    join_lines(lines)
}

/// Collapses blank runs and drops blanks at the edges and inside bracket boundaries.
fn join_lines(lines: Vec<Line>) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut pending_blank = false;

    for line in lines {
        if !line.verbatim && line.text.is_empty() {
            pending_blank = true;
            continue;
        }

        if pending_blank {
            let after_open = out
                .last()
                .map_or(true, |prev| prev.ends_with(|c: char| matches!(c, '{' | '(' | '[')));
            let before_close = !line.verbatim
                && line
                    .text
                    .trim_start()
                    .starts_with(|c: char| matches!(c, '}' | ')' | ']'));
            if !after_open && !before_close {
                out.push(String::new());
            }
            pending_blank = false;
        }
        out.push(line.text);
    }

    if out.is_empty() {
        return String::new();
    }
    let mut text = out.join("\n");
    text.push('\n');
    text
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    /// Inside a string literal; raw strings carry their `#` count.
    Str { raw_hashes: Option<usize> },
    /// Inside a (possibly nested) block comment.
    BlockComment { depth: usize },
}

/// Tracks bracket depth across lines, skipping literals and comments.
struct Scanner {
    depth: usize,
    state: State,
}

impl Default for Scanner {
    fn default() -> Self {
        Self {
            depth: 0,
            state: State::Code,
        }
    }
}

impl Scanner {
    fn in_literal(&self) -> bool {
        self.state != State::Code
    }

    fn scan(&mut self, line: &str) {
        let chars: Vec<char> = line.chars().collect();
        let at = |i: usize| chars.get(i).copied();
        let mut i = 0;

        while i < chars.len() {
            match self.state {
                State::BlockComment { depth } => {
                    if at(i) == Some('*') && at(i + 1) == Some('/') {
                        self.state = if depth == 1 {
                            State::Code
                        } else {
                            State::BlockComment { depth: depth - 1 }
                        };
                        i += 2;
                    } else if at(i) == Some('/') && at(i + 1) == Some('*') {
                        self.state = State::BlockComment { depth: depth + 1 };
                        i += 2;
                    } else {
                        i += 1;
                    }
                }
                State::Str { raw_hashes: None } => match chars[i] {
                    '\\' => i += 2,
                    '"' => {
                        self.state = State::Code;
                        i += 1;
                    }
                    _ => i += 1,
                },
                State::Str { raw_hashes: Some(hashes) } => {
                    let closes = chars[i] == '"' && (1..=hashes).all(|k| at(i + k) == Some('#'));
                    if closes {
                        self.state = State::Code;
                        i += 1 + hashes;
                    } else {
                        i += 1;
                    }
                }
                State::Code => i = self.scan_code(&chars, i),
            }
        }
    }

    /// Consumes one token-ish step of code starting at `i`; returns the next index.
    fn scan_code(&mut self, chars: &[char], i: usize) -> usize {
        let at = |i: usize| chars.get(i).copied();
        let c = chars[i];

        match c {
            '/' if at(i + 1) == Some('/') => chars.len(),
            '/' if at(i + 1) == Some('*') => {
                self.state = State::BlockComment { depth: 1 };
                i + 2
            }
            '"' => {
                self.state = State::Str { raw_hashes: None };
                i + 1
            }
            'r' if !continues_ident(chars, i) => {
                let hashes = chars[i + 1..].iter().take_while(|&&c| c == '#').count();
                if at(i + 1 + hashes) == Some('"') {
                    self.state = State::Str {
                        raw_hashes: Some(hashes),
                    };
                    i + 2 + hashes
                } else {
                    i + 1
                }
            }
            '\'' => {
                if at(i + 1) == Some('\\') {
                    // Escaped char literal: skip to the closing quote.
                    let mut j = i + 3;
                    while j < chars.len() && chars[j] != '\'' {
                        j += 1;
                    }
                    j + 1
                } else if at(i + 2) == Some('\'') {
                    i + 3
                } else {
                    // Lifetime or label.
                    i + 1
                }
            }
            '{' | '(' | '[' => {
                self.depth += 1;
                i + 1
            }
            '}' | ')' | ']' => {
                self.depth = self.depth.saturating_sub(1);
                i + 1
            }
            _ => i + 1,
        }
    }
}

/// Whether the character at `i` is in the middle of an identifier. A lone
/// `b` prefix still starts a raw byte string.
fn continues_ident(chars: &[char], i: usize) -> bool {
    match i.checked_sub(1).map(|p| chars[p]) {
        Some('b') => i >= 2 && is_ident_char(chars[i - 2]),
        Some(prev) => is_ident_char(prev),
        None => false,
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reindents_by_bracket_depth() {
        let source =
            "pub mod demo {\nfn f(\na: u8,\n) -> u8 {\nmatch a {\n0 => 1,\n_ => {\n2\n}\n}\n}\n}\n";
        let expected = "\
pub mod demo {
    fn f(
        a: u8,
    ) -> u8 {
        match a {
            0 => 1,
            _ => {
                2
            }
        }
    }
}
";
        assert_eq!(normalize(source).unwrap(), expected);
    }

    #[test]
    fn test_blank_lines_are_canonical() {
        let source = "\n\n// banner\n\n\n\nmod a {\n\nfn f() {}\n\n\nfn g() {}\n\n}\n\n\n";
        let expected = "// banner\n\nmod a {\n    fn f() {}\n\n    fn g() {}\n}\n";
        assert_eq!(normalize(source).unwrap(), expected);
    }

    #[test]
    fn test_literals_and_comments_do_not_count() {
        let source = r#"fn f() -> &'static str {
let _c = '{';
let _e = '\'';
// a { comment
/* and { another */
"}{"
}
fn g() {}
"#;
        let out = normalize(source).unwrap();
        assert!(out.contains("\n    \"}{\"\n}\n"));
        assert!(out.ends_with("fn g() {}\n"));
    }

    #[test]
    fn test_multiline_string_kept_verbatim() {
        let source = "const S: &str = \"first {\n  second\n\nthird\";\nfn f() {}\n";
        let out = normalize(source).unwrap();
        assert!(out.contains("\"first {\n  second\n\nthird\";\nfn f() {}\n"));
    }

    #[test]
    fn test_raw_identifiers_and_raw_strings() {
        let source = "fn f(r#type: u8) -> u8 {\nlet _s = r#\"{\"#;\nr#type\n}\n";
        let expected = "fn f(r#type: u8) -> u8 {\n    let _s = r#\"{\"#;\n    r#type\n}\n";
        assert_eq!(normalize(source).unwrap(), expected);
    }

    #[test]
    fn test_is_idempotent() {
        let source = concat!(
            "mod m {\nstruct S {\na: u8,\n}\n\n\n",
            "impl S {\nfn new() -> Self {\nSelf { a: 0 }\n}\n}\n}\n",
        );
        let once = normalize(source).unwrap();
        assert_eq!(normalize(&once).unwrap(), once);
    }

    #[test]
    fn test_rejects_malformed_source() {
        let err = normalize("fn f() {\nlet x = ;\n}\n").unwrap_err();
        match err {
            GeneratorError::MalformedOutput { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
