//! Compound selectors: `tag`, `.class`, `#id`, `[attr]`, `[attr=value]` and
//! combinations such as `div.lazyframe[data-src]`. Descendant combinators and
//! selector lists are not supported.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Class(String),
    Id(String),
    Attribute { name: String, value: Option<String> },
}

/// A parsed compound selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    tag: Option<String>,
    parts: Vec<Part>,
}

/// Error returned for selectors outside the supported subset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorError(String);

impl fmt::Display for SelectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported selector: {}", self.0)
    }
}

impl std::error::Error for SelectorError {}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn take_ident(chars: &[char], pos: &mut usize) -> String {
    let start = *pos;
    while *pos < chars.len() && is_ident_char(chars[*pos]) {
        *pos += 1;
    }
    chars[start..*pos].iter().collect()
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let input = input.trim();
        let err = || SelectorError(input.to_string());
        if input.is_empty() {
            return Err(err());
        }

        let chars: Vec<char> = input.chars().collect();
        let mut pos = 0;
        let mut tag = None;
        let mut parts = Vec::new();

        if chars[0] == '*' {
            pos = 1;
        } else if is_ident_char(chars[0]) {
            tag = Some(take_ident(&chars, &mut pos).to_ascii_lowercase());
        }

        while pos < chars.len() {
            let c = chars[pos];
            pos += 1;
            match c {
                '.' | '#' => {
                    let ident = take_ident(&chars, &mut pos);
                    if ident.is_empty() {
                        return Err(err());
                    }
                    parts.push(if c == '.' {
                        Part::Class(ident)
                    } else {
                        Part::Id(ident)
                    });
                }
                '[' => {
                    let close = chars[pos..]
                        .iter()
                        .position(|&ch| ch == ']')
                        .ok_or_else(err)?;
                    let body: String = chars[pos..pos + close].iter().collect();
                    pos += close + 1;
                    let (name, value) = match body.split_once('=') {
                        Some((name, value)) => {
                            let value = value.trim().trim_matches(|q| q == '"' || q == '\'');
                            (name.trim(), Some(value.to_string()))
                        }
                        None => (body.trim(), None),
                    };
                    if name.is_empty() || !name.chars().all(is_ident_char) {
                        return Err(err());
                    }
                    parts.push(Part::Attribute {
                        name: name.to_ascii_lowercase(),
                        value,
                    });
                }
                _ => return Err(err()),
            }
        }

        Ok(Self { tag, parts })
    }

    /// Test the selector against an element described by its tag, classes
    /// and an attribute lookup.
    pub fn matches<'a>(
        &self,
        tag: &str,
        classes: &[String],
        attribute: impl Fn(&str) -> Option<&'a str>,
    ) -> bool {
        if let Some(t) = &self.tag {
            if !t.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        self.parts.iter().all(|part| match part {
            Part::Class(class) => classes.iter().any(|c| c == class),
            Part::Id(id) => attribute("id") == Some(id.as_str()),
            Part::Attribute { name, value } => match (attribute(name), value) {
                (Some(_), None) => true,
                (Some(actual), Some(expected)) => actual == expected,
                (None, _) => false,
            },
        })
    }
}
