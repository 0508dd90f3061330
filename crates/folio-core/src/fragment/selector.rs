//! The subset of CSS selectors understood by [`FragmentTree`](super::FragmentTree).
//!
//! Supported: selector lists (`a, b`), descendant combinators (`nav a`),
//! type selectors and `*`, `#id`, `.class`, `[attr]`, `[attr=value]` and
//! `[attr^=value]` with optional quotes around the value.

use crate::error::{PageError, PageResult};

/// A parsed selector list.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorList {
    selectors: Vec<Complex>,
}

/// Compound selectors joined by descendant combinators; the last one is the
/// subject.
#[derive(Debug, Clone, PartialEq)]
struct Complex {
    compounds: Vec<Compound>,
}

#[derive(Debug, Clone, PartialEq, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrMatch>,
}

#[derive(Debug, Clone, PartialEq)]
struct AttrMatch {
    name: String,
    op: AttrOp,
}

#[derive(Debug, Clone, PartialEq)]
enum AttrOp {
    Exists,
    Equals(String),
    Prefix(String),
}

/// What the matcher needs to know about an element.
pub trait ElementView {
    fn tag(&self) -> &str;
    fn attr(&self, name: &str) -> Option<&str>;
    fn has_class(&self, class: &str) -> bool;
}

impl SelectorList {
    pub fn parse(input: &str) -> PageResult<Self> {
        let invalid = || PageError::InvalidSelector(input.to_string());

        let mut selectors = Vec::new();
        for group in split_top_level(input, |c| c == ',') {
            let group = group.trim();
            if group.is_empty() {
                return Err(invalid());
            }
            let compounds = split_top_level(group, char::is_whitespace)
                .into_iter()
                .filter(|part| !part.is_empty())
                .map(|part| Compound::parse(part).ok_or_else(invalid))
                .collect::<PageResult<Vec<_>>>()?;
            selectors.push(Complex { compounds });
        }

        if selectors.is_empty() {
            return Err(invalid());
        }
        Ok(Self { selectors })
    }

    /// `ancestors` yields the element's ancestors from the nearest outward.
    pub fn matches<'a, E, I>(&self, element: &E, ancestors: I) -> bool
    where
        E: ElementView,
        I: Iterator<Item = &'a E> + Clone,
        E: 'a,
    {
        self.selectors
            .iter()
            .any(|complex| complex.matches(element, ancestors.clone()))
    }
}

impl Complex {
    fn matches<'a, E, I>(&self, element: &E, mut ancestors: I) -> bool
    where
        E: ElementView + 'a,
        I: Iterator<Item = &'a E>,
    {
        let Some((subject, rest)) = self.compounds.split_last() else {
            return false;
        };
        if !subject.matches(element) {
            return false;
        }
        // Greedy nearest-ancestor search is exact for descendant-only chains.
        for compound in rest.iter().rev() {
            if !ancestors.any(|ancestor| compound.matches(ancestor)) {
                return false;
            }
        }
        true
    }
}

impl Compound {
    fn parse(input: &str) -> Option<Self> {
        let mut compound = Compound::default();
        let mut rest = input;

        if rest.starts_with('*') {
            rest = &rest[1..];
        } else {
            let (tag, tail) = take_ident(rest);
            if !tag.is_empty() {
                compound.tag = Some(tag.to_ascii_lowercase());
            }
            rest = tail;
        }

        while let Some(c) = rest.chars().next() {
            match c {
                '#' | '.' => {
                    let (ident, tail) = take_ident(&rest[1..]);
                    if ident.is_empty() {
                        return None;
                    }
                    if c == '#' {
                        compound.id = Some(ident.to_string());
                    } else {
                        compound.classes.push(ident.to_string());
                    }
                    rest = tail;
                }
                '[' => {
                    let end = rest.find(']')?;
                    compound.attrs.push(AttrMatch::parse(&rest[1..end])?);
                    rest = &rest[end + 1..];
                }
                _ => return None,
            }
        }

        Some(compound)
    }

    fn matches<E: ElementView>(&self, element: &E) -> bool {
        if let Some(tag) = &self.tag {
            if !element.tag().eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if element.attr("id") != Some(id.as_str()) {
                return false;
            }
        }
        self.classes.iter().all(|class| element.has_class(class))
            && self.attrs.iter().all(|attr| attr.matches(element))
    }
}

impl AttrMatch {
    fn parse(inner: &str) -> Option<Self> {
        let inner = inner.trim();
        let (name, op) = if let Some((name, value)) = inner.split_once("^=") {
            (name, AttrOp::Prefix(unquote(value)?))
        } else if let Some((name, value)) = inner.split_once('=') {
            (name, AttrOp::Equals(unquote(value)?))
        } else {
            (inner, AttrOp::Exists)
        };

        let name = name.trim();
        let (ident, tail) = take_ident(name);
        if ident.is_empty() || !tail.is_empty() {
            return None;
        }
        Some(Self {
            name: ident.to_ascii_lowercase(),
            op,
        })
    }

    fn matches<E: ElementView>(&self, element: &E) -> bool {
        let value = element.attr(&self.name);
        match &self.op {
            AttrOp::Exists => value.is_some(),
            AttrOp::Equals(expected) => value == Some(expected.as_str()),
            AttrOp::Prefix(prefix) => value.is_some_and(|v| v.starts_with(prefix.as_str())),
        }
    }
}

fn take_ident(input: &str) -> (&str, &str) {
    let end = input
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        .map(|(i, _)| i)
        .unwrap_or(input.len());
    input.split_at(end)
}

fn unquote(value: &str) -> Option<String> {
    let value = value.trim();
    for quote in ['"', '\''] {
        if let Some(stripped) = value.strip_prefix(quote) {
            return stripped.strip_suffix(quote).map(str::to_string);
        }
    }
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Splits on `sep` outside of brackets and quotes.
fn split_top_level(input: &str, sep: impl Fn(char) -> bool) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in input.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, c) if depth == 0 && sep(c) => {
                parts.push(&input[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);
    parts
}
