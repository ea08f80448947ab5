#![forbid(unsafe_code)]

//! Drag handle selectors.
//!
//! A deliberately small selector language: a comma-separated list of
//! compound selectors, each an optional tag (or `*`) followed by any number
//! of `.class` and at most one `#id`. Descendant combinators and attribute
//! selectors are not supported.
//!
//! Matching uses `closest` semantics: a pointer-down satisfies the selector
//! when any element on its target path (innermost first, up to the item)
//! matches one of the alternatives.

use std::fmt;

use sgrid_core::event::{ElementDescriptor, EventTarget};

/// Selector parse failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid handle selector {selector:?}: {reason}")]
pub struct SelectorError {
    pub selector: String,
    pub reason: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Compound {
    fn matches(&self, el: &ElementDescriptor) -> bool {
        if let Some(tag) = &self.tag
            && !tag.eq_ignore_ascii_case(&el.tag)
        {
            return false;
        }
        if let Some(id) = &self.id
            && el.id.as_deref() != Some(id.as_str())
        {
            return false;
        }
        self.classes.iter().all(|c| el.has_class(c))
    }
}

impl fmt::Display for Compound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.tag {
            Some(tag) => f.write_str(tag)?,
            None if self.id.is_none() && self.classes.is_empty() => f.write_str("*")?,
            None => {}
        }
        if let Some(id) = &self.id {
            write!(f, "#{id}")?;
        }
        for class in &self.classes {
            write!(f, ".{class}")?;
        }
        Ok(())
    }
}

/// Parsed drag handle selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandleSelector {
    alternatives: Vec<Compound>,
}

impl HandleSelector {
    /// Parse `source`.
    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        let fail = |reason| SelectorError {
            selector: source.to_owned(),
            reason,
        };
        let mut alternatives = Vec::new();
        for part in source.split(',') {
            let part = part.trim();
            if part.is_empty() {
                return Err(fail("empty selector"));
            }
            if part.chars().any(char::is_whitespace) {
                return Err(fail("combinators are not supported"));
            }
            alternatives.push(parse_compound(part).map_err(fail)?);
        }
        Ok(Self { alternatives })
    }

    /// Whether `element` matches any alternative.
    #[must_use]
    pub fn matches_element(&self, element: &ElementDescriptor) -> bool {
        self.alternatives.iter().any(|c| c.matches(element))
    }

    /// Whether any element on the target path matches.
    #[must_use]
    pub fn matches(&self, target: &EventTarget) -> bool {
        target.path.iter().any(|el| self.matches_element(el))
    }
}

impl fmt::Display for HandleSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, c) in self.alternatives.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn parse_compound(part: &str) -> Result<Compound, &'static str> {
    let mut compound = Compound::default();
    let mut rest = part;

    let tag_len = rest.find(['.', '#']).unwrap_or(rest.len());
    let tag = &rest[..tag_len];
    if tag == "*" {
        // universal; leave tag unset
    } else if !tag.is_empty() {
        if !tag.chars().all(is_ident_char) {
            return Err("invalid tag name");
        }
        compound.tag = Some(tag.to_owned());
    }
    rest = &rest[tag_len..];

    while let Some(sigil) = rest.chars().next() {
        let body = &rest[1..];
        let len = body.find(['.', '#']).unwrap_or(body.len());
        let name = &body[..len];
        if name.is_empty() || !name.chars().all(is_ident_char) {
            return Err("invalid class or id");
        }
        match sigil {
            '.' => compound.classes.push(name.to_owned()),
            '#' if compound.id.is_none() => compound.id = Some(name.to_owned()),
            '#' => return Err("more than one id"),
            _ => return Err("unexpected character"),
        }
        rest = &body[len..];
    }
    Ok(compound)
}
