//! Normalization of the positional ("unique") attribute.
//!
//! The tokenizer stores the argument of `[url=https://example.com]` as an
//! attribute entry whose key equals its value, appended last:
//! `{"https://example.com": "https://example.com"}`. Transforms want either
//! the bare value or a conventionally named attribute instead.

use super::node::Attrs;

/// Result of [`strip_unique_attr`].
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Stripped {
    /// The positional value, if the attrs carried one.
    pub unique: Option<String>,
    /// All remaining attributes, order preserved.
    pub attrs: Attrs,
}

/// Split the positional value off an attribute map.
///
/// Only the last entry is considered, and only if its key equals its value.
pub fn strip_unique_attr(attrs: &Attrs) -> Stripped {
    let mut attrs = attrs.clone();
    let is_unique = matches!(attrs.last(), Some((k, v)) if k == v);
    let unique = if is_unique {
        attrs.pop().map(|(_, v)| v)
    } else {
        None
    };
    Stripped { unique, attrs }
}

/// Move the positional value into an attribute called `name`.
///
/// If both a positional value and an existing `name` attribute are present,
/// `override_existing` picks the positional one. If neither is present and a
/// `default` supplier is given, its value is used.
pub fn unique_attr_to_attr<F>(
    name: &str,
    attrs: &Attrs,
    override_existing: bool,
    default: Option<F>,
) -> Attrs
where
    F: FnOnce() -> String,
{
    let Stripped { unique, mut attrs } = strip_unique_attr(attrs);
    match (unique, attrs.contains_key(name)) {
        (Some(value), false) => {
            attrs.insert(name.to_owned(), value);
        }
        (Some(value), true) if override_existing => {
            attrs.insert(name.to_owned(), value);
        }
        (Some(_), true) => {}
        (None, true) => {}
        (None, false) => {
            if let Some(default) = default {
                attrs.insert(name.to_owned(), default());
            }
        }
    }
    attrs
}
