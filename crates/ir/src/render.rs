// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Identifier quoting shared by every `Display` impl in this crate.

use std::borrow::Cow;

/// Words that must be quoted even when they are otherwise plain identifiers
const RESERVED: &[&str] = &[
    "all", "and", "as", "asc", "between", "by", "case", "cross", "default", "delete", "desc",
    "distinct", "drop", "else", "end", "except", "exists", "from", "full", "group", "having",
    "in", "index", "inner", "insert", "intersect", "into", "is", "join", "key", "left", "like",
    "limit", "natural", "not", "null", "offset", "on", "or", "order", "outer", "primary",
    "references", "right", "select", "set", "table", "then", "union", "unique", "update",
    "user", "using", "values", "when", "where", "with",
];

fn is_bare(name: &str) -> bool {
    let mut chars = name.chars();
    let starts_ok = matches!(chars.next(), Some(c) if c == '_' || c.is_ascii_lowercase());
    starts_ok
        && chars.all(|c| c == '_' || c.is_ascii_lowercase() || c.is_ascii_digit())
        && !RESERVED.contains(&name)
}

/// Quote an identifier for rendering.
///
/// Lower-case identifiers made of `[a-z0-9_]` that are not reserved words are
/// emitted as-is; anything else is wrapped in double quotes with embedded
/// quotes doubled.
pub fn quote_ident(name: &str) -> Cow<'_, str> {
    if is_bare(name) {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(format!("\"{}\"", name.replace('"', "\"\"")))
    }
}
