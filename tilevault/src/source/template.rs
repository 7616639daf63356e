//! URL template expansion
//!
//! Tile sources describe their endpoints with placeholder templates such
//! as `https://{s}.tile.example.org/{z}/{x}/{y}{r}.png`. Expansion
//! substitutes every placeholder for which a value is provided and leaves
//! unknown placeholders verbatim, so a `{s}` with no configured
//! subdomains survives as literal text in the cache key.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Matches `{name}` placeholders, allowing the `-y` TMS alias.
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\s*([\w-]+)\s*\}").expect("placeholder pattern is valid"));

/// Substitutes `{name}` placeholders in `template` with values from `data`.
///
/// Placeholders without a value are left untouched; substitution is a
/// single pass, so substituted values are never re-scanned.
pub fn expand_template(template: &str, data: &HashMap<String, String>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| match data.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}
