//! Schema reference resolution: direct references and transitive closure.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::LoadError;
use crate::index::SchemaIndex;
use crate::types::UnresolvedRefs;

fn schema_ref_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // Name ends at the closing quote, a JSON escape, a further pointer segment or whitespace,
        // and never on sentence punctuation.
        Regex::new(r##"#/components/schemas/([^"\\/#\s]*[^"\\/#\s.,;:!?')\]])"##)
            .expect("static regex is valid")
    })
}

/// Find every schema name referenced anywhere in a serialized schema body.
///
/// Works on the serialized text, so references inside `properties`, `items`,
/// `allOf`/`oneOf`/`anyOf` and any other nesting are found uniformly.
pub fn direct_refs(body: &str) -> BTreeSet<String> {
    schema_ref_pattern()
        .captures_iter(body)
        .filter_map(|caps| caps.get(1))
        .map(|name| name.as_str().to_string())
        .collect()
}

/// Schema name a `$ref` value targets, if it points into `components.schemas`.
///
/// Uses the same name rule as [`direct_refs`], so a pointer into a schema
/// (`#/components/schemas/Pet/properties/name`) targets `Pet`.
pub(crate) fn ref_target(reference: &str) -> Option<&str> {
    let caps = schema_ref_pattern().captures(reference)?;
    if caps.get(0)?.start() != 0 {
        return None;
    }
    caps.get(1).map(|name| name.as_str())
}

/// Compute the transitive closure of schema references starting from `seeds`.
///
/// Each name is expanded at most once, so cyclic schema graphs terminate.
/// `origin` names whatever the seeds were taken from, for error context.
///
/// Names missing from the index are dropped with a warning under
/// [`UnresolvedRefs::Tolerate`]; the returned set only contains defined schemas.
///
/// # Errors
///
/// Returns `LoadError::UnresolvedReference` for the first missing name under
/// [`UnresolvedRefs::Deny`].
pub fn closure<'a, I>(
    seeds: I,
    index: &SchemaIndex,
    policy: UnresolvedRefs,
    origin: &str,
) -> Result<BTreeSet<String>, LoadError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut visited = BTreeSet::new();
    let mut unresolved = BTreeSet::new();
    let mut pending: Vec<(String, String)> = seeds
        .into_iter()
        .map(|name| (name.to_string(), origin.to_string()))
        .collect();

    while let Some((name, referenced_from)) = pending.pop() {
        if visited.contains(&name) {
            continue;
        }
        let Some(body) = index.get(&name) else {
            match policy {
                UnresolvedRefs::Tolerate => {
                    if unresolved.insert(name.clone()) {
                        tracing::warn!(schema = %name, from = %referenced_from, "ignoring unresolved schema reference");
                    }
                    continue;
                }
                UnresolvedRefs::Deny => {
                    return Err(LoadError::UnresolvedReference {
                        schema: name,
                        referenced_from,
                    });
                }
            }
        };

        for child in direct_refs(body) {
            if !visited.contains(&child) {
                pending.push((child, name.clone()));
            }
        }
        visited.insert(name);
    }

    Ok(visited)
}
