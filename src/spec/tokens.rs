//! Token substitution and override validation.
//!
//! A token is a JSON string leaf of the form `#name#`. Substitution replaces
//! each token with a runtime value; a token that resolves to nothing removes
//! its key (or array element) so that optional fields simply disappear from
//! the output.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use crate::content::MetadataStore;
use crate::error::Error;

/// Prefix of tokens resolved from per-item metadata (`#postmeta.key#`).
pub const POSTMETA_PREFIX: &str = "postmeta.";

/// Name inside a token string, or `None` if `s` is not a token.
///
/// Any non-empty text between a pair of `#` counts, so a malformed name in
/// an override is still caught by [`validate`].
pub fn token_name(s: &str) -> Option<&str> {
    let inner = s.strip_prefix('#')?.strip_suffix('#')?;
    (!inner.is_empty() && !inner.contains('#')).then_some(inner)
}

pub fn is_token(s: &str) -> bool {
    token_name(s).is_some()
}

pub fn is_postmeta_token(s: &str) -> bool {
    token_name(s).is_some_and(|name| name.starts_with(POSTMETA_PREFIX) && name.len() > POSTMETA_PREFIX.len())
}

/// Values available to a substitution, keyed by bare token name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenValues(BTreeMap<String, Value>);

impl TokenValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Into<Value>) {
        self.0.insert(name.to_string(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Values that make a token disappear instead of being written out.
///
/// Numbers are always kept, so a zero margin or column still renders.
fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// One substitution run over a template.
///
/// Metadata failures do not interrupt the walk: the affected key is removed
/// and the error is kept for the caller to report.
pub struct Substitution<'a> {
    values: &'a TokenValues,
    metadata: Option<(&'a dyn MetadataStore, &'a str)>,
    errors: Vec<Error>,
}

impl<'a> Substitution<'a> {
    pub fn new(values: &'a TokenValues) -> Self {
        Self {
            values,
            metadata: None,
            errors: Vec::new(),
        }
    }

    /// Resolve `#postmeta.*#` tokens from `store` for the item `context_id`.
    pub fn with_metadata(mut self, store: &'a dyn MetadataStore, context_id: &'a str) -> Self {
        self.metadata = Some((store, context_id));
        self
    }

    /// Substitute `template`. A top-level token that resolves to nothing
    /// yields `Value::Null`.
    pub fn apply(&mut self, template: &Value) -> Value {
        self.walk(template).unwrap_or(Value::Null)
    }

    pub fn into_errors(self) -> Vec<Error> {
        self.errors
    }

    fn walk(&mut self, value: &Value) -> Option<Value> {
        match value {
            Value::String(s) => match token_name(s) {
                Some(name) => self.resolve(name),
                None => Some(value.clone()),
            },
            Value::Array(items) => Some(Value::Array(
                items.iter().filter_map(|item| self.walk(item)).collect(),
            )),
            Value::Object(map) => Some(Value::Object(
                map.iter()
                    .filter_map(|(key, v)| self.walk(v).map(|v| (key.clone(), v)))
                    .collect(),
            )),
            other => Some(other.clone()),
        }
    }

    fn resolve(&mut self, name: &str) -> Option<Value> {
        if let Some(key) = name.strip_prefix(POSTMETA_PREFIX) {
            let (store, context_id) = self.metadata?;
            return match store.get_metadata(context_id, key) {
                Ok(Some(meta)) if !meta.is_empty() => Some(Value::String(meta)),
                Ok(_) => None,
                Err(err) => {
                    self.errors.push(err);
                    None
                }
            };
        }

        self.values
            .get(name)
            .filter(|v| !is_empty_value(v))
            .cloned()
    }
}

/// Substitute `template` with `values`, without metadata lookups.
pub fn substitute(template: &Value, values: &TokenValues) -> Value {
    Substitution::new(values).apply(template)
}

/// Every token string in `spec`.
pub fn find_tokens(spec: &Value) -> BTreeSet<String> {
    let mut tokens = BTreeSet::new();
    collect_tokens(spec, &mut tokens);
    tokens
}

fn collect_tokens(value: &Value, tokens: &mut BTreeSet<String>) {
    match value {
        Value::String(s) if is_token(s) => {
            tokens.insert(s.clone());
        }
        Value::Array(items) => items.iter().for_each(|v| collect_tokens(v, tokens)),
        Value::Object(map) => map.values().for_each(|v| collect_tokens(v, tokens)),
        _ => {}
    }
}

/// Check that `candidate` only uses tokens `default` uses, plus postmeta
/// tokens. On failure returns the offending tokens in sorted order.
pub fn validate(candidate: &Value, default: &Value) -> Result<(), Vec<String>> {
    let allowed = find_tokens(default);
    let invalid: Vec<String> = find_tokens(candidate)
        .into_iter()
        .filter(|t| !allowed.contains(t) && !is_postmeta_token(t))
        .collect();
    if invalid.is_empty() {
        Ok(())
    } else {
        Err(invalid)
    }
}
