//! JSON rule loading.
//!
//! The resource is a list of `{label, pattern}` objects where `pattern` is a
//! list of alternative patterns and each pattern a list of attribute maps.
//! Everything is validated here so that a [`Rule`] never holds an unknown
//! attribute or a wrongly typed value; the first problem aborts the load.

use crate::{Attr, AttrValue, ConfigError, Constraint, Rule, Step};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct RuleDef {
    label: String,
    pattern: Vec<Vec<Map<String, Value>>>,
}

pub(super) fn from_str(json: &str) -> Result<Vec<Rule>, ConfigError> {
    let defs: Vec<RuleDef> = serde_json::from_str(json)?;
    build(defs)
}

pub(super) fn from_path(path: &Path) -> Result<Vec<Rule>, ConfigError> {
    let file = File::open(path).map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
    let defs: Vec<RuleDef> = serde_json::from_reader(BufReader::new(file))?;
    tracing::debug!(path = %path.display(), rules = defs.len(), "read rule file");
    build(defs)
}

fn build(defs: Vec<RuleDef>) -> Result<Vec<Rule>, ConfigError> {
    defs.into_iter().map(build_rule).collect()
}

fn build_rule(def: RuleDef) -> Result<Rule, ConfigError> {
    let mut patterns = Vec::with_capacity(def.pattern.len());
    for steps in &def.pattern {
        let steps = steps.iter().map(|map| build_step(&def.label, map)).collect::<Result<Vec<_>, _>>()?;
        patterns.push(steps);
    }
    Rule::try_new(def.label, patterns)
}

fn build_step(label: &str, map: &Map<String, Value>) -> Result<Step, ConfigError> {
    let mut constraints = Vec::with_capacity(map.len());
    for (key, value) in map {
        let attr = Attr::from_key(key)
            .ok_or_else(|| ConfigError::UnknownAttribute { label: label.to_string(), attr: key.clone() })?;

        let value = match value {
            Value::Bool(b) if attr.is_boolean() => AttrValue::Bool(*b),
            Value::String(s) if !attr.is_boolean() => AttrValue::Str(s.clone()),
            _ => {
                return Err(ConfigError::InvalidValue {
                    label: label.to_string(),
                    attr: attr.name(),
                    expected: if attr.is_boolean() { "boolean" } else { "string" },
                });
            }
        };
        constraints.push(Constraint { attr, value });
    }
    Ok(Step::new(constraints))
}
