//! Flattening of the nested configuration document.
//!
//! # Responsibilities
//! - Project a parsed YAML tree onto a flat map of canonical paths to scalars
//! - Render canonical paths as `/`-joined segments with a leading slash
//! - Keep the projection lossless: exactly one entry per leaf, no coercion
//!
//! # Design Decisions
//! - Recursion carries an immutable path prefix per call; there is no shared
//!   traversal state to backtrack
//! - Scalar values are a closed variant, so consumers match every case
//!   instead of relying on implicit coercion
//! - `null` leaves are preserved as entries; an absent key and a `null` value
//!   are observably different conditions

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

use serde_yaml::Value;

use crate::config::{ConfigError, ConfigResult};

/// A leaf value of the configuration document.
///
/// YAML integers outside the `i64` range degrade to `Float`.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl Scalar {
    /// Human-readable kind name, used in `TypeMismatch` errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Scalar::Null => "null",
            Scalar::Bool(_) => "boolean",
            Scalar::Int(_) => "integer",
            Scalar::Float(_) => "float",
            Scalar::String(_) => "string",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Scalar::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => write!(f, "null"),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::String(s) => write!(f, "{}", s),
        }
    }
}

/// Flat mapping from canonical path to leaf scalar.
///
/// Canonical paths look like `/farmer/pool_public_keys/0` — the segments
/// traversed from the document root, `/`-joined, with sequence indices
/// rendered in decimal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatConfig(BTreeMap<String, Scalar>);

impl FlatConfig {
    pub fn get(&self, path: &str) -> Option<&Scalar> {
        self.0.get(path)
    }

    /// Look up a string value. `MissingKey` if absent, `TypeMismatch` if the
    /// value is any other scalar kind (including `null`).
    pub fn get_str(&self, path: &str) -> ConfigResult<&str> {
        let value = self.require(path)?;
        value.as_str().ok_or_else(|| ConfigError::TypeMismatch {
            key: path.to_string(),
            expected: "string",
            found: value.kind(),
        })
    }

    pub fn get_int(&self, path: &str) -> ConfigResult<i64> {
        let value = self.require(path)?;
        value.as_int().ok_or_else(|| ConfigError::TypeMismatch {
            key: path.to_string(),
            expected: "integer",
            found: value.kind(),
        })
    }

    pub fn get_bool(&self, path: &str) -> ConfigResult<bool> {
        let value = self.require(path)?;
        value.as_bool().ok_or_else(|| ConfigError::TypeMismatch {
            key: path.to_string(),
            expected: "boolean",
            found: value.kind(),
        })
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Scalar> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn require(&self, path: &str) -> ConfigResult<&Scalar> {
        self.0
            .get(path)
            .ok_or_else(|| ConfigError::MissingKey(path.to_string()))
    }
}

impl<'a> IntoIterator for &'a FlatConfig {
    type Item = (&'a String, &'a Scalar);
    type IntoIter = btree_map::Iter<'a, String, Scalar>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Flatten a parsed configuration document into its canonical-path map.
///
/// Every leaf of `doc` yields exactly one entry; empty mappings and sequences
/// yield none. A document whose root is itself a scalar has no addressable
/// leaves and flattens to the empty map.
pub fn flatten(doc: &Value) -> FlatConfig {
    let mut out = BTreeMap::new();
    flatten_node(doc, "", &mut out);
    FlatConfig(out)
}

fn flatten_node(node: &Value, path: &str, out: &mut BTreeMap<String, Scalar>) {
    match node {
        Value::Mapping(map) => {
            for (key, value) in map {
                if let Some(segment) = key_segment(key) {
                    flatten_node(value, &format!("{}/{}", path, segment), out);
                }
            }
        }
        Value::Sequence(seq) => {
            for (index, value) in seq.iter().enumerate() {
                flatten_node(value, &format!("{}/{}", path, index), out);
            }
        }
        // A tag does not change where the node lives in the tree.
        Value::Tagged(tagged) => flatten_node(&tagged.value, path, out),
        Value::Null if !path.is_empty() => {
            out.insert(path.to_string(), Scalar::Null);
        }
        Value::Bool(b) if !path.is_empty() => {
            out.insert(path.to_string(), Scalar::Bool(*b));
        }
        Value::Number(n) if !path.is_empty() => {
            out.insert(path.to_string(), number_scalar(n));
        }
        Value::String(s) if !path.is_empty() => {
            out.insert(path.to_string(), Scalar::String(s.clone()));
        }
        // Bare scalar root: nothing to address.
        _ => {}
    }
}

fn number_scalar(n: &serde_yaml::Number) -> Scalar {
    if let Some(i) = n.as_i64() {
        Scalar::Int(i)
    } else {
        Scalar::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}

/// Render a mapping key as a path segment. Mapping and sequence keys cannot
/// be addressed by a canonical path and are skipped.
fn key_segment(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Value {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn flattens_nested_mappings_and_sequences() {
        let flat = flatten(&parse("a:\n  b: 1\n  c: [10, 20]\n"));

        assert_eq!(flat.len(), 3);
        assert_eq!(flat.get("/a/b"), Some(&Scalar::Int(1)));
        assert_eq!(flat.get("/a/c/0"), Some(&Scalar::Int(10)));
        assert_eq!(flat.get("/a/c/1"), Some(&Scalar::Int(20)));
    }

    #[test]
    fn empty_document_flattens_to_empty_map() {
        let flat = flatten(&parse("{}"));
        assert!(flat.is_empty());
    }

    #[test]
    fn empty_containers_contribute_no_entries() {
        let flat = flatten(&parse("x: {}\ny: []\n"));
        assert!(flat.is_empty());
    }

    #[test]
    fn top_level_scalar_key_gets_single_segment_path() {
        let flat = flatten(&parse("daemon_port: 58400\n"));
        assert_eq!(flat.get("/daemon_port"), Some(&Scalar::Int(58400)));
    }

    #[test]
    fn sequence_of_mappings_uses_index_segments() {
        let flat = flatten(&parse(
            "peers:\n  - host: a\n    port: 1\n  - host: b\n    port: 2\n",
        ));

        assert_eq!(
            flat.get("/peers/0/host"),
            Some(&Scalar::String("a".to_string()))
        );
        assert_eq!(flat.get("/peers/1/port"), Some(&Scalar::Int(2)));
    }

    #[test]
    fn null_leaf_is_preserved_as_entry() {
        let flat = flatten(&parse("farmer:\n  pool_url:\n"));

        assert_eq!(flat.get("/farmer/pool_url"), Some(&Scalar::Null));
        assert!(flat.get("/farmer/absent").is_none());
    }

    #[test]
    fn scalars_keep_their_kind() {
        let flat = flatten(&parse(
            "name: mainnet\nenabled: true\nratio: 0.5\ncount: 7\n",
        ));

        assert_eq!(
            flat.get("/name"),
            Some(&Scalar::String("mainnet".to_string()))
        );
        assert_eq!(flat.get("/enabled"), Some(&Scalar::Bool(true)));
        assert_eq!(flat.get("/ratio"), Some(&Scalar::Float(0.5)));
        assert_eq!(flat.get("/count"), Some(&Scalar::Int(7)));
    }

    #[test]
    fn flatten_is_deterministic_across_calls() {
        let doc = parse("a:\n  b: [1, 2]\n  c:\n    d: x\n");
        assert_eq!(flatten(&doc), flatten(&doc));
    }

    #[test]
    fn entry_count_matches_leaf_count() {
        // 5 leaves: /a/b, /a/c/0, /a/c/1, /d, /e/0/f
        let doc = parse("a:\n  b: 1\n  c: [10, 20]\nd: x\ne:\n  - f: true\n");
        assert_eq!(flatten(&doc).len(), 5);
    }

    #[test]
    fn every_entry_retraverses_to_its_leaf() {
        let doc = parse("a:\n  b: 1\n  c: [10, 20]\nd: x\nnested:\n  - deep:\n      flag: true\n");
        let flat = flatten(&doc);

        for (path, value) in &flat {
            let mut node = &doc;
            for segment in path.split('/').skip(1) {
                node = match node {
                    Value::Mapping(map) => map
                        .iter()
                        .find(|(key, _)| matches!(key, Value::String(s) if s == segment))
                        .map(|(_, child)| child)
                        .unwrap_or_else(|| panic!("no key {} on the way to {}", segment, path)),
                    Value::Sequence(seq) => &seq[segment.parse::<usize>().unwrap()],
                    other => panic!("{} leads through a leaf: {:?}", path, other),
                };
            }
            match value {
                Scalar::Null => assert!(node.is_null()),
                Scalar::Bool(b) => assert_eq!(node.as_bool(), Some(*b)),
                Scalar::Int(i) => assert_eq!(node.as_i64(), Some(*i)),
                Scalar::Float(x) => assert_eq!(node.as_f64(), Some(*x)),
                Scalar::String(s) => assert_eq!(node.as_str(), Some(s.as_str())),
            }
        }
    }

    #[test]
    fn typed_accessors_report_missing_and_mismatched_keys() {
        let flat = flatten(&parse("daemon_port: 58400\nname: mainnet\n"));

        assert_eq!(flat.get_int("/daemon_port").unwrap(), 58400);
        assert_eq!(flat.get_str("/name").unwrap(), "mainnet");

        match flat.get_str("/missing") {
            Err(ConfigError::MissingKey(key)) => assert_eq!(key, "/missing"),
            other => panic!("expected MissingKey, got {:?}", other),
        }
        match flat.get_str("/daemon_port") {
            Err(ConfigError::TypeMismatch {
                expected, found, ..
            }) => {
                assert_eq!(expected, "string");
                assert_eq!(found, "integer");
            }
            other => panic!("expected TypeMismatch, got {:?}", other),
        }
    }

    #[test]
    fn null_value_is_a_type_mismatch_not_a_missing_key() {
        let flat = flatten(&parse("pool_url:\n"));

        match flat.get_str("/pool_url") {
            Err(ConfigError::TypeMismatch { found, .. }) => assert_eq!(found, "null"),
            other => panic!("expected TypeMismatch, got {:?}", other),
        }
    }
}
