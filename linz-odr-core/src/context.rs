//! Context values used while describing stacks.
//!
//! Context is loaded the same way the CDK toolkit loads it: the `context` object
//! of a `cdk.json` file, then `key=value` overrides given on the command line.
//! Lookups go through the [`ContextProvider`] trait so the ARN helpers never
//! reach for global state.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::ContextError;

/// Key of the context object inside `cdk.json`
const CDK_JSON_CONTEXT_KEY: &str = "context";

/// A key-value source of configuration queried at resource definition time.
pub trait ContextProvider {
    /// Look up a context value, `None` if the key is not set.
    fn try_get_context(&self, key: &str) -> Option<&Value>;
}

impl<S: BuildHasher> ContextProvider for HashMap<String, Value, S> {
    fn try_get_context(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }
}

impl ContextProvider for BTreeMap<String, Value> {
    fn try_get_context(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }
}

impl ContextProvider for Map<String, Value> {
    fn try_get_context(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }
}

/// Context loaded from `cdk.json` and command line overrides.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    values: Map<String, Value>,
}

impl Context {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the contents of a `cdk.json` file.
    ///
    /// A file without a `context` object yields an empty context.
    pub fn from_cdk_json_str(json: &str, origin: &str) -> Result<Self, ContextError> {
        let document: Value = serde_json::from_str(json).map_err(|source| ContextError::Json {
            origin: origin.to_string(),
            source,
        })?;

        let Value::Object(mut document) = document else {
            return Err(ContextError::NotAnObject {
                origin: origin.to_string(),
            });
        };

        match document.remove(CDK_JSON_CONTEXT_KEY) {
            None | Some(Value::Null) => {
                log::debug!("No context found in {}", origin);
                Ok(Self::new())
            }
            Some(Value::Object(values)) => {
                log::debug!("Loaded {} context values from {}", values.len(), origin);
                Ok(Self { values })
            }
            Some(_) => Err(ContextError::NotAnObject {
                origin: origin.to_string(),
            }),
        }
    }

    /// Read and parse a `cdk.json` file.
    pub fn from_cdk_json_file(path: impl AsRef<Path>) -> Result<Self, ContextError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ContextError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_cdk_json_str(&json, &path.display().to_string())
    }

    /// Set a context value, replacing any existing value for the key.
    #[must_use]
    pub fn with_value(mut self, key: impl Into<String>, value: Value) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    /// Apply a `key=value` override as given to `--context`.
    ///
    /// Override values are always strings, only the first `=` separates the
    /// key from the value.
    pub fn with_override(self, pair: &str) -> Result<Self, ContextError> {
        let (key, value) = Self::parse_override(pair)?;
        log::debug!("Context override {}={}", key, value);
        Ok(self.with_value(key, Value::String(value)))
    }

    /// Split a `key=value` override into its key and value.
    pub fn parse_override(pair: &str) -> Result<(String, String), ContextError> {
        match pair.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                Ok((key.trim().to_string(), value.to_string()))
            }
            _ => Err(ContextError::InvalidOverride {
                value: pair.to_string(),
            }),
        }
    }

    /// Number of context values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no context values are set
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ContextProvider for Context {
    fn try_get_context(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    const CDK_JSON: &str = r#"{
        "app": "npx tsx src/index.ts",
        "context": {
            "log-reader-role-arn": "arn:aws:iam::1234567890:role/LogReader",
            "datasets": ["nz-imagery", "nz-elevation"]
        }
    }"#;

    #[test]
    fn test_from_cdk_json_str() {
        let ctx = Context::from_cdk_json_str(CDK_JSON, "cdk.json").unwrap();
        assert_eq!(ctx.len(), 2);
        assert_eq!(
            ctx.try_get_context("log-reader-role-arn"),
            Some(&json!("arn:aws:iam::1234567890:role/LogReader"))
        );
        assert_eq!(
            ctx.try_get_context("datasets"),
            Some(&json!(["nz-imagery", "nz-elevation"]))
        );
        assert_eq!(ctx.try_get_context("app"), None);
    }

    #[test]
    fn test_missing_context_is_empty() {
        let ctx = Context::from_cdk_json_str(r#"{"app": "node index.js"}"#, "cdk.json").unwrap();
        assert!(ctx.is_empty());
    }

    #[test]
    fn test_rejects_non_object_context() {
        let err = Context::from_cdk_json_str(r#"{"context": []}"#, "cdk.json").unwrap_err();
        assert!(matches!(err, ContextError::NotAnObject { .. }));

        let err = Context::from_cdk_json_str("[]", "cdk.json").unwrap_err();
        assert!(matches!(err, ContextError::NotAnObject { .. }));
    }

    #[test]
    fn test_rejects_invalid_json() {
        let err = Context::from_cdk_json_str("{", "broken.json").unwrap_err();
        assert!(matches!(err, ContextError::Json { .. }));
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn test_from_cdk_json_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cdk.json");
        std::fs::write(&path, CDK_JSON).unwrap();

        let ctx = Context::from_cdk_json_file(&path).unwrap();
        assert_eq!(ctx.len(), 2);
    }

    #[test]
    fn test_from_missing_file() {
        let err = Context::from_cdk_json_file("does-not-exist/cdk.json").unwrap_err();
        assert!(matches!(err, ContextError::Io { .. }));
        assert!(err.to_string().contains("does-not-exist"));
    }

    #[test]
    fn test_override_replaces_file_value() {
        let ctx = Context::from_cdk_json_str(CDK_JSON, "cdk.json")
            .unwrap()
            .with_override("log-reader-role-arn=arn:aws:iam::1:role/Other")
            .unwrap();
        assert_eq!(
            ctx.try_get_context("log-reader-role-arn"),
            Some(&json!("arn:aws:iam::1:role/Other"))
        );
    }

    #[test]
    fn test_parse_override() {
        assert_eq!(
            Context::parse_override("a=b=c").unwrap(),
            ("a".to_string(), "b=c".to_string())
        );
        assert_eq!(
            Context::parse_override("empty=").unwrap(),
            ("empty".to_string(), String::new())
        );
        assert!(matches!(
            Context::parse_override("no-separator"),
            Err(ContextError::InvalidOverride { .. })
        ));
        assert!(matches!(
            Context::parse_override("=value"),
            Err(ContextError::InvalidOverride { .. })
        ));
    }

    #[test]
    fn test_map_providers() {
        let mut map = HashMap::new();
        map.insert("key".to_string(), json!("value"));
        assert_eq!(map.try_get_context("key"), Some(&json!("value")));
        assert_eq!(map.try_get_context("missing"), None);

        let tree: BTreeMap<String, Value> = BTreeMap::new();
        assert_eq!(tree.try_get_context("key"), None);
    }
}
