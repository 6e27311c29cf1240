//! Conversion between structured resources and their generic tree.
//!
//! Any resource that round-trips through serde is supported: typed
//! `k8s-openapi` workloads, `DynamicObject`s and raw JSON values alike.

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use snafu::{ResultExt, ensure};

use crate::error::{self, Error};

/// Converts `resource` into a generic tree whose root is an object.
///
/// # Errors
///
/// Returns [`Error::Conversion`] when the resource fails to serialize and
/// [`Error::NotAnObject`] when it does not serialize to an object.
pub fn to_tree<R>(resource: &R) -> Result<Value, Error>
where
    R: Serialize + ?Sized,
{
    let tree = serde_json::to_value(resource).context(error::ConversionSnafu)?;
    ensure!(tree.is_object(), error::NotAnObjectSnafu { kind: kind_of(&tree) });
    Ok(tree)
}

/// Replaces `resource` with the structured form of `tree`.
///
/// `resource` is left untouched when the tree does not fit its shape.
///
/// # Errors
///
/// Returns [`Error::Restore`] on a shape mismatch.
pub fn from_tree<R>(tree: Value, resource: &mut R) -> Result<(), Error>
where
    R: DeserializeOwned,
{
    *resource = serde_json::from_value(tree).context(error::RestoreSnafu)?;
    Ok(())
}

pub(crate) const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use k8s_openapi::api::apps::v1::Deployment;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_to_tree_of_typed_resource() {
        let tree = to_tree(&Deployment::default()).unwrap();
        assert_eq!(tree["kind"], json!("Deployment"));
        assert_eq!(tree["apiVersion"], json!("apps/v1"));
    }

    #[test]
    fn test_to_tree_rejects_scalar_root() {
        let err = to_tree(&json!("hello")).unwrap_err();
        assert!(matches!(err, Error::NotAnObject { kind: "string" }));
    }

    #[test]
    fn test_from_tree_replaces_resource() {
        let mut deployment = Deployment::default();
        let tree = json!({
            "apiVersion": "apps/v1",
            "kind": "Deployment",
            "metadata": { "name": "hello" },
        });
        from_tree(tree, &mut deployment).unwrap();
        assert_eq!(deployment.metadata.name.as_deref(), Some("hello"));
    }

    #[test]
    fn test_from_tree_keeps_resource_on_mismatch() {
        let mut deployment = Deployment::default();
        let tree = json!({ "metadata": { "name": 42 } });
        let err = from_tree(tree, &mut deployment).unwrap_err();
        assert!(matches!(err, Error::Restore { .. }));
        assert_eq!(deployment, Deployment::default());
    }
}
