//! Multi-match path queries over a generic tree.
//!
//! The syntax follows the subset of kubectl JSONPath that is useful for
//! locating containers:
//!
//! - `.spec.template.spec.containers[*]` (field traversal and wildcard)
//! - `$.spec.containers[0]` (optional root marker, list index)
//! - `.metadata['annotations']` (quoted field)
//! - `.spec.*` (wildcard over object values)
//! - `{.spec.containers[*]}` (template braces are accepted and ignored)
//!
//! Compiling fails on malformed input; evaluating never fails. List elements
//! are yielded in list order. A wildcard over an object yields its values in
//! ascending key order, since the tree does not keep the order keys were
//! written in. `null` nodes never match.

mod error;

use std::{fmt, str::FromStr};

use serde_json::Value;
use snafu::OptionExt;

pub use self::error::Error;

#[derive(Clone, Debug, Eq, PartialEq)]
enum Step {
    Field(String),
    Index(usize),
    Wildcard,
}

impl Step {
    fn select<'a>(&self, node: &'a Value) -> Vec<&'a Value> {
        match node {
            Value::Object(map) => match self {
                Self::Field(name) => map.get(name).into_iter().collect(),
                Self::Wildcard => map.values().collect(),
                Self::Index(_) => Vec::new(),
            },
            Value::Array(items) => match self {
                Self::Index(index) => items.get(*index).into_iter().collect(),
                Self::Wildcard => items.iter().collect(),
                Self::Field(_) => Vec::new(),
            },
            _ => Vec::new(),
        }
    }

    fn select_mut<'a>(&self, node: &'a mut Value) -> Vec<&'a mut Value> {
        match node {
            Value::Object(map) => match self {
                Self::Field(name) => map.get_mut(name).into_iter().collect(),
                Self::Wildcard => map.values_mut().collect(),
                Self::Index(_) => Vec::new(),
            },
            Value::Array(items) => match self {
                Self::Index(index) => items.get_mut(*index).into_iter().collect(),
                Self::Wildcard => items.iter_mut().collect(),
                Self::Field(_) => Vec::new(),
            },
            _ => Vec::new(),
        }
    }
}

/// A compiled path query.
///
/// Compile once and evaluate against any number of trees. The source
/// expression is kept for display and error messages.
///
/// ```rust,ignore
/// let query = Query::compile(".spec.template.spec.containers[*]")?;
/// for container in query.evaluate(&tree) {
///     println!("{}", container["name"]);
/// }
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Query {
    expression: String,
    steps: Vec<Step>,
}

impl Query {
    /// Parses `expression` into a query.
    ///
    /// Leading and trailing whitespace is ignored, as are the `{ }` template
    /// braces and the `$` root marker.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] describing the first malformed part of
    /// `expression`.
    pub fn compile(expression: &str) -> Result<Self, Error> {
        Ok(Self { expression: expression.to_string(), steps: parse(expression)? })
    }

    /// The expression this query was compiled from, verbatim.
    #[inline]
    #[must_use]
    pub fn expression(&self) -> &str { &self.expression }

    /// Returns every node of `root` the query selects.
    ///
    /// Steps that do not fit the node they meet (a field on a list, an index
    /// on an object, anything on a scalar) select nothing, so a resource
    /// lacking the shape yields an empty list rather than an error. A query
    /// without steps selects the root itself.
    #[must_use]
    pub fn evaluate<'a>(&self, root: &'a Value) -> Vec<&'a Value> {
        let mut matches = vec![root];
        for step in &self.steps {
            matches = matches.into_iter().flat_map(|node| step.select(node)).collect();
        }
        matches.retain(|node| !node.is_null());
        matches
    }

    /// Same matches as [`Query::evaluate`], borrowed mutably.
    ///
    /// The matches never overlap: every step descends strictly below the
    /// nodes selected by the previous one.
    #[must_use]
    pub fn evaluate_mut<'a>(&self, root: &'a mut Value) -> Vec<&'a mut Value> {
        let mut matches = vec![root];
        for step in &self.steps {
            matches = matches.into_iter().flat_map(|node| step.select_mut(node)).collect();
        }
        matches.retain(|node| !node.is_null());
        matches
    }
}

impl FromStr for Query {
    type Err = Error;

    fn from_str(expression: &str) -> Result<Self, Self::Err> { Self::compile(expression) }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.expression) }
}

fn parse(expression: &str) -> Result<Vec<Step>, Error> {
    let trimmed = expression.trim();
    let body = match trimmed.strip_prefix('{') {
        Some(rest) => rest.strip_suffix('}').context(error::UnbalancedBraceSnafu)?.trim(),
        None => trimmed,
    };
    if body.is_empty() {
        return error::EmptyExpressionSnafu.fail();
    }

    let chars = body.chars().collect::<Vec<_>>();
    let mut steps = Vec::new();
    let mut position = usize::from(chars[0] == '$');
    while position < chars.len() {
        match chars[position] {
            '.' => {
                position += 1;
                if chars.get(position) == Some(&'*') {
                    steps.push(Step::Wildcard);
                    position += 1;
                    continue;
                }
                let start = position;
                while position < chars.len() && !matches!(chars[position], '.' | '[' | ']') {
                    position += 1;
                }
                if start == position {
                    return error::EmptyFieldSnafu { position: start }.fail();
                }
                steps.push(Step::Field(chars[start..position].iter().collect()));
            }
            '[' => {
                let close = chars[position..]
                    .iter()
                    .position(|c| *c == ']')
                    .map(|offset| position + offset)
                    .context(error::UnterminatedBracketSnafu { position })?;
                let selector = chars[position + 1..close].iter().collect::<String>();
                steps.push(parse_selector(selector.trim(), position)?);
                position = close + 1;
            }
            character => return error::UnexpectedCharacterSnafu { character, position }.fail(),
        }
    }
    Ok(steps)
}

fn parse_selector(selector: &str, position: usize) -> Result<Step, Error> {
    if selector == "*" {
        return Ok(Step::Wildcard);
    }
    for quote in ['\'', '"'] {
        if let Some(field) =
            selector.strip_prefix(quote).and_then(|rest| rest.strip_suffix(quote))
            && !field.is_empty()
        {
            return Ok(Step::Field(field.to_string()));
        }
    }
    selector
        .parse::<usize>()
        .map(Step::Index)
        .ok()
        .context(error::InvalidSelectorSnafu { selector, position })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn names(matches: &[&Value]) -> Vec<String> {
        matches.iter().map(|node| node["name"].as_str().unwrap_or_default().to_string()).collect()
    }

    #[test]
    fn test_compile_field_and_wildcard() {
        let query = Query::compile(".spec.template.spec.containers[*]").unwrap();
        assert_eq!(
            query.steps,
            vec![
                Step::Field("spec".to_string()),
                Step::Field("template".to_string()),
                Step::Field("spec".to_string()),
                Step::Field("containers".to_string()),
                Step::Wildcard,
            ]
        );
    }

    #[test]
    fn test_compile_root_braces_quotes_and_index() {
        let query = Query::compile("{$.metadata['annotations'][0].*}").unwrap();
        assert_eq!(
            query.steps,
            vec![
                Step::Field("metadata".to_string()),
                Step::Field("annotations".to_string()),
                Step::Index(0),
                Step::Wildcard,
            ]
        );
        assert_eq!(query.to_string(), "{$.metadata['annotations'][0].*}");
    }

    #[test]
    fn test_compile_root_only() {
        let query = Query::compile("$").unwrap();
        let tree = json!({ "a": 1 });
        assert_eq!(query.evaluate(&tree), vec![&tree]);
    }

    #[test]
    fn test_compile_unterminated_bracket() {
        assert_eq!(Query::compile("["), Err(Error::UnterminatedBracket { position: 0 }));
        assert_eq!(
            Query::compile(".spec.containers[*"),
            Err(Error::UnterminatedBracket { position: 16 })
        );
    }

    #[test]
    fn test_compile_errors() {
        assert_eq!(Query::compile(""), Err(Error::EmptyExpression));
        assert_eq!(Query::compile("{}"), Err(Error::EmptyExpression));
        assert_eq!(Query::compile("{.spec"), Err(Error::UnbalancedBrace));
        assert_eq!(Query::compile(".spec..name"), Err(Error::EmptyField { position: 6 }));
        assert_eq!(
            Query::compile("spec"),
            Err(Error::UnexpectedCharacter { character: 's', position: 0 })
        );
        assert_eq!(
            Query::compile(".spec[?(@.x)]"),
            Err(Error::InvalidSelector { selector: "?(@.x)".to_string(), position: 5 })
        );
        assert!(".spec]".parse::<Query>().is_err());
    }

    #[test]
    fn test_evaluate_preserves_document_order() {
        let tree = json!({
            "spec": { "containers": [{ "name": "a" }, { "name": "b" }, { "name": "c" }] }
        });
        let query = Query::compile(".spec.containers[*]").unwrap();
        assert_eq!(names(&query.evaluate(&tree)), ["a", "b", "c"]);
    }

    #[test]
    fn test_evaluate_nested_wildcards() {
        let tree = json!({
            "pods": [
                { "containers": [{ "name": "a" }, { "name": "b" }] },
                { "containers": [] },
                { "containers": [{ "name": "c" }] },
            ]
        });
        let query = Query::compile(".pods[*].containers[*]").unwrap();
        assert_eq!(names(&query.evaluate(&tree)), ["a", "b", "c"]);
    }

    #[test]
    fn test_evaluate_object_wildcard_in_key_order() {
        let tree = json!({
            "sidecars": {
                "zeta": { "name": "z" },
                "alpha": { "name": "a" },
                "mid": { "name": "m" },
            }
        });
        let query = Query::compile(".sidecars.*").unwrap();
        assert_eq!(names(&query.evaluate(&tree)), ["a", "m", "z"]);
    }

    #[test]
    fn test_evaluate_index() {
        let tree = json!({ "containers": [{ "name": "a" }, { "name": "b" }] });
        assert_eq!(names(&Query::compile(".containers[1]").unwrap().evaluate(&tree)), ["b"]);
        assert!(Query::compile(".containers[7]").unwrap().evaluate(&tree).is_empty());
    }

    #[test]
    fn test_evaluate_missing_or_mismatched_shape_is_empty() {
        let tree = json!({ "spec": { "containers": "oops", "replicas": 1 } });
        for expression in [".foo.bar", ".spec.containers[*]", ".spec.replicas.name", ".spec[0]"] {
            let query = Query::compile(expression).unwrap();
            assert!(query.evaluate(&tree).is_empty(), "{expression}");
        }
    }

    #[test]
    fn test_evaluate_skips_null() {
        let tree = json!({ "spec": { "initContainers": null, "containers": [null, { "name": "a" }] } });
        assert!(Query::compile(".spec.initContainers").unwrap().evaluate(&tree).is_empty());
        assert_eq!(names(&Query::compile(".spec.containers[*]").unwrap().evaluate(&tree)), ["a"]);
    }

    #[test]
    fn test_evaluate_mut_yields_same_matches() {
        let mut tree = json!({
            "spec": { "containers": [{ "name": "a" }, { "name": "b" }] }
        });
        let query = Query::compile(".spec.containers[*]").unwrap();
        for (index, node) in query.evaluate_mut(&mut tree).into_iter().enumerate() {
            node["index"] = json!(index);
        }
        assert_eq!(
            tree,
            json!({
                "spec": {
                    "containers": [{ "name": "a", "index": 0 }, { "name": "b", "index": 1 }]
                }
            })
        );
    }
}
