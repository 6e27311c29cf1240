use snafu::Snafu;

/// Errors raised while projecting a resource or injecting a binding.
///
/// A pointer that resolves to nothing is never an error; reads fall back to
/// the zero value of the requested shape.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Failed to convert resource into a generic tree, error: {source}"))]
    Conversion { source: serde_json::Error },

    #[snafu(display("Failed to convert resource into a generic tree, expected an object, got {kind}"))]
    NotAnObject { kind: &'static str },

    #[snafu(display("Failed to restore resource from its generic tree, error: {source}"))]
    Restore { source: serde_json::Error },

    #[snafu(display("Failed to compile path query '{expression}', error: {source}"))]
    CompileQuery { expression: String, source: crate::query::Error },

    #[snafu(display(
        "Failed to write {pointer}, key '{key}' cannot be created below {path} which is not an \
         object"
    ))]
    PathConflict { pointer: String, key: String, path: String },

    #[snafu(display("Failed to decode value at {pointer}, error: {source}"))]
    DecodeValue { pointer: String, source: serde_json::Error },

    #[snafu(display("Failed to encode value for {pointer}, error: {source}"))]
    EncodeValue { pointer: String, source: serde_json::Error },

    #[snafu(display(
        "Resource has {found} containers matching the mapping but the template carries {expected}"
    ))]
    ContainerMismatch { expected: usize, found: usize },

    #[snafu(display(
        "Container #{position} is named '{found}' in the resource but '{expected}' in the template"
    ))]
    ContainerRenamed { position: usize, expected: String, found: String },
}
