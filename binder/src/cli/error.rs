use std::path::PathBuf;

use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("{source}"))]
    Configuration { source: crate::config::Error },

    #[snafu(display("Failed to read manifest from {}, error: {source}", file_path.display()))]
    ReadManifest { file_path: PathBuf, source: std::io::Error },

    #[snafu(display("Failed to parse manifest document #{index}, error: {source}"))]
    ParseManifest { index: usize, source: serde_yaml::Error },

    #[snafu(display("Failed to decode manifest document #{index} as a resource, error: {source}"))]
    DecodeManifest { index: usize, source: serde_json::Error },

    #[snafu(display("Failed to serialize manifest, error: {source}"))]
    SerializeManifest { source: serde_yaml::Error },

    #[snafu(display("Failed to bind {kind} {name}, error: {source}"))]
    BindResource {
        kind: String,
        name: String,
        #[snafu(source(from(binder_engine::Error, Box::new)))]
        source: Box<binder_engine::Error>,
    },

    #[snafu(display("Failed to inspect {kind} {name}, error: {source}"))]
    InspectResource {
        kind: String,
        name: String,
        #[snafu(source(from(binder_engine::Error, Box::new)))]
        source: Box<binder_engine::Error>,
    },

    #[snafu(display("Failed to write to stdout, error: {source}"))]
    WriteStdout { source: std::io::Error },
}

impl From<crate::config::Error> for Error {
    fn from(source: crate::config::Error) -> Self { Self::Configuration { source } }
}
