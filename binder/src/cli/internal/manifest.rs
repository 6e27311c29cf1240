use std::{
    io::Write,
    path::{Path, PathBuf},
};

use kube::core::DynamicObject;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

use crate::cli::error::{self, Error};

/// File name standing for standard input.
const STDIN: &str = "-";

/// The resources of a multi-document YAML stream, in input order.
#[derive(Clone, Debug, Default)]
pub struct Manifest {
    pub objects: Vec<DynamicObject>,
}

impl Manifest {
    /// Reads `file`, or standard input when it is `None` or `-`.
    pub fn read(file: Option<&Path>) -> Result<Self, Error> {
        let data = match file {
            Some(path) if path != Path::new(STDIN) => std::fs::read_to_string(path)
                .context(error::ReadManifestSnafu { file_path: path.to_path_buf() })?,
            _ => std::io::read_to_string(std::io::stdin()).context(error::ReadManifestSnafu {
                file_path: PathBuf::from(STDIN),
            })?,
        };
        Self::parse(&data)
    }

    /// Parses every document of `data`. Empty documents are skipped.
    pub fn parse(data: &str) -> Result<Self, Error> {
        let mut objects = Vec::new();
        for (index, document) in serde_yaml::Deserializer::from_str(data).enumerate() {
            let value = serde_json::Value::deserialize(document)
                .context(error::ParseManifestSnafu { index })?;
            if value.is_null() {
                continue;
            }
            let object: DynamicObject =
                serde_json::from_value(value).context(error::DecodeManifestSnafu { index })?;
            objects.push(object);
        }
        Ok(Self { objects })
    }
}

/// Returns the `apiVersion` and `kind` of `object`, empty when unset.
pub fn type_of(object: &DynamicObject) -> (&str, &str) {
    object
        .types
        .as_ref()
        .map_or(("", ""), |types| (types.api_version.as_str(), types.kind.as_str()))
}

/// Renders `documents` as a YAML stream.
pub fn render<T: Serialize>(documents: &[T]) -> Result<String, Error> {
    let documents = documents
        .iter()
        .map(|document| serde_yaml::to_string(document).context(error::SerializeManifestSnafu))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(documents.join("---\n"))
}

pub fn write_stdout(data: &str) -> Result<(), Error> {
    std::io::stdout().write_all(data.as_bytes()).context(error::WriteStdoutSnafu)
}
