mod error;
mod mapping;

use std::path::{Path, PathBuf};

use binder_engine::PodMapping;
use resolve_path::PathResolveExt;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

pub use self::{error::Error, mapping::ResourceMapping};

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "Vec::new")]
    pub mappings: Vec<ResourceMapping>,

    #[serde(default = "binder_cli::config::LogConfig::default")]
    pub log: binder_cli::config::LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mappings: vec![ResourceMapping::cron_job()],
            log: binder_cli::config::LogConfig::default(),
        }
    }
}

impl Config {
    /// Returns the first existing configuration file among the default path
    /// and the fallback directories.
    pub fn search_config_file_path() -> Option<PathBuf> {
        std::iter::once(Self::default_path())
            .chain(binder_base::fallback_project_config_directories().into_iter().map(|mut path| {
                path.push(binder_base::CLI_CONFIG_NAME);
                path
            }))
            .find(|path| path.try_exists().unwrap_or(false))
    }

    #[inline]
    pub fn default_path() -> PathBuf {
        [binder_base::PROJECT_CONFIG_DIR.to_path_buf(), PathBuf::from(binder_base::CLI_CONFIG_NAME)]
            .into_iter()
            .collect()
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let mut config: Self = {
            let path =
                path.as_ref().try_resolve().map(|path| path.to_path_buf()).with_context(|_| {
                    error::ResolveFilePathSnafu { file_path: path.as_ref().to_path_buf() }
                })?;
            let data =
                std::fs::read(&path).context(error::OpenConfigSnafu { filename: path.clone() })?;
            serde_yaml::from_slice(&data).context(error::ParseConfigSnafu { filename: path })?
        };

        config.log.file_path = match config.log.file_path.map(|path| {
            path.try_resolve()
                .map(|path| path.to_path_buf())
                .with_context(|_| error::ResolveFilePathSnafu { file_path: path.clone() })
        }) {
            Some(Ok(path)) => Some(path),
            Some(Err(err)) => return Err(err),
            None => None,
        };

        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, Error> {
        serde_yaml::to_string(self).context(error::SerializeConfigSnafu)
    }

    /// Selects the mapping for a resource type.
    ///
    /// Configured mappings win in declaration order. Without a match a
    /// `batch/v1` `CronJob` uses the built-in `CronJob` mapping and everything
    /// else the default mapping.
    pub fn find_mapping(&self, api_version: &str, kind: &str) -> PodMapping {
        if let Some(found) = self.mappings.iter().find(|mapping| mapping.matches(api_version, kind))
        {
            return found.mapping.clone();
        }

        let cron_job = ResourceMapping::cron_job();
        if cron_job.matches(api_version, kind) { cron_job.mapping } else { PodMapping::default() }
    }
}
