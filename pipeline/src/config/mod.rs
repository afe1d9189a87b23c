//! Provider configuration, read from a YAML file.

pub mod provider;

use std::{fs::File, io::Read, path::Path};

use anyhow::{Context, Result};
use hashbrown::HashMap;
use serde::Deserialize;

use crate::error::ConfigError;

pub use provider::Provider;

/// Loads the provider configuration from the YAML file at `path`.
pub fn load_providers_file(path: &Path) -> Result<ProviderSet> {
    let rdr = File::open(path)
        .with_context(|| format!("opening provider configuration file {path:?}"))?;
    load_providers(rdr).with_context(|| format!("loading provider configuration file {path:?}"))
}

/// Loads the provider configuration from YAML read from `rdr`.
pub fn load_providers<R: Read>(rdr: R) -> Result<ProviderSet> {
    let config: YamlConfig =
        serde_yaml_ng::from_reader(rdr).context("parsing provider configuration")?;
    Ok(config.prepare()?)
}

/// Prepared providers, keyed by provider ID.
#[derive(Debug)]
pub struct ProviderSet {
    providers: HashMap<String, Provider>,
}

impl ProviderSet {
    pub fn get(&self, id: &str) -> Result<&Provider, ConfigError> {
        self.providers
            .get(id)
            .ok_or_else(|| ConfigError::UnknownProvider(id.to_string()))
    }

    /// Provider IDs, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

/// Top level configuration, read from the YAML file.
#[derive(Deserialize, Debug)]
struct YamlConfig {
    providers: HashMap<String, provider::YamlProvider>,
}

impl YamlConfig {
    /// Creates a [ProviderSet] from self.
    fn prepare(self) -> Result<ProviderSet, ConfigError> {
        let providers = self
            .providers
            .into_iter()
            .map(|(id, provider)| {
                let provider = provider.prepare(id.clone())?;
                Ok((id, provider))
            })
            .collect::<Result<_, ConfigError>>()?;
        Ok(ProviderSet { providers })
    }
}
