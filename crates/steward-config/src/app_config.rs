use std::fs::{File, create_dir_all};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use arc_swap::ArcSwap;
use confique::{Config, toml};
use directories::ProjectDirs;
use tracing::debug;

use crate::{
    AppConfigBuilder, ConfigDir, ConfigInitializationError, ConfigLoadError, io_error,
};

pub trait Configurable: Config + Default + Send + Sync + Clone + 'static {}

impl<T> Configurable for T where T: Config + Default + Send + Sync + Clone + 'static {}

/// A TOML config file, created from its template on first use. Values from
/// the environment take precedence over the file.
#[derive(Clone, Debug)]
pub struct AppConfig<T: Configurable> {
    config_dir: PathBuf,
    filename: String,
    config: Arc<ArcSwap<T>>,
}

impl<T: Configurable> AppConfig<T> {
    pub fn builder(config_dir: ConfigDir) -> AppConfigBuilder<T> {
        AppConfigBuilder::new(config_dir)
    }

    pub(crate) fn from_builder(
        builder: AppConfigBuilder<T>,
    ) -> Result<Self, ConfigInitializationError> {
        let config_dir = match builder.config_dir {
            ConfigDir::Custom(config_dir) => config_dir,
            ConfigDir::ProjectDir(label) => {
                ProjectDirs::from(&label.qualifier, &label.organization, &label.application)
                    .ok_or(ConfigInitializationError::NoHomeDir)?
                    .config_dir()
                    .to_owned()
            }
        };

        let instance = Self {
            config_dir,
            filename: builder
                .config_filename
                .unwrap_or_else(|| "config.toml".to_owned()),
            config: Arc::new(ArcSwap::new(Arc::new(T::default()))),
        };
        instance
            .ensure_created()
            .map_err(|e| ConfigInitializationError::CreationFailure(instance.full_path(), e))?;
        instance.read_config()?;
        Ok(instance)
    }

    pub fn ensure_created(&self) -> io::Result<()> {
        let full_path = self.full_path();
        if full_path.exists() {
            debug!("Not creating config file {full_path:#?} because it already exists");
            return Ok(());
        }

        self.overwrite_config_file()
    }

    pub fn config_template(&self) -> String {
        toml::template::<T>(toml::FormatOptions::default())
    }

    pub fn full_path(&self) -> PathBuf {
        self.config_dir.join(&self.filename)
    }

    pub fn contents(&self) -> io::Result<String> {
        let full_path = self.full_path();
        std::fs::read_to_string(&full_path)
            .map_err(|e| io_error(&format!("Error reading config file {full_path:#?}"), e))
    }

    /// Replaces the file with the commented-out template.
    pub fn overwrite_config_file(&self) -> io::Result<()> {
        create_dir_all(&self.config_dir).map_err(|e| {
            io_error(
                &format!("Error creating config dir {:#?}", self.config_dir),
                e,
            )
        })?;
        let full_path = self.full_path();
        let mut file = File::create(&full_path)
            .map_err(|e| io_error(&format!("Error creating config file {full_path:#?}"), e))?;

        file.write_all(self.config_template().as_bytes())
            .map_err(|e| io_error("Error writing config template", e))?;
        Ok(())
    }

    /// The values as of the last successful load.
    pub fn snapshot(&self) -> Arc<T> {
        self.config.load_full()
    }

    pub fn read_config(&self) -> Result<Arc<T>, ConfigLoadError> {
        let full_path = self.full_path();
        let val = T::builder()
            .env()
            .file(&full_path)
            .load()
            .map_err(|e| ConfigLoadError(full_path, e.to_string()))?;
        let val = Arc::new(val);
        self.config.store(val.clone());
        Ok(val)
    }
}

#[cfg(test)]
#[path = "./app_config_test.rs"]
mod app_config_test;
