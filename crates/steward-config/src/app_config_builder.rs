use std::marker::PhantomData;
use std::path::PathBuf;

use steward_core::Label;

use crate::{AppConfig, ConfigInitializationError, Configurable};

/// Where the config file lives.
pub enum ConfigDir {
    /// The platform config directory for the label.
    ProjectDir(Label),
    Custom(PathBuf),
}

pub struct AppConfigBuilder<T: Configurable> {
    pub(crate) config_dir: ConfigDir,
    pub(crate) config_filename: Option<String>,
    _phantom: PhantomData<T>,
}

impl<T: Configurable> AppConfigBuilder<T> {
    pub(crate) fn new(config_dir: ConfigDir) -> Self {
        Self {
            config_dir,
            config_filename: None,
            _phantom: Default::default(),
        }
    }

    pub fn with_config_filename(mut self, filename: impl Into<String>) -> Self {
        self.config_filename = Some(filename.into());
        self
    }

    pub fn build(self) -> Result<AppConfig<T>, ConfigInitializationError> {
        AppConfig::<T>::from_builder(self)
    }
}
