//! Writing described configurations to disk
//!
//! `describe` never touches the filesystem; this is the step that does, for
//! callers that hand the bundler a file rather than an in-memory config.

use crate::codegen::{WebpackConfigGenerator, WEBPACK_CONFIG_FILE};
use crate::error::{PackerError, Result};
use crate::ir::{BuildConfig, ConfigValidationError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// On-disk form of an emitted configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmitFormat {
    /// `webpack.config.js` CommonJS module
    #[default]
    Webpack,
    /// `<name>.packer.json`
    Json,
}

/// Writes one [`BuildConfig`] into a directory
pub struct ConfigEmitter<'a> {
    config: &'a BuildConfig,
    format: EmitFormat,
}

impl<'a> ConfigEmitter<'a> {
    pub fn new(config: &'a BuildConfig) -> Self {
        Self {
            config,
            format: EmitFormat::default(),
        }
    }

    pub fn format(mut self, format: EmitFormat) -> Self {
        self.format = format;
        self
    }

    /// File name the emitter will use
    pub fn file_name(&self) -> Result<String> {
        match self.format {
            EmitFormat::Webpack => Ok(WEBPACK_CONFIG_FILE.to_string()),
            EmitFormat::Json => {
                let name = self.config.name().ok_or(ConfigValidationError::NoEntry)?;
                Ok(format!("{}.packer.json", name))
            }
        }
    }

    /// Validate, render and write into `dir` (created if missing).
    /// Returns the path written.
    pub fn write_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let dir = dir.as_ref();
        self.config.validate()?;

        let contents = match self.format {
            EmitFormat::Webpack => WebpackConfigGenerator::new(self.config)
                .relative_to(dir)
                .generate(),
            EmitFormat::Json => {
                let mut json = WebpackConfigGenerator::new(self.config).generate_json()?;
                json.push('\n');
                json
            }
        };

        fs::create_dir_all(dir).map_err(|source| PackerError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let path = dir.join(self.file_name()?);
        fs::write(&path, contents).map_err(|source| PackerError::Io {
            path: path.clone(),
            source,
        })?;

        info!("Wrote bundle config {}", path.display());
        Ok(path)
    }
}
