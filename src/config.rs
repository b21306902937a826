// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query engine configuration.
//!
//! Options can be set in code ([`QueryOptions`](crate::QueryOptions)) or
//! loaded from a TOML file:
//!
//! ```toml
//! default_page_size = 20
//! max_page_size = 100
//! stop_words = ["a", "an", "the"]
//! ```
//!
//! Every key is optional.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{HunchError, Result};
use crate::query::DEFAULT_PAGE_SIZE;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HunchConfig {
    /// Page size for queries that don't specify one.
    pub default_page_size: usize,
    /// Largest page size callers are expected to ask for.
    pub max_page_size: Option<usize>,
    /// Query-time stop words. Overrides the bundle's own list.
    pub stop_words: Option<Vec<String>>,
}

impl Default for HunchConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: None,
            stop_words: None,
        }
    }
}

impl HunchConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)
            .map_err(|e| HunchError::config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
            .map_err(|e| HunchError::config(format!("{}: {}", path.display(), e)))
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(max) = self.max_page_size {
            if self.default_page_size > max {
                return Err(HunchError::config(format!(
                    "default_page_size {} exceeds max_page_size {}",
                    self.default_page_size, max
                )));
            }
        }
        Ok(())
    }
}
