// Mon Oct 19 2026 - Alex

use crate::memory::Address;
use crate::output::{BitsetStyle, PresenterOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub image: Option<PathBuf>,
    pub base_address: Address,
    pub catalog: Option<PathBuf>,
    pub log_level: String,
    pub max_depth: usize,
    pub max_children: usize,
    pub bitset_style: BitsetStyle,
    pub truncate_at_nul: bool,
    pub use_color: bool,
    pub show_addresses: bool,
    pub json_output: bool,
    pub output: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        let presenter = PresenterOptions::default();
        Self {
            image: None,
            base_address: Address::zero(),
            catalog: None,
            log_level: "warn".to_string(),
            max_depth: presenter.max_depth,
            max_children: presenter.max_children,
            bitset_style: presenter.bitset_style,
            truncate_at_nul: presenter.truncate_at_nul,
            use_color: true,
            show_addresses: false,
            json_output: false,
            output: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a JSON config; missing keys keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| format!("Cannot read {}: {}", path.display(), e))?;
        serde_json::from_str(&text).map_err(|e| format!("Invalid config {}: {}", path.display(), e))
    }

    pub fn with_image(mut self, image: PathBuf) -> Self {
        self.image = Some(image);
        self
    }

    pub fn with_base_address(mut self, base: Address) -> Self {
        self.base_address = base;
        self
    }

    pub fn with_catalog(mut self, catalog: PathBuf) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn with_log_level(mut self, level: &str) -> Self {
        self.log_level = level.to_string();
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_max_children(mut self, max: usize) -> Self {
        self.max_children = max;
        self
    }

    pub fn with_bitset_style(mut self, style: BitsetStyle) -> Self {
        self.bitset_style = style;
        self
    }

    pub fn with_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }

    pub fn with_json_output(mut self, json: bool) -> Self {
        self.json_output = json;
        self
    }

    pub fn with_output(mut self, path: PathBuf) -> Self {
        self.output = Some(path);
        self
    }

    pub fn presenter_options(&self) -> PresenterOptions {
        PresenterOptions {
            max_depth: self.max_depth,
            max_children: self.max_children,
            bitset_style: self.bitset_style,
            truncate_at_nul: self.truncate_at_nul,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.image.is_none() {
            return Err("An image file must be set".to_string());
        }
        if self.catalog.is_none() {
            return Err("A type catalog must be set".to_string());
        }
        if self.max_children == 0 {
            return Err("max_children must be greater than 0".to_string());
        }
        if crate::utils::logging::level_from_str(&self.log_level).is_none() {
            return Err(format!("Unknown log level: {}", self.log_level));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: Config = serde_json::from_str(r#"{"max_children": 8, "bitset_style": "sparse", "base_address": 4096}"#).unwrap();
        assert_eq!(config.max_children, 8);
        assert_eq!(config.bitset_style, BitsetStyle::Sparse);
        assert_eq!(config.base_address, Address::new(0x1000));
        assert_eq!(config.max_depth, Config::default().max_depth);
    }

    #[test]
    fn test_validate() {
        assert!(Config::new().validate().is_err());
        let config = Config::new()
            .with_image(PathBuf::from("snapshot.bin"))
            .with_catalog(PathBuf::from("types.json"));
        assert!(config.validate().is_ok());
        assert!(config.clone().with_max_children(0).validate().is_err());
        assert!(config.with_log_level("loud").validate().is_err());
    }

    #[test]
    fn test_presenter_options() {
        let options = Config::new()
            .with_max_depth(3)
            .with_bitset_style(BitsetStyle::Sparse)
            .presenter_options();
        assert_eq!(options.max_depth, 3);
        assert_eq!(options.bitset_style, BitsetStyle::Sparse);
    }
}
