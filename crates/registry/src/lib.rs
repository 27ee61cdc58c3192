//! # Registry
//!
//! Parameter map loading module.
//!
//! Responsibilities:
//! - Parse the line-oriented parameter map file
//! - Build typed `SettingDescriptor`s
//! - Preserve declaration order for deterministic host registration
//!
//! Malformed lines are logged and skipped, never fatal; an unreadable file
//! aborts startup.
//!
//! # Example
//!
//! ```no_run
//! use registry::ParamRegistry;
//! use std::path::Path;
//!
//! let registry = ParamRegistry::load_from_path(Path::new("parameters.cfg")).unwrap();
//! for name in registry.names() {
//!     println!("{name}");
//! }
//! ```

mod parser;

use std::collections::HashMap;
use std::path::Path;

use contracts::SettingDescriptor;
use thiserror::Error;
use tracing::warn;

use parser::LineOutcome;

/// Registry load error
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Map file could not be read at all
    #[error("cannot read parameter map '{path}': {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Typed registry of device settings
///
/// Owns the logical-name → descriptor mapping plus the declaration order
/// from the map file.
#[derive(Debug, Default)]
pub struct ParamRegistry {
    order: Vec<String>,
    map: HashMap<String, SettingDescriptor>,
}

impl ParamRegistry {
    /// Load the registry from a parameter map file.
    ///
    /// # Errors
    /// `RegistryError::Unreadable` when the file cannot be opened or read;
    /// malformed lines inside a readable file are skipped with a warning.
    pub fn load_from_path(path: &Path) -> Result<Self, RegistryError> {
        let content =
            std::fs::read_to_string(path).map_err(|source| RegistryError::Unreadable {
                path: path.display().to_string(),
                source,
            })?;
        Ok(Self::load_from_str(&content))
    }

    /// Build the registry from map-file content
    pub fn load_from_str(content: &str) -> Self {
        let mut registry = Self::default();
        for line in content.lines() {
            match parser::parse_line(line) {
                LineOutcome::Skip => {}
                LineOutcome::Malformed => {
                    warn!(line, "skipping bad parameter map line");
                }
                LineOutcome::Entry(desc) => registry.insert(desc),
            }
        }
        registry
    }

    fn insert(&mut self, desc: SettingDescriptor) {
        self.order.push(desc.name.clone());
        self.map.insert(desc.name.clone(), desc);
    }

    /// Look up a descriptor by logical name
    pub fn get(&self, name: &str) -> Option<&SettingDescriptor> {
        self.map.get(name)
    }

    /// Logical names in map-file declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Descriptors in map-file declaration order
    pub fn descriptors(&self) -> impl Iterator<Item = &SettingDescriptor> {
        self.order.iter().filter_map(|name| self.map.get(name))
    }

    /// Number of registered settings
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::SettingKind;
    use std::io::Write;

    const MAP: &str = r#"
# chunk-related settings
chunk_mode_active bool ChunkModeActive

exposure_auto enum ExposureAuto
exposure_time float ExposureTime
gain float Gain
image_width int Width
"#;

    #[test]
    fn test_load_preserves_order() {
        let registry = ParamRegistry::load_from_str(MAP);
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(
            names,
            vec![
                "chunk_mode_active",
                "exposure_auto",
                "exposure_time",
                "gain",
                "image_width"
            ]
        );
    }

    #[test]
    fn test_lookup_by_logical_name() {
        let registry = ParamRegistry::load_from_str(MAP);
        let desc = registry.get("exposure_time").unwrap();
        assert_eq!(desc.node, "ExposureTime");
        assert_eq!(desc.kind, Some(SettingKind::Float));
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        // 3 good entries interleaved with 3 bad lines
        let content = "\
gain float Gain
too few
exposure_time float ExposureTime
this line has way too many tokens here
image_width int Width
trailing junk\n";
        let registry = ParamRegistry::load_from_str(content);
        assert_eq!(registry.len(), 3);
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, vec!["gain", "exposure_time", "image_width"]);
    }

    #[test]
    fn test_unknown_kind_registers_without_type() {
        let registry = ParamRegistry::load_from_str("weird double Weird\n");
        assert_eq!(registry.get("weird").unwrap().kind, None);
    }

    #[test]
    fn test_quoted_node_names() {
        let registry =
            ParamRegistry::load_from_str(r#"trigger enum "Trigger Selector""#);
        assert_eq!(registry.get("trigger").unwrap().node, "Trigger Selector");
    }

    #[test]
    fn test_unreadable_file_is_fatal() {
        let err = ParamRegistry::load_from_path(Path::new("/no/such/file.cfg")).unwrap_err();
        assert!(matches!(err, RegistryError::Unreadable { .. }));
    }

    #[test]
    fn test_load_from_tempfile() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MAP.as_bytes()).unwrap();
        let registry = ParamRegistry::load_from_path(file.path()).unwrap();
        assert_eq!(registry.len(), 5);
    }
}
