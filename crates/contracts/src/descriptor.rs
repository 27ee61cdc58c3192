//! SettingDescriptor - typed mapping from logical names to device nodes

use serde::{Deserialize, Serialize};

use crate::SettingKind;

/// Descriptor for a single device setting
///
/// Built once at startup from the parameter map file, immutable afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingDescriptor {
    /// External-facing logical name
    pub name: String,

    /// Vendor-specific device node name
    pub node: String,

    /// Declared value type; `None` when the map file carried an unknown
    /// kind token (the descriptor is then rejected on use)
    pub kind: Option<SettingKind>,
}

impl SettingDescriptor {
    /// Create a descriptor from raw map-file tokens
    pub fn new(name: impl Into<String>, kind_token: &str, node: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            node: node.into(),
            kind: SettingKind::from_token(kind_token),
        }
    }

    /// Build the host-facing declaration for this descriptor
    pub fn declaration(&self, caps: &HostCapabilities) -> ParamDeclaration {
        ParamDeclaration {
            name: self.name.clone(),
            description: self.name.clone(),
            kind: self.kind,
            dynamic_typing: caps.dynamic_typing,
        }
    }
}

/// Capabilities of the host parameter framework
///
/// Some host versions support dynamically typed declarations, some reject
/// them. The capability is resolved once at wiring time; `dynamic_typing`
/// defaults to off, the portable choice.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostCapabilities {
    /// Whether declarations may carry the dynamic-typing flag
    pub dynamic_typing: bool,
}

/// Declaration handed to the host parameter framework
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamDeclaration {
    /// Parameter name as seen by the host
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// Declared type (`None` when the map file kind was unknown)
    pub kind: Option<SettingKind>,

    /// Whether the host should allow type changes after declaration
    pub dynamic_typing: bool,
}
