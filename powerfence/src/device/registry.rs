//! Global device registry for looking up device definitions.

use std::sync::RwLock;

use indexmap::IndexMap;
use once_cell::sync::Lazy;

use super::definition::DeviceDefinition;
use super::vendors;
use crate::error::{DeviceError, Result};

/// Global device registry.
static REGISTRY: Lazy<RwLock<DeviceRegistry>> = Lazy::new(|| {
    let mut registry = DeviceRegistry::new();
    registry.register_builtin_devices();
    RwLock::new(registry)
});

/// Registry for device definitions, in registration order.
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    devices: IndexMap<String, DeviceDefinition>,
}

impl DeviceRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the global registry.
    pub fn global() -> &'static RwLock<DeviceRegistry> {
        &REGISTRY
    }

    /// Look up a device in the global registry.
    pub fn lookup(name: &str) -> Result<DeviceDefinition> {
        let registry = REGISTRY.read().map_err(|_| DeviceError::InvalidDefinition {
            message: "Failed to acquire registry lock".to_string(),
        })?;
        registry.get(name).cloned().ok_or_else(|| {
            DeviceError::UnknownDevice {
                name: name.to_string(),
            }
            .into()
        })
    }

    fn register_builtin_devices(&mut self) {
        for device in [
            vendors::bladecenter::device(),
            vendors::ilo::device(),
            vendors::wti::device(),
        ] {
            self.devices.insert(device.name.clone(), device);
        }
    }

    /// Register a device definition.
    pub fn register(&mut self, device: DeviceDefinition) -> Result<()> {
        if device.name.is_empty() {
            return Err(DeviceError::InvalidDefinition {
                message: "Device name must not be empty".to_string(),
            }
            .into());
        }
        if self.devices.contains_key(&device.name) {
            return Err(DeviceError::AlreadyRegistered {
                name: device.name.clone(),
            }
            .into());
        }
        self.devices.insert(device.name.clone(), device);
        Ok(())
    }

    /// Get a device by name.
    pub fn get(&self, name: &str) -> Option<&DeviceDefinition> {
        self.devices.get(name)
    }

    /// Check if a device is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.devices.contains_key(name)
    }

    /// List all registered device names.
    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.devices.keys()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::device::vendors::ilo::IloDriver;

    #[test]
    fn test_builtin_devices() {
        let registry = DeviceRegistry::global().read().unwrap();
        let names: Vec<_> = registry.names().cloned().collect();
        assert_eq!(names, vec!["bladecenter", "ilo", "wti"]);
    }

    #[test]
    fn test_lookup() {
        let device = DeviceRegistry::lookup("ilo").unwrap();
        assert_eq!(device.logout_command, "quit");
        assert!(matches!(
            DeviceRegistry::lookup("apc"),
            Err(crate::Error::Device(DeviceError::UnknownDevice { .. }))
        ));
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let mut registry = DeviceRegistry::new();
        let device = DeviceDefinition::new("lab-ilo", Arc::new(IloDriver::default()))
            .with_prompt("lab>");
        registry.register(device.clone()).unwrap();
        assert!(registry.contains("lab-ilo"));
        assert!(matches!(
            registry.register(device),
            Err(crate::Error::Device(DeviceError::AlreadyRegistered { .. }))
        ));
    }
}
