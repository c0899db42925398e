use emulauncher_shared::EmulatorId;

use crate::error::LaunchError;

use super::Adapter;

/// Adapters keyed on emulator identifier.
#[derive(Default)]
pub struct AdapterRegistry {
    adapters: Vec<Box<dyn Adapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an adapter. A later adapter for the same id replaces the earlier one.
    pub fn register(&mut self, adapter: Box<dyn Adapter>) {
        self.adapters.retain(|existing| existing.id() != adapter.id());
        self.adapters.push(adapter);
    }

    pub fn get(&self, id: EmulatorId) -> Option<&dyn Adapter> {
        self.adapters
            .iter()
            .find(|adapter| adapter.id() == id)
            .map(|adapter| &**adapter)
    }

    /// Adapter for a frontend emulator name (variants such as `rpcs3-nightly` included).
    pub fn find(&self, name: &str) -> Result<&dyn Adapter, LaunchError> {
        EmulatorId::from_emulator_name(name)
            .and_then(|id| self.get(id))
            .ok_or_else(|| LaunchError::UnknownEmulator {
                name: name.to_string(),
                supported: self.supported_list(),
            })
    }

    pub fn ids(&self) -> Vec<EmulatorId> {
        self.adapters.iter().map(|adapter| adapter.id()).collect()
    }

    /// Comma-separated identifiers for error messages.
    pub fn supported_list(&self) -> String {
        self.ids()
            .iter()
            .map(EmulatorId::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{Installation, LaunchContext};
    use crate::launch::ArgumentStyle;
    use crate::rom::{ResolvedRom, RomPlan};

    struct Stub(EmulatorId);

    impl Adapter for Stub {
        fn id(&self) -> EmulatorId {
            self.0
        }

        fn rom_plan(&self, _ctx: &LaunchContext<'_>, _install: &Installation) -> RomPlan {
            RomPlan::default()
        }

        fn synthesize_config(
            &self,
            _ctx: &LaunchContext<'_>,
            _install: &Installation,
            _rom: &ResolvedRom,
        ) -> anyhow::Result<()> {
            Ok(())
        }

        fn argument_style(&self) -> ArgumentStyle {
            ArgumentStyle::default()
        }
    }

    fn registry() -> AdapterRegistry {
        let mut registry = AdapterRegistry::new();
        registry.register(Box::new(Stub(EmulatorId::Redream)));
        registry.register(Box::new(Stub(EmulatorId::Rpcs3)));
        registry
    }

    #[test]
    fn test_find_by_name_and_variant() {
        let registry = registry();
        assert_eq!(registry.find("redream").unwrap().id(), EmulatorId::Redream);
        assert_eq!(registry.find("rpcs3-nightly").unwrap().id(), EmulatorId::Rpcs3);
    }

    #[test]
    fn test_unknown_lists_supported() {
        let err = registry().find("pcsx2").err().unwrap();
        assert_eq!(
            err.to_string(),
            "Unknown emulator 'pcsx2'. Supported emulators: redream, rpcs3"
        );
    }

    #[test]
    fn test_register_replaces_same_id() {
        let mut registry = registry();
        registry.register(Box::new(Stub(EmulatorId::Redream)));
        assert_eq!(registry.ids(), vec![EmulatorId::Rpcs3, EmulatorId::Redream]);
    }
}
