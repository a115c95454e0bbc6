pub mod status;

use tomato_kernel::ModuleRegistry;

/// Register the core modules and every application module with the registry
pub fn register_all(registry: &mut ModuleRegistry) {
    registry.register_core(std::sync::Arc::new(tomato_db::DatabaseModule::new()));
    registry.register_custom(status::create_module());
}
