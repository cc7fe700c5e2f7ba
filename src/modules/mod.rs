pub mod authors;
pub mod books;

use catalog_kernel::ModuleRegistry;

/// Build the registry with all catalog modules registered.
pub fn build_registry() -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    registry.register(authors::create_module());
    registry.register(books::create_module());
    registry
}
