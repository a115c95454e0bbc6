//! Core building blocks shared by every Tomato backend crate: layered
//! settings, the module trait, and the registry driving module lifecycle.

pub mod module;
pub mod registry;
pub mod settings;

pub use module::{InitCtx, Module};
pub use registry::ModuleRegistry;
