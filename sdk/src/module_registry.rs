//! Module registry trait

use crate::message_bus::ModuleId;
use crate::module::Module;
use std::sync::Arc;

/// Module registry trait
pub trait ModuleRegistry {

    // Register a module, returning the identity it was given
    fn register(&mut self, module: Arc<dyn Module>) -> ModuleId;
}
