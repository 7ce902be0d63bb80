//! Built-in Game Components
//!
//! Components compiled into the host. Plugin folders select one of these
//! through their manifest `entry`.

use super::traits::ComponentCatalog;
use crate::flow::flow_component;

/// Entry names of the built-in components
pub fn get_builtin_entries() -> Vec<&'static str> {
    vec![crate::flow::FLOW_ENTRY]
}

/// Catalog holding every built-in component
pub fn builtin_components() -> ComponentCatalog {
    ComponentCatalog::new().with_component(flow_component())
}
