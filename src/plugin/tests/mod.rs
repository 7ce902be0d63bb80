//! Plugin System Tests
//!
//! Scanner and registry tests against temporary cartridge folders and mock
//! components.

pub mod mock_components;
