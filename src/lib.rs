//! Maintenance tools for the integration manifest registry
//!
//! Shared library behind two binaries: `manage-manifests`, the interactive
//! tool that adds `integration_type` to manifests with `config_flow`
//! enabled, and `validate-manifests`, the batch validator.

pub mod batch;
pub mod config;
pub mod exec;
pub mod manager;
pub mod manifest;
pub mod prompt;
pub mod validation;
