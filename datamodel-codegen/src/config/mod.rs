//! Configuration for datamodel-codegen

pub mod defaults;
mod settings;

pub use settings::{CodegenConfig, RuntimeClasses};
