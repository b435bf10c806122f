//! Layer build pipeline.
//!
//! A `CreateAnyLayer` command names a layer type and carries opaque model
//! and layer options. The [`LayerBuilder`] looks the type up in a
//! [`FactoryRegistry`], builds the model (or takes the reusable one the
//! command carries), builds the layer around it and attaches the layer to
//! its [`LayerTarget`].

pub mod command;
pub mod factories;
pub mod layer;
pub mod pipeline;
pub mod registry;

pub use command::{Command, CommandParameters, CommandType, LayerType};
pub use layer::{Layer, LayerOptions, LayerTarget, LayerTree};
pub use pipeline::{CommandOutcome, LayerBuilder};
pub use registry::{BuildContext, FactoryPair, FactoryRegistry, LayerFactory, ModelFactory};
