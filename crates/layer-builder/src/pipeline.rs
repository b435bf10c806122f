//! Command handling: model, then layer, then attach.

use metrics::counter;
use ogc_common::ConnectorResult;
use tracing::{debug, info, instrument, warn};

use crate::command::{Command, CommandParameters, CommandType, LayerType};
use crate::layer::{Layer, LayerTarget};
use crate::registry::{BuildContext, FactoryPair, FactoryRegistry};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// A layer with this id was attached.
    Created(String),
    /// Nothing was built.
    Ignored,
}

pub struct LayerBuilder<T: LayerTarget> {
    registry: FactoryRegistry,
    context: BuildContext,
    target: T,
}

impl<T: LayerTarget> LayerBuilder<T> {
    /// A builder with the default factories.
    pub fn new(target: T, context: BuildContext) -> Self {
        Self::with_registry(target, context, FactoryRegistry::with_defaults())
    }

    pub fn with_registry(target: T, context: BuildContext, registry: FactoryRegistry) -> Self {
        Self {
            registry,
            context,
            target,
        }
    }

    pub fn registry_mut(&mut self) -> &mut FactoryRegistry {
        &mut self.registry
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn into_target(self) -> T {
        self.target
    }

    /// Handle one command.
    ///
    /// Unknown layer types and commands other than `CreateAnyLayer` are
    /// ignored. Factory failures are returned and nothing is attached.
    #[instrument(skip(self, command), fields(command_type = %command.command_type))]
    pub fn handle_command(&mut self, command: Command) -> ConnectorResult<CommandOutcome> {
        match command.command_type {
            CommandType::CreateAnyLayer => self.create_any_layer(command.parameters),
            CommandType::Other(_) => {
                debug!("Ignoring command");
                Ok(CommandOutcome::Ignored)
            }
        }
    }

    fn create_any_layer(
        &mut self,
        parameters: Option<CommandParameters>,
    ) -> ConnectorResult<CommandOutcome> {
        let Some(mut parameters) = parameters else {
            warn!("CreateAnyLayer command without parameters");
            return Ok(ignored());
        };
        let Some(layer_type) = parameters.layer_type.take() else {
            warn!("CreateAnyLayer command without a layer type");
            return Ok(ignored());
        };
        let Some(pair) = self.registry.get(&layer_type) else {
            warn!(layer_type = %layer_type, "No factories registered for layer type");
            return Ok(ignored());
        };

        match build_layer(pair, &self.context, &layer_type, parameters) {
            Ok(layer) => {
                let id = layer.id.clone();
                info!(
                    layer_type = %layer_type,
                    id = %id,
                    label = %layer.label,
                    "Layer created"
                );
                self.target.add_layer(layer);
                counter!("layer_builder_commands_total", "outcome" => "created").increment(1);
                Ok(CommandOutcome::Created(id))
            }
            Err(e) => {
                warn!(layer_type = %layer_type, error = %e, "Failed to create layer");
                counter!("layer_builder_commands_total", "outcome" => "failed").increment(1);
                Err(e)
            }
        }
    }
}

fn ignored() -> CommandOutcome {
    counter!("layer_builder_commands_total", "outcome" => "ignored").increment(1);
    CommandOutcome::Ignored
}

fn build_layer(
    pair: &FactoryPair,
    context: &BuildContext,
    layer_type: &LayerType,
    mut parameters: CommandParameters,
) -> ConnectorResult<Layer> {
    let model = match parameters.reusable_model.take() {
        Some(model) => {
            debug!(model = model.kind(), "Reusing model");
            model
        }
        None => (pair.create_model)(&parameters.model, context)?,
    };
    (pair.create_layer)(model, &parameters.layer, layer_type)
}
