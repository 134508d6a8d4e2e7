//! Builder registry: resolves every builder once, then turns updates into events.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::{
    builder::{EventBuilder, ResolvedBuilder},
    client::ChatClient,
    domain::Update,
    events::Event,
    Result,
};

/// Builders registered but not yet resolved.
#[derive(Default)]
pub struct Dispatcher {
    builders: Vec<Box<dyn EventBuilder>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, builder: impl EventBuilder + 'static) -> &mut Self {
        self.builders.push(Box::new(builder));
        self
    }

    pub fn len(&self) -> usize {
        self.builders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builders.is_empty()
    }

    /// Resolve every builder's chat filter. Fails if any one of them fails.
    pub async fn resolve(self, client: Arc<dyn ChatClient>) -> Result<ResolvedDispatcher> {
        let mut builders = Vec::with_capacity(self.builders.len());
        for builder in self.builders {
            builders.push(ResolvedBuilder::resolve(builder, client.as_ref()).await?);
        }
        debug!(builders = builders.len(), "event builders resolved");
        Ok(ResolvedDispatcher { client, builders })
    }
}

/// Resolved builders, ready to receive updates.
pub struct ResolvedDispatcher {
    client: Arc<dyn ChatClient>,
    builders: Vec<ResolvedBuilder>,
}

impl ResolvedDispatcher {
    pub fn builders(&self) -> &[ResolvedBuilder] {
        &self.builders
    }

    /// Events for `update`, in builder registration order, that passed their
    /// builder's chat filter.
    pub fn dispatch(&self, update: &Update) -> Vec<Event> {
        let mut events = Vec::new();
        for builder in &self.builders {
            let Some(mut event) = builder.build(update) else {
                continue;
            };
            let common = event.common_mut();
            common.set_client(self.client.clone());
            common.original_update = Some(update.clone());

            match builder.filter_event(event) {
                Some(event) => events.push(event),
                None => trace!(family = builder.family(), "event filtered out by chat"),
            }
        }
        events
    }
}
