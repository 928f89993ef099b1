use ahash::AHashMap;
use parking_lot::Mutex;
use std::sync::Arc;

/// Panel-wide event bus
pub struct EventBus {
    handlers: Arc<Mutex<AHashMap<std::any::TypeId, Vec<Box<dyn EventHandler>>>>>,
}

/// Event trait that all events must implement
pub trait Event: Send + Sync + 'static {
    fn as_any(&self) -> &dyn std::any::Any;
}

/// Handler trait for event handlers
pub trait EventHandler: Send + Sync {
    fn handle(&mut self, event: &dyn Event);
}

/// Panel events
pub mod events {
    use super::Event;
    use crate::data::RowId;
    use crate::weights::WeightVector;

    /// Cohort loaded event
    #[derive(Debug, Clone)]
    pub struct CohortLoaded {
        pub source_name: String,
        pub row_count: usize,
        pub feature_count: usize,
    }

    /// Selected rows changed in the inspection grid
    #[derive(Debug, Clone)]
    pub struct SelectionChanged {
        pub selected: Vec<RowId>,
    }

    /// Active weight vector changed
    #[derive(Debug, Clone)]
    pub struct WeightVectorChanged {
        pub weight: WeightVector,
    }

    /// Explanation state was recomputed
    #[derive(Debug, Clone)]
    pub struct ExplanationUpdated {
        pub series_count: usize,
    }

    /// Feature subset committed from the picker panel
    #[derive(Debug, Clone)]
    pub struct FeatureSubsetApplied {
        pub features: Vec<String>,
    }

    // Implement Event trait for all event types
    macro_rules! impl_event {
        ($($t:ty),*) => {
            $(
                impl Event for $t {
                    fn as_any(&self) -> &dyn std::any::Any {
                        self
                    }
                }
            )*
        }
    }

    impl_event!(
        CohortLoaded,
        SelectionChanged,
        WeightVectorChanged,
        ExplanationUpdated,
        FeatureSubsetApplied
    );
}

impl EventBus {
    /// Create a new event bus
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Mutex::new(AHashMap::new())),
        }
    }

    /// Subscribe to events of a specific type
    pub fn subscribe<E: Event>(&self, handler: Box<dyn EventHandler>) {
        let type_id = std::any::TypeId::of::<E>();
        let mut handlers = self.handlers.lock();
        handlers.entry(type_id).or_default().push(handler);
    }

    /// Publish an event
    pub fn publish<E: Event>(&self, event: E) {
        let type_id = std::any::TypeId::of::<E>();
        let mut handlers = self.handlers.lock();

        if let Some(event_handlers) = handlers.get_mut(&type_id) {
            for handler in event_handlers.iter_mut() {
                handler.handle(&event);
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper struct for creating event handlers from closures
pub struct ClosureEventHandler<F> {
    handler: F,
}

impl<F> EventHandler for ClosureEventHandler<F>
where
    F: FnMut(&dyn Event) + Send + Sync,
{
    fn handle(&mut self, event: &dyn Event) {
        (self.handler)(event);
    }
}

/// Create an event handler from a closure
pub fn handler_from_fn<F>(f: F) -> Box<dyn EventHandler>
where
    F: FnMut(&dyn Event) + Send + Sync + 'static,
{
    Box::new(ClosureEventHandler { handler: f })
}
