//! Inspection engine: selection-to-explanation synchronization

use std::sync::Arc;

use anyhow::{bail, Result};
use parking_lot::RwLock;
use tracing::debug;

use mi_core::events::{events, EventBus};
use mi_core::{
    CohortStore, RowId, SelectionContext, SelectionSet, SelectionSubscriber, WeightVector,
};

use crate::aggregate::{aggregate_importances, ImportanceSeries};
use crate::rank::FeatureRanking;

/// Immutable explanation snapshot consumed by the plot collaborator
#[derive(Debug, Clone, Default)]
pub struct ExplanationState {
    /// One series per selected row, in eligibility order
    pub series: Vec<ImportanceSeries>,

    /// Shared feature axis ordering
    pub ranking: FeatureRanking,
}

/// Recomputes the explanation state whenever one of its inputs changes
///
/// All recomputation is a pure function of the current inputs; the engine
/// replaces its snapshot wholesale rather than patching it. The same
/// computation runs at construction and on every subsequent change.
pub struct InspectionEngine {
    store: Arc<dyn CohortStore>,
    selection: Arc<SelectionSet>,
    weight: RwLock<WeightVector>,
    state: RwLock<ExplanationState>,
    event_bus: Arc<EventBus>,
}

impl InspectionEngine {
    /// Build the engine and compute the initial explanation state
    ///
    /// The initial selection (eligibility ∩ rendered rows) and its
    /// explanation are computed before the engine subscribes to the
    /// selection set, so initialization cannot re-enter the update path or
    /// publish spurious events.
    pub fn new(
        store: Arc<dyn CohortStore>,
        eligible: Vec<RowId>,
        rendered: &[RowId],
        weight: WeightVector,
        event_bus: Arc<EventBus>,
    ) -> Arc<Self> {
        let selection = Arc::new(SelectionSet::initialize(eligible, rendered));

        let engine = Arc::new(Self {
            state: RwLock::new(ExplanationState::default()),
            selection: selection.clone(),
            weight: RwLock::new(weight),
            store,
            event_bus,
        });

        *engine.state.write() = engine.compute(&selection.context());
        selection.add_subscriber(engine.clone() as Arc<dyn SelectionSubscriber>);
        engine
    }

    /// The selection set driving this engine
    pub fn selection(&self) -> &Arc<SelectionSet> {
        &self.selection
    }

    /// Current explanation snapshot
    pub fn snapshot(&self) -> ExplanationState {
        self.state.read().clone()
    }

    /// Switch the active weight vector and recompute
    pub fn set_weight_vector(&self, weight: WeightVector) -> Result<()> {
        if let WeightVector::Class(index) = weight {
            if index >= self.store.class_count() {
                bail!(
                    "unknown class index {} (cohort has {} classes)",
                    index,
                    self.store.class_count()
                );
            }
        }

        *self.weight.write() = weight;
        self.event_bus.publish(events::WeightVectorChanged { weight });
        self.recompute();
        Ok(())
    }

    /// Replace the eligibility list; the current selection is kept
    pub fn sync_eligibility(&self, eligible: Vec<RowId>) {
        // The selection set notifies its subscribers, which triggers the
        // recomputation below via on_selection_change
        self.selection.sync_eligibility(eligible);
    }

    /// Pure recomputation of the explanation state from current inputs
    fn compute(&self, context: &SelectionContext) -> ExplanationState {
        let weight = *self.weight.read();
        let series = aggregate_importances(self.store.as_ref(), context, &weight);
        let ranking = FeatureRanking::from_series(&series);
        ExplanationState { series, ranking }
    }

    fn recompute(&self) {
        let context = self.selection.context();
        let state = self.compute(&context);
        debug!(series = state.series.len(), "explanation state recomputed");

        self.event_bus.publish(events::ExplanationUpdated {
            series_count: state.series.len(),
        });
        *self.state.write() = state;
    }
}

impl SelectionSubscriber for InspectionEngine {
    fn on_selection_change(&self, context: &SelectionContext) {
        self.event_bus.publish(events::SelectionChanged {
            selected: context.selected.clone(),
        });
        self.recompute();
    }
}
