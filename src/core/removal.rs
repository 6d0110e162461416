use crate::core::controller::CollectionController;
use crate::core::{PersistenceGateway, Place, PlaceId, SyncOutcome};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RemovalState {
    #[default]
    Idle,
    /// Holds only the identity of a place already in the collection.
    Pending(PlaceId),
}

/// Gates removal behind an explicit confirm or cancel.
#[derive(Debug, Default)]
pub struct RemovalConfirmationFlow {
    state: RemovalState,
}

impl RemovalConfirmationFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the flow for `place`. A second request replaces the first.
    pub fn request_removal(&mut self, place: &Place) {
        if let RemovalState::Pending(previous) = &self.state {
            tracing::debug!("Replacing pending removal of {} with {}", previous, place.id);
        }
        self.state = RemovalState::Pending(place.id.clone());
    }

    pub fn cancel(&mut self) {
        if let RemovalState::Pending(id) = std::mem::take(&mut self.state) {
            tracing::debug!("Removal of {} cancelled", id);
        }
    }

    /// Closes the flow and removes the pending place. `None` when nothing was pending.
    pub async fn confirm<G: PersistenceGateway>(
        &mut self,
        controller: &CollectionController<G>,
    ) -> Option<SyncOutcome> {
        let RemovalState::Pending(id) = std::mem::take(&mut self.state) else {
            return None;
        };
        tracing::debug!("Removal of {} confirmed", id);
        Some(controller.remove_place(&id).await)
    }

    pub fn state(&self) -> &RemovalState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, RemovalState::Pending(_))
    }

    pub fn target(&self) -> Option<&PlaceId> {
        match &self.state {
            RemovalState::Pending(id) => Some(id),
            RemovalState::Idle => None,
        }
    }
}
