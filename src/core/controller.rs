use crate::core::{
    ErrorInfo, PersistenceGateway, Place, PlaceId, SyncOutcome, SyncPhase, UserCollection,
};
use crate::utils::error::Result;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct ControllerState {
    collection: UserCollection,
    /// Bumped on every local change to `collection`.
    revision: u64,
    is_loading: bool,
    in_flight_writes: usize,
    load_error: Option<ErrorInfo>,
    sync_error: Option<ErrorInfo>,
}

/// What a single optimistic call changed, so it can be undone on its own.
enum AppliedMutation {
    Added(PlaceId),
    Removed(Place),
}

/// Sole owner of the user's collection.
///
/// Mutations are applied locally first, then the full resulting collection is
/// written through the gateway. A failed write rolls back only the mutation of
/// the call that issued it: the exact pre-call snapshot when nothing else changed
/// the collection in the meantime, otherwise just that call's own add or remove.
///
/// The state lock is never held across a gateway call, so overlapping calls on
/// the same task interleave at their writes. Writes are not serialized; the last
/// one to reach the backing store wins.
pub struct CollectionController<G: PersistenceGateway> {
    gateway: G,
    state: Mutex<ControllerState>,
}

impl<G: PersistenceGateway> CollectionController<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            state: Mutex::new(ControllerState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces the local collection with the stored one. Failures leave it empty.
    pub async fn load(&self) {
        {
            let mut state = self.state();
            state.is_loading = true;
            state.load_error = None;
        }

        tracing::debug!("Fetching user places");
        let result = self.gateway.read_all().await;

        let mut state = self.state();
        state.is_loading = false;
        state.revision += 1;
        match result {
            Ok(collection) => {
                tracing::info!("Loaded {} user places", collection.len());
                state.collection = collection;
            }
            Err(e) => {
                tracing::warn!("Failed to fetch user places: {}", e);
                state.collection = UserCollection::new();
                state.load_error = Some(ErrorInfo::new(
                    SyncPhase::Load,
                    format!("Could not fetch user places: {}", e),
                ));
            }
        }
    }

    pub async fn add_place(&self, place: Place) -> SyncOutcome {
        let id = place.id.clone();
        let (snapshot, target, revision) = {
            let mut state = self.state();
            let snapshot = state.collection.clone();
            if !state.collection.prepend(place) {
                tracing::debug!("Place {} already selected", id);
                return SyncOutcome::Unchanged;
            }
            state.revision += 1;
            state.in_flight_writes += 1;
            (snapshot, state.collection.clone(), state.revision)
        };

        tracing::debug!("Added place {}, saving {} places", id, target.len());
        let result = self.gateway.write_all(&target).await;
        self.settle_write(
            result,
            snapshot,
            revision,
            AppliedMutation::Added(id),
            "Failed to update places",
        )
    }

    pub async fn remove_place(&self, id: &PlaceId) -> SyncOutcome {
        let (snapshot, target, revision, place) = {
            let mut state = self.state();
            let snapshot = state.collection.clone();
            let Some((_, place)) = state.collection.remove(id) else {
                tracing::debug!("Place {} is not selected", id);
                return SyncOutcome::Unchanged;
            };
            state.revision += 1;
            state.in_flight_writes += 1;
            (snapshot, state.collection.clone(), state.revision, place)
        };

        tracing::debug!("Removed place {}, saving {} places", id, target.len());
        let result = self.gateway.write_all(&target).await;
        self.settle_write(
            result,
            snapshot,
            revision,
            AppliedMutation::Removed(place),
            "Failed to delete place",
        )
    }

    fn settle_write(
        &self,
        result: Result<()>,
        snapshot: UserCollection,
        revision: u64,
        mutation: AppliedMutation,
        context: &str,
    ) -> SyncOutcome {
        let mut state = self.state();
        state.in_flight_writes = state.in_flight_writes.saturating_sub(1);

        let err = match result {
            Ok(()) => return SyncOutcome::Saved,
            Err(e) => e,
        };

        if state.revision == revision {
            state.collection = snapshot;
        } else {
            tracing::debug!("Collection changed while saving, undoing only this change");
            match mutation {
                AppliedMutation::Added(id) => {
                    state.collection.remove(&id);
                }
                AppliedMutation::Removed(place) => {
                    let index = restore_index(&snapshot, &state.collection, &place.id);
                    state.collection.insert_at(index, place);
                }
            }
        }
        state.revision += 1;

        tracing::warn!("{}, rolled back: {}", context, err);
        let info = ErrorInfo::new(SyncPhase::Sync, format!("{}: {}", context, err));
        state.sync_error = Some(info.clone());
        SyncOutcome::RolledBack(info)
    }

    pub fn clear_error(&self) {
        self.state().sync_error = None;
    }

    pub fn places(&self) -> UserCollection {
        self.state().collection.clone()
    }

    pub fn find(&self, id: &PlaceId) -> Option<Place> {
        self.state().collection.get(id).cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.state().is_loading
    }

    pub fn is_syncing(&self) -> bool {
        self.state().in_flight_writes > 0
    }

    pub fn load_error(&self) -> Option<ErrorInfo> {
        self.state().load_error.clone()
    }

    pub fn sync_error(&self) -> Option<ErrorInfo> {
        self.state().sync_error.clone()
    }
}

/// Where a removed place goes back so it keeps its snapshot neighbours: before the
/// first later entry still present, else after the nearest earlier one, else last.
fn restore_index(snapshot: &UserCollection, current: &UserCollection, id: &PlaceId) -> usize {
    let entries = snapshot.as_slice();
    let Some(old) = snapshot.position(id) else {
        return current.len();
    };

    if let Some(next) = entries[old + 1..]
        .iter()
        .find_map(|p| current.position(&p.id))
    {
        return next;
    }

    entries[..old]
        .iter()
        .rev()
        .find_map(|p| current.position(&p.id))
        .map_or(current.len(), |prev| prev + 1)
}
