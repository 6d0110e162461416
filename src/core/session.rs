use crate::core::controller::CollectionController;
use crate::core::distance::sort_by_distance;
use crate::core::{
    CandidateSource, Coordinate, PersistenceGateway, Place, PlaceId, PositionProvider,
};
use crate::utils::error::{PickerError, Result};

/// Candidates sorted around the position they were sorted from.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyPlaces {
    pub origin: Coordinate,
    pub places: Vec<Place>,
}

/// Wires the controller to its startup collaborators.
pub struct PickerSession<G, C, P>
where
    G: PersistenceGateway,
    C: CandidateSource,
    P: PositionProvider,
{
    controller: CollectionController<G>,
    candidates: C,
    position: P,
}

impl<G, C, P> PickerSession<G, C, P>
where
    G: PersistenceGateway,
    C: CandidateSource,
    P: PositionProvider,
{
    pub fn new(gateway: G, candidates: C, position: P) -> Self {
        Self {
            controller: CollectionController::new(gateway),
            candidates,
            position,
        }
    }

    pub fn controller(&self) -> &CollectionController<G> {
        &self.controller
    }

    /// Loads the user's collection and, independently, the nearby candidates.
    ///
    /// Load failures stay on the controller. The returned result only covers the
    /// candidate list, which is never produced without a resolved position.
    pub async fn start(&self) -> Result<Vec<Place>> {
        tracing::info!("Starting place picker session");
        let ((), nearby) = tokio::join!(self.controller.load(), self.nearby_places());

        match nearby {
            Ok(nearby) => {
                tracing::info!("{} candidate places sorted by distance", nearby.places.len());
                Ok(nearby.places)
            }
            Err(e) => {
                tracing::warn!("Candidate places unavailable: {}", e);
                Err(e)
            }
        }
    }

    /// Resolves the position once and sorts the candidates around it.
    pub async fn nearby_places(&self) -> Result<NearbyPlaces> {
        let origin = self.position.current_position().await?;
        tracing::debug!("Resolved position {}, {}", origin.lat, origin.lon);

        let places = self.candidates.list_places().await?;
        Ok(NearbyPlaces {
            places: sort_by_distance(&places, origin),
            origin,
        })
    }

    pub async fn candidate(&self, id: &PlaceId) -> Result<Place> {
        self.candidates
            .list_places()
            .await?
            .into_iter()
            .find(|p| &p.id == id)
            .ok_or_else(|| PickerError::NotFound { id: id.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::controller::tests::MockGateway;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticCandidates(Vec<Place>);

    #[async_trait::async_trait]
    impl CandidateSource for StaticCandidates {
        async fn list_places(&self) -> Result<Vec<Place>> {
            Ok(self.0.clone())
        }
    }

    struct Position {
        coordinate: Option<Coordinate>,
        calls: AtomicUsize,
    }

    fn position(coordinate: Option<Coordinate>) -> Position {
        Position {
            coordinate,
            calls: AtomicUsize::new(0),
        }
    }

    impl PositionProvider for Position {
        async fn current_position(&self) -> Result<Coordinate> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.coordinate.ok_or_else(|| PickerError::PositionUnavailable {
                reason: "denied".to_string(),
            })
        }
    }

    fn candidates() -> StaticCandidates {
        StaticCandidates(vec![
            Place::new("far", "Far", Coordinate::new(40.0, 40.0)),
            Place::new("near", "Near", Coordinate::new(0.1, 0.1)),
        ])
    }

    #[tokio::test]
    async fn start_loads_collection_and_sorts_candidates() {
        let session = PickerSession::new(
            MockGateway::with_places(&["a"]),
            candidates(),
            position(Some(Coordinate::new(0.0, 0.0))),
        );

        let nearby = session.start().await.unwrap();

        let ids: Vec<&str> = nearby.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "far"]);
        assert_eq!(session.controller().places().ids(), vec!["a"]);
    }

    #[tokio::test]
    async fn missing_position_is_surfaced_but_collection_still_loads() {
        let session = PickerSession::new(
            MockGateway::with_places(&["a"]),
            candidates(),
            position(None),
        );

        let err = session.start().await.unwrap_err();

        assert!(matches!(err, PickerError::PositionUnavailable { .. }));
        assert_eq!(session.controller().places().ids(), vec!["a"]);
    }

    #[tokio::test]
    async fn candidate_lookup_by_id() {
        let session = PickerSession::new(MockGateway::default(), candidates(), position(None));

        assert_eq!(session.candidate(&"near".into()).await.unwrap().title, "Near");
        assert!(matches!(
            session.candidate(&"nope".into()).await,
            Err(PickerError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn nearby_places_reports_the_origin_it_sorted_from() {
        let origin = Coordinate::new(0.0, 0.0);
        let session =
            PickerSession::new(MockGateway::default(), candidates(), position(Some(origin)));

        let nearby = session.nearby_places().await.unwrap();

        assert_eq!(nearby.origin, origin);
        let ids: Vec<&str> = nearby.places.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "far"]);
        assert_eq!(session.position.calls.load(Ordering::SeqCst), 1);
    }
}
