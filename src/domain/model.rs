use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaceId(String);

impl PlaceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for PlaceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlaceImage {
    pub src: String,
    #[serde(default)]
    pub alt: String,
}

/// A selectable location. The display attributes are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: PlaceId,
    pub title: String,
    #[serde(default)]
    pub image: PlaceImage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub coordinate: Coordinate,
}

impl Place {
    pub fn new(id: impl Into<String>, title: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            id: PlaceId::new(id),
            title: title.into(),
            image: PlaceImage::default(),
            description: None,
            coordinate,
        }
    }

    pub fn with_image(mut self, src: impl Into<String>, alt: impl Into<String>) -> Self {
        self.image = PlaceImage {
            src: src.into(),
            alt: alt.into(),
        };
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// The user's selected places, most recently added first, unique by id.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Place>", into = "Vec<Place>")]
pub struct UserCollection(Vec<Place>);

impl From<Vec<Place>> for UserCollection {
    fn from(places: Vec<Place>) -> Self {
        Self::from_places(places)
    }
}

impl From<UserCollection> for Vec<Place> {
    fn from(collection: UserCollection) -> Self {
        collection.0
    }
}

impl UserCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a collection from a fetched list, keeping the first entry of any repeated id.
    pub fn from_places(places: Vec<Place>) -> Self {
        let mut collection = Self::new();
        for place in places {
            if !collection.contains(&place.id) {
                collection.0.push(place);
            }
        }
        collection
    }

    pub fn contains(&self, id: &PlaceId) -> bool {
        self.0.iter().any(|p| &p.id == id)
    }

    pub fn get(&self, id: &PlaceId) -> Option<&Place> {
        self.0.iter().find(|p| &p.id == id)
    }

    pub fn position(&self, id: &PlaceId) -> Option<usize> {
        self.0.iter().position(|p| &p.id == id)
    }

    /// Returns false without changing anything when the id is already present.
    pub fn prepend(&mut self, place: Place) -> bool {
        if self.contains(&place.id) {
            return false;
        }
        self.0.insert(0, place);
        true
    }

    pub fn remove(&mut self, id: &PlaceId) -> Option<(usize, Place)> {
        let index = self.position(id)?;
        Some((index, self.0.remove(index)))
    }

    /// Inserts at `index`, clamped to the current length. No-op for a present id.
    pub fn insert_at(&mut self, index: usize, place: Place) -> bool {
        if self.contains(&place.id) {
            return false;
        }
        let index = index.min(self.0.len());
        self.0.insert(index, place);
        true
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Place> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Place] {
        &self.0
    }

    pub fn ids(&self) -> Vec<&str> {
        self.0.iter().map(|p| p.id.as_str()).collect()
    }
}

impl<'a> IntoIterator for &'a UserCollection {
    type Item = &'a Place;
    type IntoIter = std::slice::Iter<'a, Place>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Envelope used on the wire for both reads and writes: `{ "places": [...] }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacesEnvelope<T> {
    pub places: T,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncPhase {
    Load,
    Sync,
}

/// A failure captured at the controller boundary for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub message: String,
    pub phase: SyncPhase,
    pub occurred_at: DateTime<Utc>,
}

impl ErrorInfo {
    pub fn new(phase: SyncPhase, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            phase,
            occurred_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// The mutation had no effect, nothing was written.
    Unchanged,
    Saved,
    RolledBack(ErrorInfo),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(id: &str) -> Place {
        Place::new(id, id.to_uppercase(), Coordinate::new(0.0, 0.0))
    }

    #[test]
    fn deserializing_a_collection_drops_repeated_ids() {
        let json = serde_json::json!([
            { "id": "a", "title": "First", "lat": 0.0, "lon": 0.0 },
            { "id": "b", "title": "B", "lat": 0.0, "lon": 0.0 },
            { "id": "a", "title": "Second", "lat": 0.0, "lon": 0.0 }
        ]);

        let collection: UserCollection = serde_json::from_value(json).unwrap();

        assert_eq!(collection.ids(), vec!["a", "b"]);
        assert_eq!(collection.get(&"a".into()).unwrap().title, "First");
        assert_eq!(serde_json::to_value(&collection).unwrap().as_array().unwrap().len(), 2);
    }

    #[test]
    fn place_uses_flat_lat_lon_on_the_wire() {
        let json = serde_json::json!({
            "id": "p1",
            "title": "Forest Waterfall",
            "image": { "src": "forest-waterfall.jpg", "alt": "A tranquil forest" },
            "lat": 44.5588,
            "lon": -80.344
        });

        let parsed: Place = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(parsed.id.as_str(), "p1");
        assert_eq!(parsed.coordinate, Coordinate::new(44.5588, -80.344));
        assert_eq!(parsed.description, None);
        assert_eq!(serde_json::to_value(&parsed).unwrap(), json);
    }

    #[test]
    fn collection_keeps_ids_unique() {
        let mut collection = UserCollection::from_places(vec![place("a"), place("b"), place("a")]);
        assert_eq!(collection.ids(), vec!["a", "b"]);

        assert!(!collection.prepend(place("b")));
        assert!(collection.prepend(place("c")));
        assert_eq!(collection.ids(), vec!["c", "a", "b"]);
    }

    #[test]
    fn insert_at_clamps_index() {
        let mut collection = UserCollection::from_places(vec![place("a")]);
        assert!(collection.insert_at(7, place("b")));
        assert_eq!(collection.ids(), vec!["a", "b"]);
        assert!(!collection.insert_at(0, place("a")));
    }

    #[test]
    fn collection_serializes_as_bare_array() {
        let collection = UserCollection::from_places(vec![place("a")]);
        let envelope = PlacesEnvelope { places: &collection };
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["places"][0]["id"], "a");
    }
}
