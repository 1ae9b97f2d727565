//! Chart input: the resolved positions, cusps and aspects of one chart.
//!
//! The JSON shape is the one produced by the chart backend:
//!
//! ```json
//! {
//!   "planetPositions": { "Sun": [280.37, 0.0, 0.98, 1.019], "Moon": { "longitude": 12.5 } },
//!   "houses": [101.2, 127.9, ...],
//!   "aspects": { "Sun-Moon": 92.1 },
//!   "aspectsDetails": { "Sun-Moon": "square" }
//! }
//! ```

use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{InputError, SourceContext};
use crate::types::Longitude;

/// A string-keyed map that keeps document order.
///
/// Body order decides ties in the label layout and aspect order decides draw
/// order inside a tier, so neither may depend on hashing.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        OrderedMap {
            entries: Vec::new(),
        }
    }
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace. A replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = OrderedMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

struct OrderedMapVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
    type Value = OrderedMap<V>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = OrderedMap::new();
        while let Some((key, value)) = access.next_entry::<String, V>()? {
            map.insert(key, value);
        }
        Ok(map)
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

/// Where one body sits, as resolved by the ephemeris.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPosition")]
pub struct BodyPosition {
    /// Ecliptic longitude in degrees; normalized on use.
    pub longitude: f64,
    pub latitude: f64,
    pub distance: f64,
    /// Daily motion in degrees; negative means retrograde.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
}

impl BodyPosition {
    pub fn at(longitude: f64) -> BodyPosition {
        BodyPosition {
            longitude,
            latitude: 0.0,
            distance: 0.0,
            speed: None,
        }
    }

    pub fn position(&self) -> Longitude {
        Longitude::new(self.longitude)
    }
}

/// Either `[lon, lat, dist, speed]` (trailing values optional) or an object.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawPosition {
    Array(Vec<f64>),
    Object {
        longitude: f64,
        #[serde(default)]
        latitude: f64,
        #[serde(default)]
        distance: f64,
        #[serde(default)]
        speed: Option<f64>,
    },
}

impl TryFrom<RawPosition> for BodyPosition {
    type Error = String;

    fn try_from(raw: RawPosition) -> Result<Self, Self::Error> {
        match raw {
            RawPosition::Array(values) => {
                let Some(&longitude) = values.first() else {
                    return Err("a body position needs at least a longitude".to_string());
                };
                Ok(BodyPosition {
                    longitude,
                    latitude: values.get(1).copied().unwrap_or(0.0),
                    distance: values.get(2).copied().unwrap_or(0.0),
                    speed: values.get(3).copied(),
                })
            }
            RawPosition::Object {
                longitude,
                latitude,
                distance,
                speed,
            } => Ok(BodyPosition {
                longitude,
                latitude,
                distance,
                speed,
            }),
        }
    }
}

/// One immutable chart snapshot; every render derives everything from it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    #[serde(default)]
    pub planet_positions: OrderedMap<BodyPosition>,
    /// Speeds reported separately from positions.
    #[serde(default, skip_serializing_if = "OrderedMap::is_empty")]
    pub planet_speeds: OrderedMap<f64>,
    /// Cusp longitude of each house, house 1 first.
    #[serde(default)]
    pub houses: Vec<f64>,
    /// Separation angle per `"BodyA-BodyB"` key.
    #[serde(default)]
    pub aspects: OrderedMap<f64>,
    /// Aspect label per `"BodyA-BodyB"` key.
    #[serde(default)]
    pub aspects_details: OrderedMap<String>,
}

/// One entry of `aspects`, joined with its label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectEntry<'a> {
    pub key: &'a str,
    pub angle: f64,
    pub label: Option<&'a str>,
}

impl<'a> AspectEntry<'a> {
    /// The two body names of the key, split at the first `-`.
    pub fn bodies(&self) -> Option<(&'a str, &'a str)> {
        split_aspect_key(self.key)
    }
}

/// Split `"BodyA-BodyB"`; keys without two non-empty halves yield `None`.
pub fn split_aspect_key(key: &str) -> Option<(&str, &str)> {
    let (a, b) = key.split_once('-')?;
    let (a, b) = (a.trim(), b.trim());
    (!a.is_empty() && !b.is_empty()).then_some((a, b))
}

impl ChartData {
    /// Parse chart JSON; errors point into `source`.
    pub fn from_json(name: &str, source: &str) -> Result<ChartData, InputError> {
        let ctx = SourceContext::new(name, source);
        serde_json::from_str(source).map_err(|err| InputError::from_json(&ctx, err))
    }

    pub fn to_json(&self) -> String {
        // only string keys and finite numbers, so serialization cannot fail
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    pub fn position(&self, body: &str) -> Option<&BodyPosition> {
        self.planet_positions.get(body)
    }

    /// Recorded speed of a body, falling back to `planetSpeeds`.
    pub fn speed_of(&self, body: &str) -> Option<f64> {
        self.position(body)
            .and_then(|p| p.speed)
            .or_else(|| self.planet_speeds.get(body).copied())
    }

    pub fn is_retrograde(&self, body: &str) -> bool {
        self.speed_of(body).is_some_and(|s| s < 0.0)
    }

    /// Aspects in document order.
    pub fn aspect_entries(&self) -> impl Iterator<Item = AspectEntry<'_>> {
        self.aspects.iter().map(|(key, &angle)| AspectEntry {
            key,
            angle,
            label: self.aspects_details.get(key).map(String::as_str),
        })
    }
}

/// Embedded sample chart, used by demos and as a fallback input.
pub fn sample_chart() -> Result<ChartData, InputError> {
    ChartData::from_json("sample_chart.json", include_str!("../data/sample_chart.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_and_object_positions() {
        let chart = ChartData::from_json(
            "t.json",
            r#"{
                "planetPositions": {
                    "Sun": [280.5, 0.0, 0.98, 1.02],
                    "Moon": { "longitude": 12.0, "latitude": -4.1 },
                    "Mars": [100.0]
                },
                "houses": [0, 30, 60, 90, 120, 150, 180, 210, 240, 270, 300, 330]
            }"#,
        )
        .unwrap();
        let sun = chart.position("Sun").unwrap();
        assert_eq!(sun.speed, Some(1.02));
        let moon = chart.position("Moon").unwrap();
        assert_eq!(moon.latitude, -4.1);
        assert_eq!(moon.speed, None);
        assert_eq!(chart.position("Mars").unwrap().distance, 0.0);
        assert_eq!(chart.houses.len(), 12);
    }

    #[test]
    fn keeps_document_order() {
        let chart = ChartData::from_json(
            "t.json",
            r#"{"planetPositions": {"Venus": [5], "Sun": [5], "Aardvark": [5]}}"#,
        )
        .unwrap();
        let names: Vec<_> = chart.planet_positions.keys().collect();
        assert_eq!(names, ["Venus", "Sun", "Aardvark"]);
    }

    #[test]
    fn speed_falls_back_to_planet_speeds() {
        let chart = ChartData::from_json(
            "t.json",
            r#"{
                "planetPositions": {"Sun": [10, 0, 1, 0.98], "Mercury": [20]},
                "planetSpeeds": {"Sun": -5, "Mercury": -0.4}
            }"#,
        )
        .unwrap();
        assert_eq!(chart.speed_of("Sun"), Some(0.98));
        assert_eq!(chart.speed_of("Mercury"), Some(-0.4));
        assert!(chart.is_retrograde("Mercury"));
        assert_eq!(chart.speed_of("Pluto"), None);
        assert!(!chart.is_retrograde("Pluto"));
    }

    #[test]
    fn aspect_keys() {
        assert_eq!(split_aspect_key("Sun-Moon"), Some(("Sun", "Moon")));
        assert_eq!(split_aspect_key("Sun"), None);
        assert_eq!(split_aspect_key("-Moon"), None);
    }

    #[test]
    fn aspect_entries_join_labels() {
        let chart = ChartData::from_json(
            "t.json",
            r#"{
                "aspects": {"Sun-Moon": 91.0, "Sun-Mars": 3.0},
                "aspectsDetails": {"Sun-Mars": "conjunction"}
            }"#,
        )
        .unwrap();
        let entries: Vec<_> = chart.aspect_entries().collect();
        assert_eq!(entries[0].label, None);
        assert_eq!(entries[1].label, Some("conjunction"));
        assert_eq!(entries[1].bodies(), Some(("Sun", "Mars")));
    }

    #[test]
    fn empty_position_array_is_an_error() {
        let err = ChartData::from_json("t.json", r#"{"planetPositions": {"Sun": []}}"#).unwrap_err();
        assert!(matches!(err, InputError::Malformed { .. }));
    }

    #[test]
    fn truncated_input() {
        let err = ChartData::from_json("t.json", r#"{"houses": [1, 2"#).unwrap_err();
        assert!(matches!(err, InputError::Truncated { .. }));
    }

    #[test]
    fn json_round_trip_keeps_order() {
        let chart = sample_chart().unwrap();
        let again = ChartData::from_json("again.json", &chart.to_json()).unwrap();
        assert_eq!(chart, again);
    }

    #[test]
    fn sample_chart_is_complete() {
        let chart = sample_chart().unwrap();
        assert_eq!(chart.houses.len(), 12);
        assert!(chart.planet_positions.len() >= 10);
        for entry in chart.aspect_entries() {
            let (a, b) = entry.bodies().unwrap();
            assert!(chart.position(a).is_some(), "{a}");
            assert!(chart.position(b).is_some(), "{b}");
        }
    }
}
