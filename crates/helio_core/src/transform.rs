//! Barycentric to heliocentric differencing and x-y projection.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::body::Body;
use crate::error::SnapshotError;
use crate::source::EphemerisSource;

/// Sun-relative position and velocity of one planet, x-y components only.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize)]
pub struct PlanetRecord {
    pub pos: [f64; 2],
    pub vel: [f64; 2],
}

/// Planet records in output order, serialised as a JSON object.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlanetTable {
    entries: Vec<(Body, PlanetRecord)>,
}

impl PlanetTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record; a body already present is replaced in place.
    pub fn insert(&mut self, body: Body, record: PlanetRecord) {
        match self.entries.iter_mut().find(|(b, _)| *b == body) {
            Some((_, existing)) => *existing = record,
            None => self.entries.push((body, record)),
        }
    }

    pub fn get(&self, body: Body) -> Option<&PlanetRecord> {
        self.entries
            .iter()
            .find(|(b, _)| *b == body)
            .map(|(_, r)| r)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Body, &PlanetRecord)> {
        self.entries.iter().map(|(b, r)| (*b, r))
    }

    pub fn records_mut(&mut self) -> impl Iterator<Item = &mut PlanetRecord> {
        self.entries.iter_mut().map(|(_, r)| r)
    }
}

impl Serialize for PlanetTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (body, record) in &self.entries {
            map.serialize_entry(body.name(), record)?;
        }
        map.end()
    }
}

/// Query every planet and the sun against the solar-system barycenter and
/// return `planet - sun`, keeping only the x and y components.
///
/// The sun is queried once; its state is the same for every planet.
pub fn heliocentric_table(
    source: &dyn EphemerisSource,
    planets: &[Body],
    epoch_tdb_jd: f64,
) -> Result<PlanetTable, SnapshotError> {
    let sun = source.state(Body::Sun, Body::SolarSystemBarycenter, epoch_tdb_jd)?;

    let mut table = PlanetTable::new();
    for &planet in planets {
        let barycentric = source.state(planet, Body::SolarSystemBarycenter, epoch_tdb_jd)?;
        let helio = barycentric.minus(&sun);
        tracing::debug!(
            planet = planet.name(),
            x_au = helio.position_au[0],
            y_au = helio.position_au[1],
            "heliocentric state"
        );
        table.insert(
            planet,
            PlanetRecord {
                pos: [helio.position_au[0], helio.position_au[1]],
                vel: [helio.velocity_au_day[0], helio.velocity_au_day[1]],
            },
        );
    }
    Ok(table)
}
