//! Output document and JSON writer.

use std::path::Path;

use serde::Serialize;

use crate::error::SnapshotError;
use crate::transform::PlanetTable;

/// Frame label written to the document. The values are the x-y components
/// of the kernel frame; the label is carried over unchanged.
pub const FRAME_LABEL: &str = "heliocentric ecliptic";
pub const POSITION_UNIT: &str = "AU";
pub const VELOCITY_UNIT: &str = "AU/day";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Units {
    pub position: String,
    pub velocity: String,
}

impl Default for Units {
    fn default() -> Self {
        Self {
            position: POSITION_UNIT.to_string(),
            velocity: VELOCITY_UNIT.to_string(),
        }
    }
}

/// The snapshot as written to disk. Field order is the key order in JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EphemerisDocument {
    pub epoch_jd: f64,
    pub frame: String,
    pub units: Units,
    pub planets: PlanetTable,
    pub scale_factor: f64,
}

impl EphemerisDocument {
    pub fn new(epoch_jd: f64, planets: PlanetTable, scale_factor: f64) -> Self {
        Self {
            epoch_jd,
            frame: FRAME_LABEL.to_string(),
            units: Units::default(),
            planets,
            scale_factor,
        }
    }

    /// Two-space indented JSON.
    pub fn to_json_pretty(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the document to `path`, replacing any existing file.
    pub fn write(&self, path: &Path) -> Result<(), SnapshotError> {
        let json = self.to_json_pretty()?;
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| SnapshotError::io(parent, &e))?;
        }
        std::fs::write(path, json).map_err(|e| SnapshotError::io(path, &e))?;
        tracing::info!(path = %path.display(), planets = self.planets.len(), "wrote snapshot");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::Body;
    use crate::transform::PlanetRecord;

    fn sample() -> EphemerisDocument {
        let mut planets = PlanetTable::new();
        planets.insert(
            Body::Mercury,
            PlanetRecord {
                pos: [-0.5, 1.25],
                vel: [0.1, -0.02],
            },
        );
        EphemerisDocument::new(2_460_000.5, planets, 0.5)
    }

    #[test]
    fn pretty_json_layout() {
        let expected = r#"{
  "epoch_jd": 2460000.5,
  "frame": "heliocentric ecliptic",
  "units": {
    "position": "AU",
    "velocity": "AU/day"
  },
  "planets": {
    "mercury": {
      "pos": [
        -0.5,
        1.25
      ],
      "vel": [
        0.1,
        -0.02
      ]
    }
  },
  "scale_factor": 0.5
}"#;
        assert_eq!(sample().to_json_pretty().expect("serialise"), expected);
    }

    #[test]
    fn write_creates_parent_and_overwrites() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("planets.json");

        std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        std::fs::write(&path, "stale contents that are much longer than nothing").expect("seed");

        sample().write(&path).expect("write");
        let written = std::fs::read_to_string(&path).expect("read back");
        assert_eq!(written, sample().to_json_pretty().expect("serialise"));

        let fresh = dir.path().join("a").join("b").join("out.json");
        sample().write(&fresh).expect("write into new directories");
        assert!(fresh.exists());
    }
}
