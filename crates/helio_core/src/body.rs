//! Bodies queried from the kernel.

/// Bodies used by the snapshot, keyed by NAIF code.
///
/// Planets are represented by their system barycenters, which DE kernels
/// store directly relative to the solar-system barycenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Body {
    SolarSystemBarycenter,
    Mercury,
    Venus,
    Earth,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Sun,
}

/// The eight planets in output order.
pub const PLANETS: [Body; 8] = [
    Body::Mercury,
    Body::Venus,
    Body::Earth,
    Body::Mars,
    Body::Jupiter,
    Body::Saturn,
    Body::Uranus,
    Body::Neptune,
];

impl Body {
    /// NAIF body code.
    pub const fn code(self) -> i32 {
        match self {
            Self::SolarSystemBarycenter => 0,
            Self::Mercury => 1,
            Self::Venus => 2,
            Self::Earth => 3,
            Self::Mars => 4,
            Self::Jupiter => 5,
            Self::Saturn => 6,
            Self::Uranus => 7,
            Self::Neptune => 8,
            Self::Sun => 10,
        }
    }

    /// Lower-case name, used as the JSON key.
    pub const fn name(self) -> &'static str {
        match self {
            Self::SolarSystemBarycenter => "ssb",
            Self::Mercury => "mercury",
            Self::Venus => "venus",
            Self::Earth => "earth",
            Self::Mars => "mars",
            Self::Jupiter => "jupiter",
            Self::Saturn => "saturn",
            Self::Uranus => "uranus",
            Self::Neptune => "neptune",
            Self::Sun => "sun",
        }
    }

    pub const fn is_planet(self) -> bool {
        !matches!(self, Self::SolarSystemBarycenter | Self::Sun)
    }
}

impl std::fmt::Display for Body {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Body {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        [Self::SolarSystemBarycenter, Self::Sun]
            .into_iter()
            .chain(PLANETS)
            .find(|b| b.name() == lower)
            .ok_or_else(|| format!("unknown body {s:?}"))
    }
}
