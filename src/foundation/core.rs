use std::fmt;

/// Raw position units to display units.
pub const POSITION_SCALE: f64 = 1e-6;

/// Raw time units to animation ticks.
pub const TIME_SCALE: f64 = 1e6;

/// Particle class a track file represents.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Electrons, positrons and photons (`.track_em`).
    Electromagnetic,
    /// Muons (`.track_mu`).
    Muon,
    /// Hadrons and nuclei (`.track_hd`).
    Hadronic,
}

impl Category {
    /// All categories, in processing and reporting order.
    pub const ALL: [Category; 3] = [Self::Electromagnetic, Self::Muon, Self::Hadronic];

    /// Short tag used in track file suffixes.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Electromagnetic => "em",
            Self::Muon => "mu",
            Self::Hadronic => "hd",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Spatial axis an assembly pass matches endpoints on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Match on start-x / end-x.
    X,
    /// Match on start-y / end-y.
    Y,
}

/// Index of a sample in its decoded stream; the identity of the segment built from it.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct SampleId(pub u32);

/// Display-space point.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn along(self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }
}

/// Scale a raw position component into display units.
pub fn scale_position(raw: f32) -> f64 {
    f64::from(raw) * POSITION_SCALE
}

/// Scale a raw time into (fractional) ticks.
pub fn scale_time(raw: f32) -> f64 {
    f64::from(raw) * TIME_SCALE
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
