use serde::{Deserialize, Serialize};

use crate::foundation::math::smoothstep;

/// Axis used to measure distance from the scene centre.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BiasAxis {
    X,
    Y,
    /// Nearest of the two axes, so both centre lines are avoided.
    #[default]
    #[serde(other)]
    Both,
}

/// Parameters of the centre-avoiding falloff.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CenterAvoid {
    pub axis: BiasAxis,
    /// Normalized distance from the centre (0..1) at which the weight reaches 1.
    pub radius: f64,
    /// Falloff sharpness; the smoothstep is raised to `1 + 3 * strength`.
    pub strength: f64,
}

impl Default for CenterAvoid {
    fn default() -> Self {
        Self {
            axis: BiasAxis::Both,
            radius: 0.3,
            strength: 0.7,
        }
    }
}

impl CenterAvoid {
    fn weight(&self, x_norm: f64, y_norm: f64) -> f64 {
        let dx = (x_norm - 0.5).abs() / 0.5;
        let dy = (y_norm - 0.5).abs() / 0.5;
        let d = match self.axis {
            BiasAxis::X => dx,
            BiasAxis::Y => dy,
            BiasAxis::Both => dx.min(dy),
        };
        let gamma = 1.0 + self.strength * 3.0;
        smoothstep(self.radius, 1.0, d).powf(gamma)
    }
}

/// Spatial acceptance weight for candidate positions.
///
/// A missing or unknown `type` deserializes to [`Bias::Uniform`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", from = "BiasRepr")]
pub enum Bias {
    CenterAvoid(CenterAvoid),
    EdgeBias(CenterAvoid),
    #[default]
    Uniform,
}

#[derive(Deserialize)]
struct BiasRepr {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(flatten)]
    params: CenterAvoid,
}

impl From<BiasRepr> for Bias {
    fn from(r: BiasRepr) -> Self {
        match r.kind.as_deref() {
            Some("centerAvoid") => Self::CenterAvoid(r.params),
            Some("edgeBias") => Self::EdgeBias(r.params),
            _ => Self::Uniform,
        }
    }
}

impl Bias {
    /// Acceptance weight in `[0, 1]` for a point in normalized scene coordinates.
    pub fn weight(&self, x_norm: f64, y_norm: f64) -> f64 {
        match self {
            Bias::Uniform => 1.0,
            Bias::CenterAvoid(p) | Bias::EdgeBias(p) => p.weight(x_norm, y_norm),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scatter/bias.rs"]
mod tests;
