//! `plot-force` payloads: a flat list of 2D forces acting on one body.

use crate::dispatch::FORCE_DIAGRAM_TAG;
use crate::utils::json_type_name;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One force; direction and magnitude are implied by `(x, y)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForceVector {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub color: String,
}

impl ForceVector {
    pub fn magnitude(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Direction in radians, counter-clockwise from the positive x axis.
    pub fn angle(&self) -> f64 {
        self.y.atan2(self.x)
    }
}

/// Validates that `text` is a JSON array of force objects and returns them unchanged.
pub fn parse_forces(text: &str) -> Result<Vec<ForceVector>> {
    let value: Value = serde_json::from_str(text).map_err(|e| malformed(e.to_string()))?;
    let Value::Array(items) = &value else {
        return Err(malformed(format!(
            "expected a JSON array, got {}",
            json_type_name(&value)
        )));
    };
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let force = ForceVector::deserialize(item)
                .map_err(|e| malformed(format!("[{index}]: {e}")))?;
            if !(force.x.is_finite() && force.y.is_finite()) {
                return Err(malformed(format!("[{index}]: components must be finite")));
            }
            Ok(force)
        })
        .collect()
}

fn malformed(message: impl Into<String>) -> Error {
    Error::malformed(FORCE_DIAGRAM_TAG, message)
}
