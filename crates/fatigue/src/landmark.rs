//! Facial landmark points and eye index topology

use serde::{Deserialize, Serialize};

/// A single facial landmark in source-image coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    /// Depth, when the detector provides it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
}

impl Landmark {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }

    pub fn with_depth(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z: Some(z) }
    }

    /// Euclidean distance; 3-D only when both points carry depth
    pub fn distance(&self, other: &Landmark) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = match (self.z, other.z) {
            (Some(a), Some(b)) => b - a,
            _ => 0.0,
        };
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// Six landmark indices describing one eye.
///
/// `upper[i]` pairs with `lower[i]` for the two vertical distances;
/// `horizontal` holds the two eye corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EyeIndices {
    pub horizontal: [usize; 2],
    pub upper: [usize; 2],
    pub lower: [usize; 2],
}

impl EyeIndices {
    /// Every index this set reads
    pub fn all(&self) -> [usize; 6] {
        [
            self.horizontal[0],
            self.upper[0],
            self.upper[1],
            self.horizontal[1],
            self.lower[1],
            self.lower[0],
        ]
    }

    /// Minimum landmark count a frame needs for this set
    pub fn required_len(&self) -> usize {
        self.all().iter().max().map_or(0, |max| max + 1)
    }
}

/// Left eye in the 468-point face-mesh topology
pub const LEFT_EYE: EyeIndices = EyeIndices {
    horizontal: [33, 133],
    upper: [160, 158],
    lower: [144, 153],
};

/// Right eye in the 468-point face-mesh topology
pub const RIGHT_EYE: EyeIndices = EyeIndices {
    horizontal: [362, 263],
    upper: [385, 387],
    lower: [380, 373],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planar_distance() {
        let a = Landmark::new(0.0, 0.0);
        let b = Landmark::new(3.0, 4.0);
        assert_eq!(a.distance(&b), 5.0);
    }

    #[test]
    fn test_depth_used_only_when_both_present() {
        let a = Landmark::with_depth(0.0, 0.0, 0.0);
        let b = Landmark::with_depth(2.0, 3.0, 6.0);
        assert_eq!(a.distance(&b), 7.0);

        let flat = Landmark::new(2.0, 3.0);
        assert_eq!(a.distance(&flat), 13.0_f64.sqrt());
    }

    #[test]
    fn test_face_mesh_sets_fit_468_points() {
        assert!(LEFT_EYE.required_len() <= 468);
        assert!(RIGHT_EYE.required_len() <= 468);
        assert_eq!(LEFT_EYE.all(), [33, 160, 158, 133, 153, 144]);
        assert_eq!(RIGHT_EYE.all(), [362, 385, 387, 263, 373, 380]);
    }

    #[test]
    fn test_landmark_json_without_depth() {
        let lm: Landmark = serde_json::from_str(r#"{"x":1.5,"y":2.0}"#).unwrap();
        assert_eq!(lm, Landmark::new(1.5, 2.0));
        assert_eq!(serde_json::to_string(&lm).unwrap(), r#"{"x":1.5,"y":2.0}"#);
    }
}
