//! Non-button UI elements: the instruction board and the calibration target.

use cgmath::{InnerSpace, Vector3};

use crate::gfx::picking::{Ray, AABB};

/// Text board shown to the user. Pointers stop on it, but it has no action.
#[derive(Debug, Clone, PartialEq)]
pub struct InstructionText {
    pub text: String,
    pub bounds: AABB,
}

impl InstructionText {
    pub fn new(text: impl Into<String>, bounds: AABB) -> Self {
        Self {
            text: text.into(),
            bounds,
        }
    }

    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        self.bounds.intersect_ray(ray)
    }
}

/// A sphere the user touches once to record where their hand reaches
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationTarget {
    pub center: Vector3<f32>,
    pub radius: f32,
    /// Reference point recorded on first touch
    pub anchor: Option<Vector3<f32>>,
}

impl CalibrationTarget {
    pub fn new(center: Vector3<f32>, radius: f32) -> Self {
        Self {
            center,
            radius,
            anchor: None,
        }
    }

    pub fn is_calibrated(&self) -> bool {
        self.anchor.is_some()
    }

    /// Feed a tracked point. Returns the point the first time it lands
    /// inside the target.
    pub fn touch(&mut self, point: Vector3<f32>) -> Option<Vector3<f32>> {
        if self.is_calibrated() || (point - self.center).magnitude() > self.radius {
            return None;
        }
        self.anchor = Some(point);
        Some(point)
    }

    pub fn clear(&mut self) {
        self.anchor = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calibration_fires_once() {
        let mut target = CalibrationTarget::new(Vector3::new(0.0, 1.0, -0.4), 0.05);
        assert_eq!(target.touch(Vector3::new(0.0, 1.2, -0.4)), None);

        let inside = Vector3::new(0.01, 1.0, -0.4);
        assert_eq!(target.touch(inside), Some(inside));
        assert_eq!(target.touch(inside), None);
        assert_eq!(target.anchor, Some(inside));
    }
}
