//! Brush radius, hover point and press state.

use glam::Vec3;
use survey3d_config::BrushSettings;
use tracing::debug;

/// Live brush state for the viewport.
///
/// The hover point is stored in mesh-local space so it stays attached to the
/// surface if the mesh transform changes between frames.
#[derive(Debug, Clone)]
pub struct BrushState {
    settings: BrushSettings,
    radius: f32,
    hover: Option<Vec3>,
    active: bool,
    pressed: bool,
}

impl BrushState {
    pub fn new(settings: BrushSettings) -> Self {
        Self {
            settings,
            radius: settings.clamp_radius(settings.default_radius),
            hover: None,
            active: false,
            pressed: false,
        }
    }

    /// Brush radius in world units
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Set the radius, clamped to the configured range. Returns the applied value.
    pub fn set_radius(&mut self, radius: f32) -> f32 {
        self.radius = self.settings.clamp_radius(radius);
        debug!("Brush radius: requested {} applied {}", radius, self.radius);
        self.radius
    }

    pub fn settings(&self) -> &BrushSettings {
        &self.settings
    }

    /// Latest surface point under the pointer, in mesh-local space
    pub fn hover(&self) -> Option<Vec3> {
        self.hover
    }

    /// Update the hover point. A pointer that is over the viewport is active
    /// even when it misses the mesh.
    pub fn set_hover(&mut self, hover: Option<Vec3>) {
        self.hover = hover;
        self.active = true;
    }

    /// Pointer is over the viewport and tracking
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Pointer button or touch is held
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn press(&mut self) {
        self.pressed = true;
        self.active = true;
    }

    pub fn release(&mut self) {
        self.pressed = false;
    }

    /// Stop tracking the pointer and forget the hover point.
    ///
    /// Used when a touch or pen lifts off, since no further move events
    /// arrive to clear the preview.
    pub fn deactivate(&mut self) {
        self.active = false;
        self.pressed = false;
        self.hover = None;
    }
}

impl Default for BrushState {
    fn default() -> Self {
        Self::new(BrushSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> BrushSettings {
        BrushSettings {
            default_radius: 0.05,
            min_radius: 0.01,
            max_radius: 0.2,
        }
    }

    #[test]
    fn test_starts_at_default_radius() {
        let brush = BrushState::new(settings());
        assert_eq!(brush.radius(), 0.05);
        assert!(!brush.is_active());
        assert!(!brush.is_pressed());
        assert_eq!(brush.hover(), None);
    }

    #[test]
    fn test_set_radius_clamps() {
        let mut brush = BrushState::new(settings());
        assert_eq!(brush.set_radius(1.0), 0.2);
        assert_eq!(brush.set_radius(0.0), 0.01);
        assert_eq!(brush.set_radius(0.1), 0.1);
        assert_eq!(brush.set_radius(f32::NAN), 0.05);
    }

    #[test]
    fn test_deactivate_clears_hover_and_press() {
        let mut brush = BrushState::new(settings());
        brush.set_hover(Some(Vec3::X));
        brush.press();
        assert!(brush.is_active() && brush.is_pressed());

        brush.release();
        assert!(brush.is_active());
        assert_eq!(brush.hover(), Some(Vec3::X));

        brush.deactivate();
        assert!(!brush.is_active());
        assert_eq!(brush.hover(), None);
    }
}
