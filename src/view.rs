use eframe::egui::{Pos2, Vec2};

pub const MIN_SCALE: f32 = 0.3;
pub const MAX_SCALE: f32 = 3.0;
const ZOOM_IN_FACTOR: f32 = 1.1;
const ZOOM_OUT_FACTOR: f32 = 0.9;

/// Pan/zoom state: `screen = logical * scale + offset`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    pub offset: Vec2,
    pub scale: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ViewTransform {
    pub const IDENTITY: Self = Self {
        offset: Vec2::ZERO,
        scale: 1.0,
    };

    pub fn to_screen(&self, logical: Vec2) -> Pos2 {
        (logical * self.scale + self.offset).to_pos2()
    }

    pub fn to_logical(&self, screen: Pos2) -> Vec2 {
        (screen.to_vec2() - self.offset) / self.scale
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Positive `delta_y` zooms out, anything else zooms in; the point under `cursor` stays put.
    pub fn zoom_at(&mut self, cursor: Pos2, delta_y: f32) {
        let factor = if delta_y > 0.0 {
            ZOOM_OUT_FACTOR
        } else {
            ZOOM_IN_FACTOR
        };
        let old_scale = self.scale;
        let new_scale = (old_scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        let cursor = cursor.to_vec2();
        self.offset = cursor - (cursor - self.offset) * (new_scale / old_scale);
        self.scale = new_scale;
    }

    pub fn reset(&mut self) {
        *self = Self::IDENTITY;
    }
}
