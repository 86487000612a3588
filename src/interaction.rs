//! Pointer gesture state machine.
//!
//! Pointer input is reduced to a small set of [`Effect`]s; the engine owns
//! the state those effects mutate. Panning and node dragging are separate
//! states, so a press can only ever start one of them.

use eframe::egui::{Pos2, Vec2};

use crate::view::ViewTransform;

/// Logical-space tolerance added to a node radius when hit-testing.
pub const HIT_SLACK: f32 = 5.0;
/// Screen-space travel before a node press turns into a drag.
pub const CLICK_SLOP: f32 = 3.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Down { pos: Pos2 },
    Move { pos: Pos2 },
    Up { pos: Pos2 },
    DoubleClick { pos: Pos2 },
    Wheel { pos: Pos2, delta_y: f32 },
    Leave,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Gesture {
    #[default]
    Idle,
    Panning {
        last: Pos2,
    },
    DraggingNode {
        id: String,
        press: Pos2,
        last: Pos2,
        moved: bool,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    Pan(Vec2),
    Zoom { cursor: Pos2, delta_y: f32 },
    /// Screen-space delta for a node drag; the engine rescales it to logical space.
    DragNode { id: String, screen_delta: Vec2 },
    Click(String),
    Hover(Option<String>),
}

#[derive(Debug, Default)]
pub struct Interaction {
    gesture: Gesture,
    hovered: Option<String>,
}

impl Interaction {
    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    pub fn cancel(&mut self) {
        self.gesture = Gesture::Idle;
        self.hovered = None;
    }

    /// Advances the state machine; `hit` maps a screen position to the node id under it.
    pub fn handle(
        &mut self,
        event: PointerEvent,
        hit: impl Fn(Pos2) -> Option<String>,
    ) -> Vec<Effect> {
        let mut effects = Vec::new();

        match event {
            PointerEvent::Down { pos } => {
                self.gesture = match hit(pos) {
                    Some(id) => Gesture::DraggingNode {
                        id,
                        press: pos,
                        last: pos,
                        moved: false,
                    },
                    None => Gesture::Panning { last: pos },
                };
            }
            PointerEvent::Move { pos } => match &mut self.gesture {
                Gesture::Idle => {
                    let hovered = hit(pos);
                    if self.hovered != hovered {
                        self.hovered = hovered.clone();
                        effects.push(Effect::Hover(hovered));
                    }
                }
                Gesture::Panning { last } => {
                    effects.push(Effect::Pan(pos - *last));
                    *last = pos;
                }
                Gesture::DraggingNode {
                    id,
                    press,
                    last,
                    moved,
                } => {
                    if !*moved && (pos - *press).length() > CLICK_SLOP {
                        *moved = true;
                        *last = *press;
                    }
                    if *moved {
                        effects.push(Effect::DragNode {
                            id: id.clone(),
                            screen_delta: pos - *last,
                        });
                        *last = pos;
                    }
                }
            },
            PointerEvent::Up { pos } => {
                let finished = std::mem::take(&mut self.gesture);
                if let Gesture::DraggingNode {
                    id, moved: false, ..
                } = finished
                {
                    effects.push(Effect::Click(id));
                }
                self.update_hover(hit(pos), &mut effects);
            }
            PointerEvent::DoubleClick { pos } => {
                if let Some(id) = hit(pos) {
                    effects.push(Effect::Click(id));
                }
            }
            PointerEvent::Wheel { pos, delta_y } => {
                if delta_y != 0.0 {
                    effects.push(Effect::Zoom {
                        cursor: pos,
                        delta_y,
                    });
                }
            }
            PointerEvent::Leave => self.update_hover(None, &mut effects),
        }

        effects
    }

    fn update_hover(&mut self, hovered: Option<String>, effects: &mut Vec<Effect>) {
        if self.hovered != hovered {
            self.hovered = hovered.clone();
            effects.push(Effect::Hover(hovered));
        }
    }
}

/// First circle (in iteration order) containing the screen point, with [`HIT_SLACK`].
pub fn hit_test(
    circles: impl IntoIterator<Item = (Vec2, f32)>,
    view: &ViewTransform,
    screen: Pos2,
) -> Option<usize> {
    let logical = view.to_logical(screen);
    circles
        .into_iter()
        .position(|(center, radius)| (center - logical).length() <= radius + HIT_SLACK)
}
