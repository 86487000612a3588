use eframe::egui::{self, Pos2, Rect, Ui};
use tracing::debug;

use paper_graph::{GraphEvent, PointerEvent};

use super::super::ViewModel;

struct FrameInput {
    pointer: Option<Pos2>,
    moved: bool,
    pressed: bool,
    released: bool,
    scroll: f32,
}

impl ViewModel {
    /// Feeds this frame's pointer input to the engine in canvas-local coordinates.
    pub(in crate::app) fn handle_canvas_input(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        let input = ui.input(|input| FrameInput {
            pointer: input.pointer.latest_pos(),
            moved: input.pointer.delta() != egui::Vec2::ZERO,
            pressed: input.pointer.primary_pressed(),
            released: input.pointer.primary_released(),
            scroll: input.raw_scroll_delta.y,
        });

        let local = |pos: Pos2| (pos - rect.min).to_pos2();
        let inside = input.pointer.is_some_and(|pos| rect.contains(pos));
        let mut events = Vec::new();

        if let Some(pos) = input.pointer {
            if input.pressed && inside && response.hovered() {
                self.pointer_captured = true;
                events.extend(self.engine.handle_pointer(PointerEvent::Down { pos: local(pos) }));
            }

            if input.moved && (inside || self.pointer_captured) {
                events.extend(self.engine.handle_pointer(PointerEvent::Move { pos: local(pos) }));
            }

            if input.released && self.pointer_captured {
                self.pointer_captured = false;
                events.extend(self.engine.handle_pointer(PointerEvent::Up { pos: local(pos) }));
            }

            if response.double_clicked() {
                events.extend(
                    self.engine
                        .handle_pointer(PointerEvent::DoubleClick { pos: local(pos) }),
                );
            }

            if inside && response.hovered() && input.scroll.abs() > f32::EPSILON {
                // egui reports wheel-up as positive; the engine zooms in on negative delta.
                events.extend(self.engine.handle_pointer(PointerEvent::Wheel {
                    pos: local(pos),
                    delta_y: -input.scroll,
                }));
            }
        } else if self.pointer_captured && input.released {
            // Released with no known position; the engine never sees an `Up`.
            self.pointer_captured = false;
            self.engine.cancel_gesture();
        }

        if self.canvas_hovered && !inside && !self.pointer_captured {
            events.extend(self.engine.handle_pointer(PointerEvent::Leave));
        }
        self.canvas_hovered = inside;

        self.apply_graph_events(events);
    }

    fn apply_graph_events(&mut self, events: Vec<GraphEvent>) {
        for event in events {
            match event {
                GraphEvent::NodeClicked(id) => self.set_selected(Some(id)),
                GraphEvent::HoverChanged(_) => {}
            }
        }
    }

    pub(in crate::app) fn set_selected(&mut self, selected: Option<String>) {
        if self.selected != selected {
            debug!(selected = ?selected, "selection changed");
            self.selected = selected;
        }
    }
}
