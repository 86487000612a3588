use eframe::egui::{Vec2, vec2};

use super::quadtree::Cell;

/// Inverse-square push between two points, distance floored at 1.
fn repulsion_between(delta: Vec2, fallback_seed: f32, strength: f32) -> Vec2 {
    let distance = delta.length();
    let direction = if distance > 0.0001 {
        delta / distance
    } else {
        let angle = fallback_seed * std::f32::consts::TAU;
        vec2(angle.cos(), angle.sin())
    };
    let distance = distance.max(1.0);
    direction * (strength / (distance * distance))
}

fn pair_seed(first: usize, second: usize) -> f32 {
    (first as f32) * 0.618_034 + (second as f32) * 0.414_214
}

pub(super) fn accumulate_pairwise_repulsion(
    positions: &[Vec2],
    strength: f32,
    displacement: &mut [Vec2],
) {
    for i in 0..positions.len() {
        for j in (i + 1)..positions.len() {
            let push = repulsion_between(positions[i] - positions[j], pair_seed(i, j), strength);
            displacement[i] += push;
            displacement[j] -= push;
        }
    }
}

pub(super) fn accumulate_barnes_hut_repulsion(
    positions: &[Vec2],
    strength: f32,
    theta: f32,
    displacement: &mut [Vec2],
) {
    let Some(root) = Cell::build(positions) else {
        return;
    };

    for (index, entry) in displacement.iter_mut().enumerate() {
        repulsion_from_cell(&root, index, positions, strength, theta, entry);
    }
}

fn repulsion_from_cell(
    cell: &Cell,
    index: usize,
    positions: &[Vec2],
    strength: f32,
    theta: f32,
    displacement: &mut Vec2,
) {
    if cell.mass <= 0.0 {
        return;
    }

    let point = positions[index];

    if cell.is_leaf() {
        for &other in &cell.indices {
            if other == index {
                continue;
            }
            // Same orientation as the pairwise pass so coincident points split identically.
            let seed = pair_seed(index.min(other), index.max(other));
            *displacement += if index < other {
                repulsion_between(point - positions[other], seed, strength)
            } else {
                -repulsion_between(positions[other] - point, seed, strength)
            };
        }
        return;
    }

    let delta = point - cell.center_of_mass;
    let distance = delta.length().max(1.0);
    let far_enough =
        !cell.square.contains(point) && (cell.square.side() / distance) < theta && cell.mass > 1.0;

    if far_enough {
        *displacement += (delta / distance) * (strength * cell.mass / (distance * distance));
        return;
    }

    for child in cell.children.iter().flatten() {
        repulsion_from_cell(child, index, positions, strength, theta, displacement);
    }
}

pub(super) struct Spring {
    pub(super) source: usize,
    pub(super) target: usize,
    pub(super) weight: f32,
}

pub(super) fn accumulate_springs(
    positions: &[Vec2],
    springs: &[Spring],
    stiffness: f32,
    ideal_length: f32,
    displacement: &mut [Vec2],
) {
    if stiffness <= 0.0 {
        return;
    }

    for spring in springs {
        let (source, target) = (spring.source, spring.target);
        if source >= positions.len() || target >= positions.len() || source == target {
            continue;
        }

        let delta = positions[target] - positions[source];
        let distance = delta.length();
        if distance <= 0.0001 {
            continue;
        }

        let pull = (delta / distance) * ((distance - ideal_length) * stiffness * spring.weight);
        displacement[source] += pull;
        displacement[target] -= pull;
    }
}
