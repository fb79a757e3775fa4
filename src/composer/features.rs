//! Feature stage: objects appended around and onto the envelope.
//!
//! Only the garden draws from the generator. Everything after it is a fixed
//! function of the record.

use rand::Rng;

use crate::domain::{Feature, Position, Room, Shape};

use super::palette;
use super::SceneBuilder;

const MIN_TREES: u32 = 2;
const MAX_TREES: u32 = 5;
/// Clearance kept between trees and the building.
const TREE_MARGIN: f64 = 2.0;
const MAX_PLACEMENT_ATTEMPTS: usize = 64;
const TRUNK_RADIUS: f64 = 0.3;
const TRUNK_HEIGHT: f64 = 4.0;
const CANOPY_RADIUS: f64 = 1.5;

const POOL_SIZE: (f64, f64, f64) = (6.0, 0.5, 4.0);
const POOL_GAP: f64 = 5.0;
const PARKING_SIZE: (f64, f64, f64) = (4.0, 3.0, 6.0);
const PARKING_GAP: f64 = 3.0;

const PILLAR_RADIUS: f64 = 0.3;
const BALCONY_DEPTH: f64 = 1.5;
const BALCONY_THICKNESS: f64 = 0.2;
const WALL_GAP: f64 = 9.0;
const WALL_HEIGHT: f64 = 1.8;
const WALL_THICKNESS: f64 = 0.3;
const COURTYARD_SHARE: f64 = 0.4;
const COURTYARD_THICKNESS: f64 = 0.05;

impl SceneBuilder<'_> {
    /// Trees scattered outside the footprint expanded by [`TREE_MARGIN`].
    pub(super) fn garden(&mut self) {
        if !self.record.has_feature(Feature::Garden) {
            return;
        }
        let (w, d) = (self.width, self.depth);
        let span = w.max(d);
        let extent = (span * 1.5).max(span / 2.0 + 5.0);
        let clear_x = w / 2.0 + TREE_MARGIN;
        let clear_z = d / 2.0 + TREE_MARGIN;

        let count = self.rng.random_range(MIN_TREES..=MAX_TREES);
        for tree in 0..count {
            let mut spot = None;
            for _ in 0..MAX_PLACEMENT_ATTEMPTS {
                let x = self.rng.random_range(-extent..extent);
                let z = self.rng.random_range(-extent..extent);
                if x.abs() > clear_x || z.abs() > clear_z {
                    spot = Some((x, z));
                    break;
                }
            }
            let Some((x, z)) = spot else {
                continue;
            };

            self.push(
                format!("tree_{tree}_trunk"),
                Shape::Cylinder {
                    radius: TRUNK_RADIUS,
                    height: TRUNK_HEIGHT,
                },
                Position::new(x, TRUNK_HEIGHT / 2.0, z),
                "wood",
                palette::TRUNK,
            );
            self.push(
                format!("tree_{tree}_canopy"),
                Shape::Sphere {
                    radius: CANOPY_RADIUS,
                },
                Position::new(x, TRUNK_HEIGHT + 1.0, z),
                "foliage",
                palette::CANOPY,
            );
        }
    }

    /// Sunken pool beyond the +x side.
    pub(super) fn swimming_pool(&mut self) {
        if !self.record.has_feature(Feature::SwimmingPool) {
            return;
        }
        let (width, height, depth) = POOL_SIZE;
        self.push(
            "swimming_pool",
            Shape::Box { width, height, depth },
            Position::new(self.width / 2.0 + POOL_GAP, -height / 2.0, 0.0),
            "water",
            palette::POOL,
        );
    }

    /// Parking slab beyond the -x side.
    pub(super) fn parking(&mut self) {
        if !self.record.has_feature(Feature::Parking) && !self.record.has_room(Room::Garage) {
            return;
        }
        let (width, height, depth) = PARKING_SIZE;
        self.push(
            "parking",
            Shape::Box { width, height, depth },
            Position::new(-(self.width / 2.0 + PARKING_GAP), height / 2.0, 0.0),
            "concrete",
            palette::PARKING,
        );
    }

    pub(super) fn pillars(&mut self) {
        if !self.record.has_feature(Feature::Pillars) && !self.rules.corner_pillars {
            return;
        }
        let (hx, hz, h) = (self.width / 2.0, self.depth / 2.0, self.height);
        let corners = [(-hx, hz), (hx, hz), (-hx, -hz), (hx, -hz)];
        for (i, (x, z)) in corners.into_iter().enumerate() {
            self.push(
                format!("pillar_{i}"),
                Shape::Cylinder {
                    radius: PILLAR_RADIUS,
                    height: h,
                },
                Position::new(x, h / 2.0, z),
                "stone",
                palette::PILLAR,
            );
        }
    }

    /// One slab on the façade per upper floor.
    pub(super) fn balconies(&mut self) {
        if !self.record.has_feature(Feature::Balcony) && !self.record.has_room(Room::Balcony) {
            return;
        }
        let material = self.wall_material();
        let color = self.wall_color();
        for floor in 1..self.floors() {
            let y = f64::from(floor) * self.floor_height;
            self.push(
                format!("balcony_{floor}"),
                Shape::Box {
                    width: self.width * 0.4,
                    height: BALCONY_THICKNESS,
                    depth: BALCONY_DEPTH,
                },
                Position::new(0.0, y, self.depth / 2.0 + BALCONY_DEPTH / 2.0),
                material,
                color,
            );
        }
    }

    pub(super) fn compound_wall(&mut self) {
        if !self.record.has_feature(Feature::CompoundWall) {
            return;
        }
        self.push(
            "compound_wall",
            Shape::Box {
                width: WALL_THICKNESS,
                height: WALL_HEIGHT,
                depth: self.depth + 2.0 * POOL_GAP,
            },
            Position::new(self.width / 2.0 + WALL_GAP, WALL_HEIGHT / 2.0, 0.0),
            "brick",
            palette::BOUNDARY_WALL,
        );
    }

    /// Paved patch at the center of the ground floor.
    pub(super) fn courtyard(&mut self) {
        if !self.record.has_feature(Feature::Courtyard) && !self.record.has_room(Room::Courtyard) {
            return;
        }
        self.push(
            "courtyard",
            Shape::Box {
                width: self.width * COURTYARD_SHARE,
                height: COURTYARD_THICKNESS,
                depth: self.depth * COURTYARD_SHARE,
            },
            Position::new(0.0, COURTYARD_THICKNESS / 2.0, 0.0),
            "stone",
            palette::PAVING,
        );
    }
}
