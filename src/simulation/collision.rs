//! Hazard and collision detection
//!
//! Vehicle-scale tests use axis-aligned rectangular hitboxes; pedestrian
//! scale tests use circular radii. Blocking checks gate proposed player
//! moves, while the lethal check runs every tick against the player's
//! current position with direction-aware rules: only front and side
//! impacts from a fast-moving vehicle kill, rear contact never does.

use super::pedestrian::Pedestrian;
use super::types::{Direction, Position};
use super::vehicle::{Vehicle, VehicleKind};

/// Player collision half-size against vehicle hitboxes
pub const PLAYER_HALF_SIZE: f32 = 6.0;

/// Extra hitbox padding applied for move-blocking checks
pub const BLOCKING_PADDING: f32 = 5.0;

/// Player radius against pedestrians
pub const PLAYER_RADIUS: f32 = 8.0;

/// Pedestrian radius against the player
pub const PEDESTRIAN_BLOCK_RADIUS: f32 = 10.0;

/// Minimum vehicle speed for an impact to be lethal
pub const LETHAL_SPEED: f32 = 1.8;

/// Signed offset along the heading axis behind which contact counts as a
/// harmless rear-end
pub const REAR_EXEMPTION: f32 = 20.0;

/// Axis-aligned vehicle hitbox in world units
#[derive(Debug, Clone, Copy)]
pub struct Hitbox {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

/// Hitbox for a vehicle, rotated 90 degrees when heading horizontally.
/// Trucks have a larger footprint than cars and ambulances.
pub fn vehicle_hitbox(vehicle: &Vehicle) -> Hitbox {
    let (width, height) = match vehicle.kind {
        VehicleKind::Truck => (32.0, 51.0),
        VehicleKind::Car | VehicleKind::Ambulance => (27.0, 46.0),
    };

    let (half_w, half_h) = if vehicle.direction.is_horizontal() {
        (height / 2.0, width / 2.0)
    } else {
        (width / 2.0, height / 2.0)
    };

    Hitbox {
        left: vehicle.position.x - half_w,
        right: vehicle.position.x + half_w,
        top: vehicle.position.y - half_h,
        bottom: vehicle.position.y + half_h,
    }
}

/// True when the player's collision square at (x, y), expanded by
/// `padding`, overlaps the hitbox.
pub fn hitbox_contains_player(x: f32, y: f32, hitbox: &Hitbox, padding: f32) -> bool {
    let size = PLAYER_HALF_SIZE + padding;
    x + size > hitbox.left
        && x - size < hitbox.right
        && y + size > hitbox.top
        && y - size < hitbox.bottom
}

/// Would a player move to `proposed` be blocked by any vehicle?
pub fn player_blocked_by_vehicles(proposed: Position, vehicles: &[Vehicle]) -> bool {
    vehicles.iter().any(|vehicle| {
        let hitbox = vehicle_hitbox(vehicle);
        hitbox_contains_player(proposed.x, proposed.y, &hitbox, BLOCKING_PADDING)
    })
}

/// Would a player move to `proposed` be blocked by a living pedestrian?
pub fn player_blocked_by_pedestrians(proposed: Position, pedestrians: &[Pedestrian]) -> bool {
    let threshold = PLAYER_RADIUS + PEDESTRIAN_BLOCK_RADIUS;
    pedestrians
        .iter()
        .filter(|pedestrian| pedestrian.alive)
        .any(|pedestrian| proposed.distance(&pedestrian.position) < threshold)
}

/// Does any vehicle lethally strike a player standing at `player` this
/// tick? Slow vehicles are harmless, and contact behind the vehicle's
/// direction of travel is exempt.
pub fn lethal_vehicle_collision(player: Position, vehicles: &[Vehicle]) -> bool {
    vehicles.iter().any(|vehicle| {
        let hitbox = vehicle_hitbox(vehicle);
        if !hitbox_contains_player(player.x, player.y, &hitbox, 0.0) {
            return false;
        }
        if vehicle.speed < LETHAL_SPEED {
            return false;
        }

        let dx = player.x - vehicle.position.x;
        let dy = player.y - vehicle.position.y;
        match vehicle.direction {
            Direction::Right => dx > -REAR_EXEMPTION,
            Direction::Left => dx < REAR_EXEMPTION,
            Direction::Down => dy > -REAR_EXEMPTION,
            Direction::Up => dy < REAR_EXEMPTION,
        }
    })
}
