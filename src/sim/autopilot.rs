//! Attract-mode autopilot
//!
//! A cheap heuristic that plays from a snapshot: sidestep the nearest hazard
//! heading for the player's column, otherwise drift toward a bonus star.
//! Drives the native headless demo.

use super::state::{ShapeKind, Snapshot};
use super::tick::TickInput;

/// How far above the player (in pixels) a hazard starts to matter
const LOOKAHEAD: f32 = 220.0;
/// Extra horizontal clearance wanted around a threat
const MARGIN: f32 = 12.0;

/// Pick this frame's input for the given snapshot
pub fn steer(snapshot: &Snapshot, playfield_width: f32) -> TickInput {
    let player = snapshot.player;
    let center = player.center().x;

    let threat = snapshot
        .shapes
        .iter()
        .filter(|s| s.kind.is_hazard())
        .filter(|s| {
            let above = player.y - s.rect().bottom();
            (-player.height..LOOKAHEAD).contains(&above)
        })
        .filter(|s| s.x < player.right() + MARGIN && s.x + s.size > player.x - MARGIN)
        .min_by(|a, b| b.y.total_cmp(&a.y));

    if let Some(threat) = threat {
        let threat_center = threat.center().x;
        let room_left = threat.x - MARGIN;
        let room_right = playfield_width - (threat.x + threat.size + MARGIN);
        // Dodge toward whichever side has room, preferring the nearer escape
        let go_left = if room_left < player.width {
            false
        } else if room_right < player.width {
            true
        } else {
            center < threat_center
        };
        return TickInput {
            left: go_left,
            right: !go_left,
            pointer_x: None,
        };
    }

    let bonus = snapshot
        .shapes
        .iter()
        .filter(|s| s.kind == ShapeKind::Bonus && s.y < player.y)
        .max_by(|a, b| a.y.total_cmp(&b.y));

    match bonus {
        Some(star) => {
            let target = star.center().x;
            TickInput {
                left: target < center - 4.0,
                right: target > center + 4.0,
                pointer_x: None,
            }
        }
        None => TickInput::default(),
    }
}
