use bevy::prelude::*;

use crate::basketball3d::controllers::balls_over_limit;
use crate::basketball3d::types::*;

/// Despawn the oldest balls when `max_balls` is set and exceeded.
pub fn limit_balls(
    mut commands: Commands,
    config: Res<GameConfig>,
    balls: Query<(Entity, &Ball)>,
) {
    let excess = balls_over_limit(balls.iter().count(), config.gameplay.max_balls);
    if excess == 0 {
        return;
    }

    let mut oldest: Vec<(Entity, u64)> =
        balls.iter().map(|(entity, ball)| (entity, ball.serial)).collect();
    oldest.sort_by_key(|(_, serial)| *serial);
    for (entity, serial) in oldest.into_iter().take(excess) {
        debug!("Removing ball {serial}");
        commands.entity(entity).despawn();
    }
}
