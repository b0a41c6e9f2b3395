//! Detected-plane visualisation
//!
//! Each vertical anchor gets one translucent quad as the child of its node. The
//! quad follows the anchor's extent and center on every update, without any
//! smoothing. Anchors of any other alignment are ignored.

use bevy::prelude::*;

use crate::basketball3d::engine::ArEngine;
use crate::basketball3d::types::{AnchorId, PlaneAnchor, PlaneVisual};

/// Anchor-added callback. Returns `true` if a visual was attached.
pub fn on_anchor_added<E: ArEngine>(engine: &mut E, anchor: &PlaneAnchor, color: Color) -> bool {
    if !anchor.is_vertical() {
        return false;
    }

    engine.attach_plane_visual(anchor.id, PlaneVisual::from_anchor(anchor, color));
    true
}

/// Anchor-updated callback. Returns `true` if an existing visual was refit.
///
/// An update for an anchor whose visual was never created does nothing.
pub fn on_anchor_updated<E: ArEngine>(engine: &mut E, anchor: &PlaneAnchor) -> bool {
    if !anchor.is_vertical() {
        return false;
    }

    let Some(mut visual) = engine.plane_visual(anchor.id) else {
        return false;
    };

    visual.fit_to(anchor);
    engine.replace_plane_visual(anchor.id, visual);
    true
}

/// Anchor-removed callback.
pub fn on_anchor_removed<E: ArEngine>(engine: &mut E, anchor: AnchorId) {
    engine.remove_plane_visual(anchor);
}
