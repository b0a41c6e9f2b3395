//! AR Basketball
//!
//! Place a backboard on a tracked wall, then throw physics-driven balls at it.
//! The gameplay core talks to the tracking/rendering engine through the
//! [`basketball3d::engine::ArEngine`] boundary, which is implemented both by the
//! Bevy desktop front-end and by an in-memory engine used for headless replay.

pub mod basketball3d;
