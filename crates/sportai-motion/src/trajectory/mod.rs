//! Joint trajectory capture and smoothing.
//!
//! Pose keypoints arrive either from a free-running animation loop or from
//! discrete seeks while scrubbing. Both paths feed the same [`JointTracker`],
//! which keeps a bounded ring buffer per joint; [`smooth_path`] turns a
//! buffer into a dense polyline. Local timing comes only from each sample's
//! frame index, never from an assumed sampling rate.

mod overlay;
mod smoother;
mod track;
mod tracker;

pub use overlay::{build_overlay, TrajectoryOverlay};
pub use smoother::{segment_count, smooth_path, PathPoint};
pub use track::JointTrack;
pub use tracker::JointTracker;
