//! Route playback for recorded vehicle movement.
//!
//! A [`source::RouteSource`] supplies the points for a vehicle/date
//! selection, a [`playback::PlaybackController`] walks a cursor over them on
//! a timer, and [`metrics::DerivedMetrics`] turns each cursor position into
//! speed, distance and motion status.

pub mod config;
pub mod core;
pub mod error;
pub mod input;
pub mod metrics;
pub mod playback;
pub mod session;
pub mod source;

pub use crate::core::RoutePoint;
pub use error::{RouteError, RouteResult};
pub use metrics::{DerivedMetrics, MotionStatus};
pub use playback::{Frame, PlaybackController, PlaybackSnapshot};
pub use session::Session;
