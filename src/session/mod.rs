//! Chaos-game driver and the point sink seam.

pub(crate) mod iteration;
pub(crate) mod sink;

pub use iteration::{IterationSession, IterationStats, SessionOpts};
pub use sink::{BoundsSink, InMemorySink, PointSink, SinkConfig};
