use crate::foundation::core::XyzPoint;
use crate::foundation::error::FlameResult;

/// Configuration provided to a [`PointSink`] at the start of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Number of layers points may come from.
    pub layers: usize,
    /// Upper bound on the number of points that will be pushed.
    pub max_points: u64,
}

/// Consumer of plotted points (histogram accumulation lives behind this seam).
///
/// Ordering contract: points arrive grouped by worker, workers in index order, so a run is
/// reproducible for a fixed seed and worker count.
pub trait PointSink: Send {
    /// Called once before any point is pushed.
    fn begin(&mut self, cfg: SinkConfig) -> FlameResult<()>;
    /// Push one plotted point of layer `layer`.
    fn push(&mut self, layer: usize, point: &XyzPoint) -> FlameResult<()>;
    /// Called once after the last point is pushed.
    fn end(&mut self) -> FlameResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    pub(crate) points: Vec<(usize, XyzPoint)>,
    ended: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Borrow the captured `(layer, point)` pairs.
    pub fn points(&self) -> &[(usize, XyzPoint)] {
        &self.points
    }

    /// Whether `end` was called.
    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl PointSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> FlameResult<()> {
        self.cfg = Some(cfg);
        self.points.clear();
        self.ended = false;
        Ok(())
    }

    fn push(&mut self, layer: usize, point: &XyzPoint) -> FlameResult<()> {
        self.points.push((layer, *point));
        Ok(())
    }

    fn end(&mut self) -> FlameResult<()> {
        self.ended = true;
        Ok(())
    }
}

/// Sink that only keeps running bounds; used by the CLI.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct BoundsSink {
    /// Points received.
    pub count: u64,
    /// `[min_x, min_y, max_x, max_y]`, `None` before the first point.
    pub bounds: Option<[f64; 4]>,
}

impl PointSink for BoundsSink {
    fn begin(&mut self, _cfg: SinkConfig) -> FlameResult<()> {
        *self = Self::default();
        Ok(())
    }

    fn push(&mut self, _layer: usize, point: &XyzPoint) -> FlameResult<()> {
        self.count += 1;
        let b = self
            .bounds
            .get_or_insert([point.x, point.y, point.x, point.y]);
        b[0] = b[0].min(point.x);
        b[1] = b[1].min(point.y);
        b[2] = b[2].max(point.x);
        b[3] = b[3].max(point.y);
        Ok(())
    }

    fn end(&mut self) -> FlameResult<()> {
        Ok(())
    }
}
