use rayon::prelude::*;

use crate::context::Context;
use crate::flame::{Flame, Layer};
use crate::foundation::core::XyzPoint;
use crate::foundation::error::{FlameError, FlameResult};
use crate::session::sink::{PointSink, SinkConfig};

/// Options controlling an [`IterationSession`] run.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SessionOpts {
    /// Plotted-or-discarded iterations per run, split across workers and layers.
    pub iterations: u64,
    /// Iterations discarded at the start of every layer's orbit.
    pub warmup: u32,
    /// Enable worker-level parallelism (rayon), using a dedicated thread pool.
    pub parallel: bool,
    /// Override the number of workers. `None` uses rayon defaults.
    pub threads: Option<usize>,
    /// Base seed; worker `i` derives its own stream from it.
    pub seed: u64,
}

impl Default for SessionOpts {
    fn default() -> Self {
        Self {
            iterations: 100_000,
            warmup: 20,
            parallel: false,
            threads: None,
            seed: 0,
        }
    }
}

impl SessionOpts {
    /// Reject option combinations that cannot run.
    pub fn validate(&self) -> FlameResult<()> {
        if let Some(n) = self.threads
            && n == 0
        {
            return Err(FlameError::validation(
                "session 'threads' must be >= 1 when set",
            ));
        }
        Ok(())
    }
}

/// Counters of one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct IterationStats {
    /// Iterations after warmup.
    pub iterations: u64,
    /// Points pushed to the sink.
    pub plotted: u64,
    /// Points dropped by crop variations or draw modes.
    pub hidden: u64,
    /// Orbits restarted after leaving the finite domain.
    pub restarts: u64,
    /// Workers used.
    pub workers: usize,
}

impl IterationStats {
    fn merge(&mut self, other: &IterationStats) {
        self.iterations += other.iterations;
        self.plotted += other.plotted;
        self.hidden += other.hidden;
        self.restarts += other.restarts;
    }
}

/// Chaos-game driver over a validated flame.
///
/// Each worker owns a deep copy of the flame and its own [`Context`]; nothing is shared while
/// iterating.
#[derive(Clone, Debug)]
pub struct IterationSession {
    flame: Flame,
    opts: SessionOpts,
}

impl IterationSession {
    /// Prepare a session; the flame is copied.
    pub fn new(flame: &Flame, opts: SessionOpts) -> FlameResult<Self> {
        opts.validate()?;
        for (i, layer) in flame.layers().iter().enumerate() {
            if layer.is_visible()
                && layer.weight() > 0.0
                && !layer.xforms().iter().any(|xf| xf.weight() > 0.0)
            {
                return Err(FlameError::validation(format!(
                    "layer {i} has no transform with positive weight"
                )));
            }
        }
        Ok(Self {
            flame: flame.clone(),
            opts,
        })
    }

    /// Options in effect.
    pub fn opts(&self) -> &SessionOpts {
        &self.opts
    }

    /// Run the chaos game and stream plotted points into `sink`.
    #[tracing::instrument(skip(self, sink), fields(iterations = self.opts.iterations, parallel = self.opts.parallel))]
    pub fn run(&self, sink: &mut dyn PointSink) -> FlameResult<IterationStats> {
        sink.begin(SinkConfig {
            layers: self.flame.layers().len(),
            max_points: self.opts.iterations,
        })?;

        let stats = if self.opts.parallel {
            self.run_parallel(sink, None)?
        } else {
            let mut worker = Worker::new(&self.flame, &self.opts, 0, self.opts.iterations);
            worker.advance(u64::MAX, &mut |layer, p| sink.push(layer, p))?;
            IterationStats {
                workers: 1,
                ..worker.stats
            }
        };

        sink.end()?;
        tracing::debug!(plotted = stats.plotted, restarts = stats.restarts, "run finished");
        Ok(stats)
    }

    /// Parallel run in bounded rounds.
    ///
    /// Every round lets each worker take at most `round_steps` steps into its own buffer, then
    /// drains the buffers into the sink in worker order. For a fixed worker count and round size
    /// the sink sees the same sequence on every run; the round size only changes how the workers'
    /// streams interleave.
    pub(crate) fn run_parallel(
        &self,
        sink: &mut dyn PointSink,
        round_steps: Option<u64>,
    ) -> FlameResult<IterationStats> {
        let pool = build_thread_pool(self.opts.threads)?;
        let workers = self
            .opts
            .threads
            .unwrap_or_else(|| pool.current_num_threads())
            .max(1);
        let shares = split_even(self.opts.iterations, workers);
        let round_steps = round_steps.unwrap_or_else(|| max_round_steps(workers)).max(1);

        let mut states: Vec<Worker> = pool.install(|| {
            shares
                .par_iter()
                .enumerate()
                .map(|(w, &n)| Worker::new(&self.flame, &self.opts, w, n))
                .collect()
        });
        let mut buffers: Vec<Vec<(usize, XyzPoint)>> = vec![Vec::new(); workers];

        let mut rounds = 0u64;
        while states.iter().any(|w| !w.is_done()) {
            let results: Vec<FlameResult<()>> = pool.install(|| {
                states
                    .par_iter_mut()
                    .zip(buffers.par_iter_mut())
                    .map(|(state, buf)| {
                        state.advance(round_steps, &mut |layer, p| {
                            buf.push((layer, *p));
                            Ok(())
                        })
                    })
                    .collect()
            });
            for r in results {
                r?;
            }
            for buf in &mut buffers {
                for (layer, p) in buf.drain(..) {
                    sink.push(layer, &p)?;
                }
            }
            rounds += 1;
        }
        tracing::debug!(workers, round_steps, rounds, "parallel rounds finished");

        let mut total = IterationStats {
            workers,
            ..IterationStats::default()
        };
        for state in &states {
            total.merge(&state.stats);
        }
        Ok(total)
    }
}

const MAX_REORDER_BUFFER_BYTES: u64 = 128 * 1024 * 1024;

/// Steps per worker per round so that all round buffers together stay under
/// `MAX_REORDER_BUFFER_BYTES`. A step emits at most one point.
pub(crate) fn max_round_steps(workers: usize) -> u64 {
    let point_bytes = std::mem::size_of::<(usize, XyzPoint)>() as u64;
    (MAX_REORDER_BUFFER_BYTES / point_bytes.saturating_mul(workers.max(1) as u64).max(1)).max(1)
}

fn build_thread_pool(threads: Option<usize>) -> FlameResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(FlameError::validation(
            "session 'threads' must be >= 1 when set",
        ));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| FlameError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

/// Split `total` into `parts` shares differing by at most one.
pub(crate) fn split_even(total: u64, parts: usize) -> Vec<u64> {
    let parts = parts.max(1) as u64;
    (0..parts)
        .map(|i| total / parts + u64::from(i < total % parts))
        .collect()
}

/// Split `total` proportionally to `weights`; the rounding remainder goes to the heaviest entry.
pub(crate) fn split_by_weight(total: u64, weights: &[f64]) -> Vec<u64> {
    let sum: f64 = weights.iter().filter(|w| **w > 0.0).sum();
    if sum <= 0.0 {
        return vec![0; weights.len()];
    }
    let mut shares: Vec<u64> = weights
        .iter()
        .map(|&w| {
            if w > 0.0 {
                (total as f64 * w / sum).floor() as u64
            } else {
                0
            }
        })
        .collect();
    let assigned: u64 = shares.iter().sum();
    let heaviest = weights
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i);
    if let Some(i) = heaviest {
        shares[i] += total.saturating_sub(assigned);
    }
    shares
}

fn random_start(ctx: &mut Context) -> XyzPoint {
    XyzPoint::new(2.0 * ctx.random() - 1.0, 2.0 * ctx.random() - 1.0, 0.0)
        .with_color(ctx.random())
}

/// Resumable state of one worker: its flame copy, its random stream and the orbits it still owes.
#[derive(Debug)]
pub(crate) struct Worker {
    flame: Flame,
    ctx: Context,
    orbits: Vec<Orbit>,
    current: usize,
    pub(crate) stats: IterationStats,
}

impl Worker {
    pub(crate) fn new(flame: &Flame, opts: &SessionOpts, worker: usize, iterations: u64) -> Self {
        let mut flame = flame.clone();
        let mut ctx = Context::for_worker(opts.seed, worker);
        flame.init_pass(&mut ctx);

        let weights: Vec<f64> = flame
            .layers()
            .iter()
            .map(|l| if l.is_visible() { l.weight() } else { 0.0 })
            .collect();
        let orbits = split_by_weight(iterations, &weights)
            .into_iter()
            .enumerate()
            .filter(|&(_, n)| n > 0)
            .map(|(layer, n)| Orbit::new(layer, u64::from(opts.warmup), n))
            .collect();

        Self {
            flame,
            ctx,
            orbits,
            current: 0,
            stats: IterationStats::default(),
        }
    }

    pub(crate) fn is_done(&self) -> bool {
        self.current >= self.orbits.len()
    }

    /// Take up to `budget` steps, moving on to the next layer's orbit as each one finishes.
    pub(crate) fn advance(
        &mut self,
        budget: u64,
        emit: &mut dyn FnMut(usize, &XyzPoint) -> FlameResult<()>,
    ) -> FlameResult<()> {
        let mut left = budget;
        while left > 0 && !self.is_done() {
            let orbit = &mut self.orbits[self.current];
            let layer = &mut self.flame.layers_mut()[orbit.layer];
            left -= orbit.run(layer, &mut self.ctx, left, &mut self.stats, emit)?;
            if orbit.is_finished() {
                self.current += 1;
            }
        }
        Ok(())
    }
}

/// Progress of one layer's orbit. The start point is drawn when the orbit takes its first step.
#[derive(Clone, Debug)]
struct Orbit {
    layer: usize,
    warmup: u64,
    total: u64,
    step: u64,
    point: Option<XyzPoint>,
    prev: Option<usize>,
}

impl Orbit {
    fn new(layer: usize, warmup: u64, iterations: u64) -> Self {
        Self {
            layer,
            warmup,
            total: warmup + iterations,
            step: 0,
            point: None,
            prev: None,
        }
    }

    fn is_finished(&self) -> bool {
        self.step >= self.total
    }

    /// Returns the number of steps taken, at most `budget`.
    fn run(
        &mut self,
        layer: &mut Layer,
        ctx: &mut Context,
        budget: u64,
        stats: &mut IterationStats,
        emit: &mut dyn FnMut(usize, &XyzPoint) -> FlameResult<()>,
    ) -> FlameResult<u64> {
        let mut point = match self.point {
            Some(p) => p,
            None => random_start(ctx),
        };
        let mut taken = 0u64;

        while taken < budget && self.step < self.total {
            let Some(idx) = layer.select(self.prev, ctx) else {
                tracing::warn!(layer = self.layer, "no selectable transform, orbit ended early");
                self.step = self.total;
                break;
            };
            layer.apply_xform(idx, ctx, &mut point);
            ctx.advance();
            self.step += 1;
            taken += 1;

            if !point.is_finite() {
                stats.restarts += 1;
                point = random_start(ctx);
                self.prev = None;
                continue;
            }
            self.prev = Some(idx);
            if self.step <= self.warmup {
                continue;
            }
            stats.iterations += 1;

            if point.hide || !layer.xforms()[idx].plots(ctx) {
                stats.hidden += 1;
                continue;
            }
            let mut emitted = point;
            layer.apply_finals(ctx, &mut emitted);
            if emitted.hide || !emitted.is_finite() {
                stats.hidden += 1;
                continue;
            }
            emit(self.layer, &emitted)?;
            stats.plotted += 1;
        }

        self.point = Some(point);
        Ok(taken)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/iteration.rs"]
mod tests;
