//! Scalar/kernel parity checks.
//!
//! Runs a function's scalar `transform` and its interpreted kernel fragment on the same sampled
//! inputs with identically seeded contexts, and compares the results. The sampled variant also
//! draws the amount and every parameter per sample.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::context::Context;
use crate::foundation::core::XyzPoint;
use crate::foundation::error::{FlameError, FlameResult};
use crate::kernel::CompiledKernel;
use crate::variation::{Capabilities, LayerView, ParamKind, Role, Variation, XFormView};

/// Relative tolerance (with an absolute floor of the same size near zero).
pub const PARITY_TOLERANCE: f64 = 1.0e-4;

/// Amount every default-parameter binding uses; not `1` so amount scaling is exercised.
pub const PARITY_AMOUNT: f64 = 0.8;

/// Magnitude range of sampled amounts; the sign is drawn separately.
const SAMPLED_AMOUNT: std::ops::Range<f64> = 0.2..1.5;

/// Range of sampled values for unbounded integer parameters.
const SAMPLED_INT: std::ops::RangeInclusive<i32> = 1..=5;

/// Largest offset from the default for unbounded float parameters.
const SAMPLED_FLOAT_SPREAD: f64 = 1.0;

/// Largest per-axis displacement of a ring-buffered blur, in units of its amount.
const BLUR_SUPPORT: f64 = 3.0;

/// How samples were compared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParityMode {
    /// Outputs must agree within [`PARITY_TOLERANCE`].
    Exact,
    /// Both paths must stay within the blur's support around the input.
    SupportBound,
}

/// One disagreeing sample.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ParityMismatch {
    /// Sample index.
    pub index: usize,
    /// Sampled input.
    pub input: XyzPoint,
    /// Amount of the binding for this sample.
    pub amount: f64,
    /// Output of the scalar path.
    pub scalar: XyzPoint,
    /// Output of the kernel path.
    pub kernel: XyzPoint,
}

/// Outcome of [`check_function`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ParityReport {
    /// Function name.
    pub name: String,
    /// Comparison mode.
    pub mode: ParityMode,
    /// Samples evaluated.
    pub samples: usize,
    /// Whether amounts and parameters were drawn per sample.
    pub sampled_params: bool,
    /// Samples that disagreed.
    pub mismatches: usize,
    /// Largest relative error among finite components (exact mode only).
    pub max_error: f64,
    /// First disagreeing sample, if any.
    pub first_mismatch: Option<ParityMismatch>,
}

impl ParityReport {
    /// Whether every sample agreed.
    pub fn is_ok(&self) -> bool {
        self.mismatches == 0
    }
}

/// Compare the scalar and kernel forms of function `name` over `samples` random inputs, with
/// default parameters and amount [`PARITY_AMOUNT`].
///
/// Even samples run with preserve-Z off, odd samples with it on.
#[tracing::instrument]
pub fn check_function(name: &str, samples: usize, seed: u64) -> FlameResult<ParityReport> {
    check(name, samples, seed, false)
}

/// Like [`check_function`], but every sample also draws its own amount and parameter set.
///
/// Ranged parameters are drawn inside their domain, unbounded integers from `1..=5` and
/// unbounded floats within one unit of their default.
#[tracing::instrument]
pub fn check_function_sampled(
    name: &str,
    samples: usize,
    seed: u64,
) -> FlameResult<ParityReport> {
    check(name, samples, seed, true)
}

/// A bound variation with its kernels compiled for preserve-Z off and on.
struct Prepared {
    variation: Variation,
    kernels: [CompiledKernel; 2],
}

impl Prepared {
    fn new(
        mut variation: Variation,
        layer: &LayerView,
        view: &XFormView,
        seed: u64,
    ) -> FlameResult<Self> {
        let mut init_ctx = Context::seeded(seed);
        variation.init(&mut init_ctx, layer, view);
        let kernels = [
            CompiledKernel::for_variation(&variation, &Context::seeded(seed))?,
            CompiledKernel::for_variation(
                &variation,
                &Context::seeded(seed).with_preserve_z(true),
            )?,
        ];
        Ok(Self { variation, kernels })
    }
}

fn check(
    name: &str,
    samples: usize,
    seed: u64,
    sampled_params: bool,
) -> FlameResult<ParityReport> {
    let base = Variation::by_name(name, PARITY_AMOUNT)?;
    if !base
        .func()
        .capabilities()
        .contains(Capabilities::SUPPORTS_GPU)
    {
        return Err(FlameError::unsupported(name, "SUPPORTS_GPU"));
    }

    let layer = LayerView {
        index: 0,
        xform_count: 1,
    };
    let view = XFormView::default();

    let mode = if base.func().stochastic_kernel() {
        ParityMode::SupportBound
    } else {
        ParityMode::Exact
    };
    let role = base.role();
    let mut fixed = if sampled_params {
        None
    } else {
        Some(Prepared::new(base.clone(), &layer, &view, seed)?)
    };
    let mut sampler = StdRng::seed_from_u64(seed);
    let mut report = ParityReport {
        name: name.to_owned(),
        mode,
        samples,
        sampled_params,
        mismatches: 0,
        max_error: 0.0,
        first_mismatch: None,
    };

    for i in 0..samples {
        let preserve_z = i % 2 == 1;
        let input = XyzPoint::new(
            sampler.gen_range(-2.0..2.0),
            sampler.gen_range(-2.0..2.0),
            sampler.gen_range(-2.0..2.0),
        )
        .with_color(sampler.r#gen::<f64>());
        let start = match role {
            Role::Post => input,
            Role::Pre | Role::Regular => XyzPoint::new(0.0, 0.0, 0.0).with_color(input.color),
        };
        let sample_seed = seed ^ (i as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15);

        let mut fresh;
        let prepared = match fixed.as_mut() {
            Some(p) => p,
            None => {
                let variation = sample_variation(&base, &mut sampler)?;
                fresh = Prepared::new(variation, &layer, &view, sample_seed)?;
                &mut fresh
            }
        };
        let amount = prepared.variation.amount();

        let mut s_in = input;
        let mut s_out = start;
        let mut ctx = Context::seeded(sample_seed).with_preserve_z(preserve_z);
        prepared
            .variation
            .apply(&mut ctx, &layer, &view, &mut s_in, &mut s_out);

        let mut k_in = input;
        let mut k_out = start;
        let mut ctx = Context::seeded(sample_seed).with_preserve_z(preserve_z);
        prepared.kernels[usize::from(preserve_z)].run(&mut ctx, &mut k_in, &mut k_out)?;

        let ok = match mode {
            ParityMode::Exact => {
                let pairs = [
                    (s_out.x, k_out.x),
                    (s_out.y, k_out.y),
                    (s_out.z, k_out.z),
                    (s_out.color, k_out.color),
                    (s_in.x, k_in.x),
                    (s_in.y, k_in.y),
                    (s_in.z, k_in.z),
                ];
                let mut ok = true;
                for (a, b) in pairs {
                    match relative_error(a, b) {
                        Some(e) => {
                            report.max_error = report.max_error.max(e);
                            ok &= e <= PARITY_TOLERANCE;
                        }
                        None => ok = false,
                    }
                }
                ok
            }
            ParityMode::SupportBound => {
                let bound = BLUR_SUPPORT * amount.abs() + PARITY_TOLERANCE;
                within_support(&input, &start, &s_in, &s_out, bound)
                    && within_support(&input, &start, &k_in, &k_out, bound)
            }
        };

        if !ok {
            report.mismatches += 1;
            if report.first_mismatch.is_none() {
                report.first_mismatch = Some(ParityMismatch {
                    index: i,
                    input,
                    amount,
                    scalar: s_out,
                    kernel: k_out,
                });
            }
        }
    }

    if !report.is_ok() {
        tracing::warn!(
            name,
            sampled_params,
            mismatches = report.mismatches,
            "scalar and kernel forms disagree"
        );
    }
    Ok(report)
}

/// Copy of `base` with a drawn amount and a drawn value for every declared parameter.
fn sample_variation(base: &Variation, sampler: &mut StdRng) -> FlameResult<Variation> {
    let mut variation = base.clone();
    let sign = if sampler.gen_bool(0.5) { 1.0 } else { -1.0 };
    variation.set_amount(sign * sampler.gen_range(SAMPLED_AMOUNT));
    for spec in base.func().params() {
        let current = base.func().get_parameter(spec.name)?;
        variation.set_parameter(spec.name, sample_param(spec.kind, current, sampler))?;
    }
    Ok(variation)
}

/// Draw a value inside `kind`'s domain.
pub(crate) fn sample_param(kind: ParamKind, current: f64, sampler: &mut StdRng) -> f64 {
    match kind {
        ParamKind::FloatRange { min, max } => sampler.gen_range(min..=max),
        ParamKind::IntRange { min, max } | ParamKind::IntTruncRange { min, max } => {
            f64::from(sampler.gen_range(min..=max))
        }
        ParamKind::Int | ParamKind::IntTrunc => f64::from(sampler.gen_range(SAMPLED_INT)),
        ParamKind::Float => {
            current + sampler.gen_range(-SAMPLED_FLOAT_SPREAD..=SAMPLED_FLOAT_SPREAD)
        }
    }
}

/// Relative error of `b` against `a`; `None` when exactly one side is non-finite or the
/// non-finite values differ. Matching NaNs agree.
pub fn relative_error(a: f64, b: f64) -> Option<f64> {
    if a.is_nan() && b.is_nan() {
        return Some(0.0);
    }
    if !a.is_finite() || !b.is_finite() {
        return (a == b).then_some(0.0);
    }
    Some((a - b).abs() / a.abs().max(b.abs()).max(1.0))
}

fn within_support(
    input: &XyzPoint,
    start: &XyzPoint,
    after_in: &XyzPoint,
    after_out: &XyzPoint,
    bound: f64,
) -> bool {
    let deltas = [
        after_in.x - input.x + after_out.x - start.x,
        after_in.y - input.y + after_out.y - start.y,
        after_in.z - input.z + after_out.z - start.z,
    ];
    deltas.iter().all(|d| d.is_finite() && d.abs() <= bound)
}

#[cfg(test)]
#[path = "../tests/unit/parity.rs"]
mod tests;
