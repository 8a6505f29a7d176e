//! Stochastic blurs. `pre_blur` and `blur3D` keep a ring of cached uniforms whose sum
//! approximates a Gaussian; the ring belongs to the binding and is re-seeded by `init`.

use crate::context::Context;
use crate::foundation::core::XyzPoint;
use crate::foundation::math::{M_2PI, PI};
use crate::variation::funcs::{carry_z, kernel_carry_z};
use crate::variation::{Capabilities, LayerView, ParamSpec, VariationFunc, XFormView};

/// Fixed-size ring of uniform draws.
#[derive(Clone, Debug)]
pub(crate) struct GaussRing<const N: usize> {
    slots: [f64; N],
    next: usize,
}

impl<const N: usize> Default for GaussRing<N> {
    fn default() -> Self {
        Self {
            slots: [0.0; N],
            next: 0,
        }
    }
}

impl<const N: usize> GaussRing<N> {
    pub(crate) fn reseed(&mut self, ctx: &mut Context) {
        for s in &mut self.slots {
            *s = ctx.random();
        }
        self.next = 0;
    }

    pub(crate) fn sum(&self) -> f64 {
        self.slots.iter().sum()
    }

    /// Replace the oldest slot with a fresh draw.
    pub(crate) fn refresh(&mut self, ctx: &mut Context) {
        self.slots[self.next] = ctx.random();
        self.next = (self.next + 1) % N;
    }

    /// Replace the current slot and step the cursor with `(next + 1) & mask`.
    ///
    /// `pre_blur` steps with mask 5, so only slots 0 and 1 are ever redrawn after `reseed`.
    pub(crate) fn refresh_masked(&mut self, ctx: &mut Context, mask: usize) {
        self.slots[self.next] = ctx.random();
        self.next = ((self.next + 1) & mask) % N;
    }
}

/// Uniform disc blur.
#[derive(Clone, Debug, Default)]
pub(crate) struct Blur;

impl VariationFunc for Blur {
    fn name(&self) -> &'static str {
        "blur"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::D2 | Capabilities::BLUR | Capabilities::SUPPORTS_GPU
    }

    fn transform(
        &mut self,
        ctx: &mut Context,
        _xform: &XFormView,
        input: &mut XyzPoint,
        output: &mut XyzPoint,
        amount: f64,
    ) {
        let a = ctx.random() * M_2PI;
        let r = amount * ctx.random();
        output.x += r * a.cos();
        output.y += r * a.sin();
        carry_z(ctx, input, output, amount);
    }

    fn kernel_source(&self, ctx: &Context) -> Option<String> {
        Some(format!(
            "float a = RANDFLOAT()*(PI + PI);\n\
             float r2 = __blur*RANDFLOAT();\n\
             __px += r2*cosf(a);\n\
             __py += r2*sinf(a);\n{}",
            kernel_carry_z(ctx, "blur")
        ))
    }

    fn box_clone(&self) -> Box<dyn VariationFunc> {
        Box::new(self.clone())
    }
}

const PRE_BLUR_RING_MASK: usize = 5;

/// Gaussian jitter of the input before the affine stage.
#[derive(Clone, Debug, Default)]
pub(crate) struct PreBlur {
    ring: GaussRing<6>,
}

impl VariationFunc for PreBlur {
    fn name(&self) -> &'static str {
        "pre_blur"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::D2 | Capabilities::BLUR | Capabilities::PRE | Capabilities::SUPPORTS_GPU
    }

    fn init(&mut self, ctx: &mut Context, _layer: &LayerView, _xform: &XFormView, _amount: f64) {
        self.ring.reseed(ctx);
    }

    fn transform(
        &mut self,
        ctx: &mut Context,
        _xform: &XFormView,
        input: &mut XyzPoint,
        _output: &mut XyzPoint,
        amount: f64,
    ) {
        let a = ctx.random() * M_2PI;
        let r = amount * (self.ring.sum() - 3.0);
        self.ring.refresh_masked(ctx, PRE_BLUR_RING_MASK);
        input.x += r * a.cos();
        input.y += r * a.sin();
    }

    fn kernel_source(&self, _ctx: &Context) -> Option<String> {
        Some(
            "float rndG = __pre_blur*(RANDFLOAT() + RANDFLOAT() + RANDFLOAT() + RANDFLOAT() + RANDFLOAT() + RANDFLOAT() - 3.f);\n\
             float rndA = RANDFLOAT()*2.f*PI;\n\
             __x += rndG*cosf(rndA);\n\
             __y += rndG*sinf(rndA);\n\
             __r2 = __x*__x + __y*__y;\n\
             __r = sqrtf(__r2);\n\
             __rinv = 1.f/__r;\n\
             __phi = atan2f(__x, __y);\n\
             __theta = atan2f(__y, __x);\n\
             if (__r > 0.f) {\n  __sinA = __x/__r;\n  __cosA = __y/__r;\n} else {\n  __sinA = 0.f;\n  __cosA = 1.f;\n}\n"
                .into(),
        )
    }

    fn stochastic_kernel(&self) -> bool {
        true
    }

    fn box_clone(&self) -> Box<dyn VariationFunc> {
        Box::new(self.clone())
    }
}

/// Gaussian blur on the sphere.
#[derive(Clone, Debug, Default)]
pub(crate) struct Blur3D {
    ring: GaussRing<4>,
}

impl VariationFunc for Blur3D {
    fn name(&self) -> &'static str {
        "blur3D"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::D3 | Capabilities::BLUR | Capabilities::SUPPORTS_GPU
    }

    fn init(&mut self, ctx: &mut Context, _layer: &LayerView, _xform: &XFormView, _amount: f64) {
        self.ring.reseed(ctx);
    }

    fn transform(
        &mut self,
        ctx: &mut Context,
        _xform: &XFormView,
        _input: &mut XyzPoint,
        output: &mut XyzPoint,
        amount: f64,
    ) {
        let a = ctx.random() * M_2PI;
        let r = amount * (self.ring.sum() - 2.0);
        self.ring.refresh(ctx);
        let b = ctx.random() * PI;
        output.x += r * b.sin() * a.cos();
        output.y += r * b.sin() * a.sin();
        output.z += r * b.cos();
    }

    fn kernel_source(&self, _ctx: &Context) -> Option<String> {
        Some(
            "float a = RANDFLOAT()*2.f*M_PI_F;\n\
             float b = RANDFLOAT()*M_PI_F;\n\
             float rndG = __blur3D*(RANDFLOAT() + RANDFLOAT() + RANDFLOAT() + RANDFLOAT() - 2.f);\n\
             __px += rndG*sinf(b)*cosf(a);\n\
             __py += rndG*sinf(b)*sinf(a);\n\
             __pz += rndG*cosf(b);\n"
                .into(),
        )
    }

    fn stochastic_kernel(&self) -> bool {
        true
    }

    fn box_clone(&self) -> Box<dyn VariationFunc> {
        Box::new(self.clone())
    }
}

static PARABOLA_PARAMS: [ParamSpec; 2] = [ParamSpec::float("width"), ParamSpec::float("height")];

#[derive(Clone, Debug)]
pub(crate) struct Parabola {
    width: f64,
    height: f64,
}

impl Default for Parabola {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 0.5,
        }
    }
}

impl VariationFunc for Parabola {
    fn name(&self) -> &'static str {
        "parabola"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::D2 | Capabilities::SUPPORTS_GPU
    }

    fn params(&self) -> &'static [ParamSpec] {
        &PARABOLA_PARAMS
    }

    fn param(&self, idx: usize) -> f64 {
        match idx {
            0 => self.width,
            _ => self.height,
        }
    }

    fn store_param(&mut self, idx: usize, value: f64) {
        match idx {
            0 => self.width = value,
            _ => self.height = value,
        }
    }

    fn transform(
        &mut self,
        ctx: &mut Context,
        _xform: &XFormView,
        input: &mut XyzPoint,
        output: &mut XyzPoint,
        amount: f64,
    ) {
        let r = input.polar().sqrt;
        let (sr, cr) = r.sin_cos();
        output.x += self.height * amount * sr * sr * ctx.random();
        output.y += self.width * amount * cr * ctx.random();
        carry_z(ctx, input, output, amount);
    }

    fn kernel_source(&self, ctx: &Context) -> Option<String> {
        Some(format!(
            "float rn = RANDFLOAT();\n\
             __px += __parabola*__parabola_height*sinf(__r)*sinf(__r)*rn;\n\
             rn = RANDFLOAT();\n\
             __py += __parabola*__parabola_width*cosf(__r)*rn;\n{}",
            kernel_carry_z(ctx, "parabola")
        ))
    }

    fn box_clone(&self) -> Box<dyn VariationFunc> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/variation/funcs/blur.rs"]
mod tests;
