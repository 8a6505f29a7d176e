//! Hyperbolic and complex-analytic maps.

use crate::context::Context;
use crate::foundation::core::XyzPoint;
use crate::foundation::math::{Complex, M_2_PI, sqr, sqrt_safe};
use crate::variation::funcs::{carry_z, kernel_carry_z};
use crate::variation::{Capabilities, ParamSpec, VariationFunc, XFormView};

static BS_PARAMS: [ParamSpec; 4] = [
    ParamSpec::float("x1"),
    ParamSpec::float("x2"),
    ParamSpec::float("y1"),
    ParamSpec::float("y2"),
];

/// Per-axis frequency multipliers shared by the `*_bs` family.
#[derive(Clone, Copy, Debug)]
pub(crate) struct BsFreq {
    x1: f64,
    x2: f64,
    y1: f64,
    y2: f64,
}

impl Default for BsFreq {
    fn default() -> Self {
        Self {
            x1: 1.0,
            x2: 1.0,
            y1: 1.0,
            y2: 1.0,
        }
    }
}

impl BsFreq {
    fn get(&self, idx: usize) -> f64 {
        match idx {
            0 => self.x1,
            1 => self.x2,
            2 => self.y1,
            _ => self.y2,
        }
    }

    fn set(&mut self, idx: usize, value: f64) {
        match idx {
            0 => self.x1 = value,
            1 => self.x2 = value,
            2 => self.y1 = value,
            _ => self.y2 = value,
        }
    }
}

macro_rules! bs_params {
    () => {
        fn params(&self) -> &'static [ParamSpec] {
            &BS_PARAMS
        }

        fn param(&self, idx: usize) -> f64 {
            self.freq.get(idx)
        }

        fn store_param(&mut self, idx: usize, value: f64) {
            self.freq.set(idx, value);
        }
    };
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Cosh2Bs {
    freq: BsFreq,
}

impl VariationFunc for Cosh2Bs {
    fn name(&self) -> &'static str {
        "cosh2_bs"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::D2 | Capabilities::SUPPORTS_GPU
    }

    bs_params!();

    fn transform(
        &mut self,
        ctx: &mut Context,
        _xform: &XFormView,
        input: &mut XyzPoint,
        output: &mut XyzPoint,
        amount: f64,
    ) {
        let f = &self.freq;
        output.x += amount * (input.x * f.x2).cosh() * (input.y * f.y2).cos();
        output.y += amount * (input.x * f.x1).sinh() * (input.y * f.y1).sin();
        carry_z(ctx, input, output, amount);
    }

    fn kernel_source(&self, ctx: &Context) -> Option<String> {
        Some(format!(
            "__px += __cosh2_bs*coshf(__x*__cosh2_bs_x2)*cosf(__y*__cosh2_bs_y2);\n\
             __py += __cosh2_bs*sinhf(__x*__cosh2_bs_x1)*sinf(__y*__cosh2_bs_y1);\n{}",
            kernel_carry_z(ctx, "cosh2_bs")
        ))
    }

    fn box_clone(&self) -> Box<dyn VariationFunc> {
        Box::new(self.clone())
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Csc2Bs {
    freq: BsFreq,
}

impl VariationFunc for Csc2Bs {
    fn name(&self) -> &'static str {
        "csc2_bs"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::D2 | Capabilities::SUPPORTS_GPU
    }

    bs_params!();

    fn transform(
        &mut self,
        ctx: &mut Context,
        _xform: &XFormView,
        input: &mut XyzPoint,
        output: &mut XyzPoint,
        amount: f64,
    ) {
        let d = (2.0 * input.y).cosh() - (2.0 * input.x).cos();
        if d == 0.0 {
            return;
        }
        let f = &self.freq;
        let k = amount * 2.0 / d;
        output.x += k * (input.x * f.x1).sin() * (input.y * f.y2).cosh();
        output.y -= k * (input.x * f.x2).cos() * (input.y * f.y1).sinh();
        carry_z(ctx, input, output, amount);
    }

    fn kernel_source(&self, ctx: &Context) -> Option<String> {
        Some(format!(
            "float d = coshf(2.f*__y) - cosf(2.f*__x);\n\
             if (d != 0.f) {{\n\
             float k = __csc2_bs*2.f/d;\n\
             __px += k*sinf(__x*__csc2_bs_x1)*coshf(__y*__csc2_bs_y2);\n\
             __py -= k*cosf(__x*__csc2_bs_x2)*sinhf(__y*__csc2_bs_y1);\n\
             {}}}\n",
            kernel_carry_z(ctx, "csc2_bs")
        ))
    }

    fn box_clone(&self) -> Box<dyn VariationFunc> {
        Box::new(self.clone())
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Sec2Bs {
    freq: BsFreq,
}

impl VariationFunc for Sec2Bs {
    fn name(&self) -> &'static str {
        "sec2_bs"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::D2 | Capabilities::SUPPORTS_GPU
    }

    bs_params!();

    fn transform(
        &mut self,
        ctx: &mut Context,
        _xform: &XFormView,
        input: &mut XyzPoint,
        output: &mut XyzPoint,
        amount: f64,
    ) {
        let d = (2.0 * input.x).cos() + (2.0 * input.y).cosh();
        if d == 0.0 {
            return;
        }
        let f = &self.freq;
        let k = amount * 2.0 / d;
        output.x += k * (input.x * f.x2).cos() * (input.y * f.y2).cosh();
        output.y += k * (input.x * f.x1).sin() * (input.y * f.y1).sinh();
        carry_z(ctx, input, output, amount);
    }

    fn kernel_source(&self, ctx: &Context) -> Option<String> {
        Some(format!(
            "float d = cosf(2.f*__x) + coshf(2.f*__y);\n\
             if (d != 0.f) {{\n\
             float k = __sec2_bs*2.f/d;\n\
             __px += k*cosf(__x*__sec2_bs_x2)*coshf(__y*__sec2_bs_y2);\n\
             __py += k*sinf(__x*__sec2_bs_x1)*sinhf(__y*__sec2_bs_y1);\n\
             {}}}\n",
            kernel_carry_z(ctx, "sec2_bs")
        ))
    }

    fn box_clone(&self) -> Box<dyn VariationFunc> {
        Box::new(self.clone())
    }
}

/// Hyperbolic cosecant.
#[derive(Clone, Debug, Default)]
pub(crate) struct Csch;

impl VariationFunc for Csch {
    fn name(&self) -> &'static str {
        "csch"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::D2 | Capabilities::SUPPORTS_GPU
    }

    fn transform(
        &mut self,
        ctx: &mut Context,
        _xform: &XFormView,
        input: &mut XyzPoint,
        output: &mut XyzPoint,
        amount: f64,
    ) {
        let d = (2.0 * input.x).cosh() - (2.0 * input.y).cos();
        if d == 0.0 {
            return;
        }
        let k = amount * 2.0 / d;
        output.x += k * input.x.sinh() * input.y.cos();
        output.y -= k * input.x.cosh() * input.y.sin();
        carry_z(ctx, input, output, amount);
    }

    fn kernel_source(&self, ctx: &Context) -> Option<String> {
        Some(format!(
            "float d = coshf(2.f*__x) - cosf(2.f*__y);\n\
             if (d != 0.f) {{\n\
             float k = __csch*2.f/d;\n\
             __px += k*sinhf(__x)*cosf(__y);\n\
             __py -= k*coshf(__x)*sinf(__y);\n\
             {}}}\n",
            kernel_carry_z(ctx, "csch")
        ))
    }

    fn box_clone(&self) -> Box<dyn VariationFunc> {
        Box::new(self.clone())
    }
}

/// Quaternion hyperbolic cosecant.
#[derive(Clone, Debug, Default)]
pub(crate) struct Cschq;

impl VariationFunc for Cschq {
    fn name(&self) -> &'static str {
        "cschq"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::D3 | Capabilities::SUPPORTS_GPU
    }

    fn transform(
        &mut self,
        _ctx: &mut Context,
        _xform: &XFormView,
        input: &mut XyzPoint,
        output: &mut XyzPoint,
        amount: f64,
    ) {
        let abs_v = input.y.hypot(input.z);
        let (s, c) = abs_v.sin_cos();
        let sh = input.x.sinh();
        let ch = input.x.cosh();
        let ni = amount / (sqr(input.x) + sqr(input.y) + sqr(input.z));
        let cc = ni * ch * s / abs_v;
        output.x += sh * c * ni;
        output.y -= cc * input.y;
        output.z -= cc * input.z;
    }

    fn kernel_source(&self, _ctx: &Context) -> Option<String> {
        Some(
            "float abs_v = hypotf(__y, __z);\n\
             float s = sinf(abs_v);\n\
             float c = cosf(abs_v);\n\
             float sh = sinhf(__x);\n\
             float ch = coshf(__x);\n\
             float ni = __cschq/(__x*__x + __y*__y + __z*__z);\n\
             float C = ni*ch*s/abs_v;\n\
             __px += sh*c*ni;\n\
             __py -= C*__y;\n\
             __pz -= C*__z;\n"
                .into(),
        )
    }

    fn box_clone(&self) -> Box<dyn VariationFunc> {
        Box::new(self.clone())
    }
}

static EPUSH_PARAMS: [ParamSpec; 3] = [
    ParamSpec::float("push"),
    ParamSpec::float("dist"),
    ParamSpec::float("rotate"),
];

/// Elliptic push: shifts points along confocal ellipses.
#[derive(Clone, Debug)]
pub(crate) struct EPush {
    push: f64,
    dist: f64,
    rotate: f64,
}

impl Default for EPush {
    fn default() -> Self {
        Self {
            push: 0.0,
            dist: 1.0,
            rotate: 0.0,
        }
    }
}

impl VariationFunc for EPush {
    fn name(&self) -> &'static str {
        "ePush"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::D2
    }

    fn params(&self) -> &'static [ParamSpec] {
        &EPUSH_PARAMS
    }

    fn param(&self, idx: usize) -> f64 {
        match idx {
            0 => self.push,
            1 => self.dist,
            _ => self.rotate,
        }
    }

    fn store_param(&mut self, idx: usize, value: f64) {
        match idx {
            0 => self.push = value,
            1 => self.dist = value,
            _ => self.rotate = value,
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
        let (x, y) = (input.x, input.y);
        let tmp = x * x + y * y + 1.0;
        let x2 = 2.0 * x;
        let xmax = ((sqrt_safe(tmp + x2) + sqrt_safe(tmp - x2)) * 0.5).max(1.0);
        let mut mu = xmax.acosh();
        let t = (x / xmax).clamp(-1.0, 1.0);
        let mut nu = t.acos();
        if y < 0.0 {
            nu = -nu;
        }
        nu += self.rotate;
        mu = mu * self.dist + self.push;
        output.x += amount * mu.cosh() * nu.cos();
        output.y += amount * mu.sinh() * nu.sin();
        carry_z(ctx, input, output, amount);
    }

    fn box_clone(&self) -> Box<dyn VariationFunc> {
        Box::new(self.clone())
    }
}

/// `±(2/π)·asinh(sqrt(z))`, branch chosen at random.
#[derive(Clone, Debug, Default)]
pub(crate) struct SqrtAsinh;

impl VariationFunc for SqrtAsinh {
    fn name(&self) -> &'static str {
        "sqrt_asinh"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::D2 | Capabilities::SUPPORTS_GPU
    }

    fn transform(
        &mut self,
        ctx: &mut Context,
        _xform: &XFormView,
        input: &mut XyzPoint,
        output: &mut XyzPoint,
        amount: f64,
    ) {
        let z = Complex::new(input.x, input.y)
            .sqrt()
            .asinh()
            .scale(amount * M_2_PI);
        if ctx.random() < 0.5 {
            output.x += z.re;
            output.y += z.im;
        } else {
            output.x -= z.re;
            output.y -= z.im;
        }
        carry_z(ctx, input, output, amount);
    }

    fn kernel_source(&self, ctx: &Context) -> Option<String> {
        Some(format!(
            "float m = sqrtf(hypotf(__x, __y));\n\
             float ha = 0.5f*atan2f(__y, __x);\n\
             float sr = m*cosf(ha);\n\
             float si = m*sinf(ha);\n\
             float qr = sr*sr - si*si + 1.f;\n\
             float qi = 2.f*sr*si;\n\
             float qm = sqrtf(hypotf(qr, qi));\n\
             float qa = 0.5f*atan2f(qi, qr);\n\
             float wr = sr + qm*cosf(qa);\n\
             float wi = si + qm*sinf(qa);\n\
             float k = __sqrt_asinh*M_2_PI;\n\
             float zr = k*0.5f*logf(wr*wr + wi*wi);\n\
             float zi = k*atan2f(wi, wr);\n\
             if (RANDFLOAT() < 0.5f) {{\n  __px += zr;\n  __py += zi;\n}} else {{\n  __px -= zr;\n  __py -= zi;\n}}\n{}",
            kernel_carry_z(ctx, "sqrt_asinh")
        ))
    }

    fn box_clone(&self) -> Box<dyn VariationFunc> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/variation/funcs/hyperbolic.rs"]
mod tests;
