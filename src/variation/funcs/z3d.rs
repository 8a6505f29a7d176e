//! Functions that define or reshape the z axis.

use crate::context::Context;
use crate::foundation::core::XyzPoint;
use crate::foundation::math::{M_2PI, PI, SMALL_EPSILON, sqr};
use crate::variation::funcs::{carry_z, kernel_carry_z};
use crate::variation::{Capabilities, LayerView, ParamSpec, VariationFunc, XFormView};

static CROP3D_PARAMS: [ParamSpec; 8] = [
    ParamSpec::float("left"),
    ParamSpec::float("right"),
    ParamSpec::float("top"),
    ParamSpec::float("bottom"),
    ParamSpec::float("floor"),
    ParamSpec::float("ceiling"),
    ParamSpec::float_range("scatter_area", -1.0, 1.0),
    ParamSpec::int_range("zero", 0, 1),
];

/// Axis-aligned box crop. Points outside are hidden (`zero == 1`) or scattered back inside.
#[derive(Clone, Debug)]
pub(crate) struct Crop3D {
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
    floor: f64,
    ceiling: f64,
    scatter_area: f64,
    zero: f64,
    min: [f64; 3],
    max: [f64; 3],
    spread: [f64; 3],
}

impl Default for Crop3D {
    fn default() -> Self {
        Self {
            left: -1.0,
            right: 1.0,
            top: -1.0,
            bottom: 1.0,
            floor: -1.0,
            ceiling: 1.0,
            scatter_area: 0.0,
            zero: 0.0,
            min: [-1.0; 3],
            max: [1.0; 3],
            spread: [0.0; 3],
        }
    }
}

impl VariationFunc for Crop3D {
    fn name(&self) -> &'static str {
        "crop3D"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::D3 | Capabilities::CROP
    }

    fn params(&self) -> &'static [ParamSpec] {
        &CROP3D_PARAMS
    }

    fn param(&self, idx: usize) -> f64 {
        match idx {
            0 => self.left,
            1 => self.right,
            2 => self.top,
            3 => self.bottom,
            4 => self.floor,
            5 => self.ceiling,
            6 => self.scatter_area,
            _ => self.zero,
        }
    }

    fn store_param(&mut self, idx: usize, value: f64) {
        match idx {
            0 => self.left = value,
            1 => self.right = value,
            2 => self.top = value,
            3 => self.bottom = value,
            4 => self.floor = value,
            5 => self.ceiling = value,
            6 => self.scatter_area = value,
            _ => self.zero = value,
        }
    }

    fn init(&mut self, _ctx: &mut Context, _layer: &LayerView, _xform: &XFormView, _amount: f64) {
        let pairs = [
            (self.left, self.right),
            (self.top, self.bottom),
            (self.floor, self.ceiling),
        ];
        for (i, (a, b)) in pairs.into_iter().enumerate() {
            self.min[i] = a.min(b);
            self.max[i] = a.max(b);
            self.spread[i] = (self.max[i] - self.min[i]) * 0.5 * self.scatter_area;
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
        let mut p = [input.x, input.y, input.z];
        let outside = p
            .iter()
            .enumerate()
            .any(|(i, v)| *v < self.min[i] || *v > self.max[i]);
        if outside && self.zero != 0.0 {
            output.clear_xyz();
            output.hide = true;
            return;
        }
        output.hide = false;
        for (i, v) in p.iter_mut().enumerate() {
            if *v < self.min[i] {
                *v = self.min[i] + ctx.random() * self.spread[i];
            } else if *v > self.max[i] {
                *v = self.max[i] - ctx.random() * self.spread[i];
            }
        }
        output.x = amount * p[0];
        output.y = amount * p[1];
        output.z = amount * p[2];
    }

    fn box_clone(&self) -> Box<dyn VariationFunc> {
        Box::new(self.clone())
    }
}

static DISC3D_PARAMS: [ParamSpec; 1] = [ParamSpec::float("pi")];

#[derive(Clone, Debug)]
pub(crate) struct Disc3D {
    pi: f64,
}

impl Default for Disc3D {
    fn default() -> Self {
        Self { pi: PI }
    }
}

impl VariationFunc for Disc3D {
    fn name(&self) -> &'static str {
        "disc3d"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::D3 | Capabilities::SUPPORTS_GPU
    }

    fn params(&self) -> &'static [ParamSpec] {
        &DISC3D_PARAMS
    }

    fn param(&self, _idx: usize) -> f64 {
        self.pi
    }

    fn store_param(&mut self, _idx: usize, value: f64) {
        self.pi = value;
    }

    fn transform(
        &mut self,
        _ctx: &mut Context,
        _xform: &XFormView,
        input: &mut XyzPoint,
        output: &mut XyzPoint,
        amount: f64,
    ) {
        let r = (sqr(input.y) + sqr(input.x) + SMALL_EPSILON).sqrt();
        let (sr, cr) = (self.pi * r).sin_cos();
        let vv = amount * input.x.atan2(input.y) / (self.pi + SMALL_EPSILON);
        output.x += vv * sr;
        output.y += vv * cr;
        output.z += vv * (r * input.z.cos());
    }

    fn kernel_source(&self, _ctx: &Context) -> Option<String> {
        Some(
            "float r = sqrtf(__y*__y + __x*__x + 1.e-6f);\n\
             float a = __disc3d_pi*r;\n\
             float vv = __disc3d*atan2f(__x, __y)/(__disc3d_pi + 1.e-6f);\n\
             __px += vv*sinf(a);\n\
             __py += vv*cosf(a);\n\
             __pz += vv*(r*cosf(__z));\n"
                .into(),
        )
    }

    fn box_clone(&self) -> Box<dyn VariationFunc> {
        Box::new(self.clone())
    }
}

/// Tilts the z plane along the `x + y` diagonal.
#[derive(Clone, Debug, Default)]
pub(crate) struct InflateZ2;

impl VariationFunc for InflateZ2 {
    fn name(&self) -> &'static str {
        "inflateZ_2"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::Z_TRANSFORM | Capabilities::SUPPORTS_GPU
    }

    fn transform(
        &mut self,
        _ctx: &mut Context,
        _xform: &XFormView,
        input: &mut XyzPoint,
        output: &mut XyzPoint,
        amount: f64,
    ) {
        let aval = (input.y * 2.0 + input.x * 2.0) * 0.333333;
        output.z += amount * (0.25 - aval);
    }

    fn kernel_source(&self, _ctx: &Context) -> Option<String> {
        Some(
            "float aval = (__y*2.f + __x*2.f)*0.333333f;\n\
             __pz += __inflateZ_2*(0.25f - aval);\n"
                .into(),
        )
    }

    fn box_clone(&self) -> Box<dyn VariationFunc> {
        Box::new(self.clone())
    }
}

static JULIA3DQ_PARAMS: [ParamSpec; 2] = [ParamSpec::int("power"), ParamSpec::int("divisor")];

/// Random root index range drawn per call.
const JULIA3DQ_ROOTS: f64 = 131071.0;

/// Quaternion-style 3D julia set.
#[derive(Clone, Debug)]
pub(crate) struct Julia3Dq {
    power: f64,
    divisor: f64,
    inv_power: f64,
    abs_inv_power: f64,
    half_inv_power: f64,
    inv_power_2pi: f64,
}

impl Default for Julia3Dq {
    fn default() -> Self {
        Self {
            power: 3.0,
            divisor: 2.0,
            inv_power: 0.0,
            abs_inv_power: 0.0,
            half_inv_power: 0.0,
            inv_power_2pi: 0.0,
        }
    }
}

impl VariationFunc for Julia3Dq {
    fn name(&self) -> &'static str {
        "julia3Dq"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::D3 | Capabilities::SUPPORTS_GPU
    }

    fn params(&self) -> &'static [ParamSpec] {
        &JULIA3DQ_PARAMS
    }

    fn param(&self, idx: usize) -> f64 {
        match idx {
            0 => self.power,
            _ => self.divisor,
        }
    }

    fn store_param(&mut self, idx: usize, value: f64) {
        match idx {
            0 => self.power = value,
            _ => self.divisor = value,
        }
    }

    fn init(&mut self, _ctx: &mut Context, _layer: &LayerView, _xform: &XFormView, _amount: f64) {
        let power = if self.power == 0.0 { 1.0 } else { self.power };
        self.inv_power = self.divisor / power;
        self.abs_inv_power = self.inv_power.abs();
        self.half_inv_power = 0.5 * self.inv_power - 0.5;
        self.inv_power_2pi = M_2PI / power;
    }

    fn transform(
        &mut self,
        ctx: &mut Context,
        _xform: &XFormView,
        input: &mut XyzPoint,
        output: &mut XyzPoint,
        amount: f64,
    ) {
        let root = (ctx.random() * JULIA3DQ_ROOTS).floor();
        let a = input.y.atan2(input.x) * self.inv_power + root * self.inv_power_2pi;
        let (sina, cosa) = a.sin_cos();
        let z = input.z * self.abs_inv_power;
        let r2d = sqr(input.x) + sqr(input.y);
        let mut r = amount * (r2d + sqr(z)).powf(self.half_inv_power);
        output.z += r * z;
        r *= r2d.sqrt();
        output.x += r * cosa;
        output.y += r * sina;
        carry_z(ctx, input, output, amount);
    }

    fn kernel_source(&self, ctx: &Context) -> Option<String> {
        Some(format!(
            "int power = lroundf(__julia3Dq_power);\n\
             int divisor = lroundf(__julia3Dq_divisor);\n\
             if (power == 0) power = 1;\n\
             float inv_power = (float)divisor/(float)power;\n\
             float abs_inv_power = fabsf(inv_power);\n\
             float half_inv_power = 0.5f*inv_power - 0.5f;\n\
             float inv_power_2pi = (2.f*PI)/(float)power;\n\
             float a = atan2f(__y, __x)*inv_power + (int)(RANDFLOAT()*131071.f)*inv_power_2pi;\n\
             float z = __z*abs_inv_power;\n\
             float r2d = __x*__x + __y*__y;\n\
             float r = __julia3Dq*powf(r2d + z*z, half_inv_power);\n\
             __pz += r*z;\n\
             r *= sqrtf(r2d);\n\
             __px += r*cosf(a);\n\
             __py += r*sinf(a);\n{}",
            kernel_carry_z(ctx, "julia3Dq")
        ))
    }

    fn box_clone(&self) -> Box<dyn VariationFunc> {
        Box::new(self.clone())
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Scry3D;

impl VariationFunc for Scry3D {
    fn name(&self) -> &'static str {
        "scry_3D"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::D2 | Capabilities::SUPPORTS_GPU
    }

    fn transform(
        &mut self,
        _ctx: &mut Context,
        _xform: &XFormView,
        input: &mut XyzPoint,
        output: &mut XyzPoint,
        amount: f64,
    ) {
        let inv = 1.0 / (amount + SMALL_EPSILON);
        let t = sqr(input.x) + sqr(input.y) + sqr(input.z);
        let r = 1.0 / (t.sqrt() * (t + inv));
        output.x += input.x * r;
        output.y += input.y * r;
        let zz = if input.z != 0.0 {
            input.z
        } else {
            input.y.atan2(input.x)
        };
        output.z += zz * r;
    }

    fn kernel_source(&self, _ctx: &Context) -> Option<String> {
        Some(
            "float inv = 1.f/(__scry_3D + 1.e-6f);\n\
             float t = __x*__x + __y*__y + __z*__z;\n\
             float r = 1.f/(sqrtf(t)*(t + inv));\n\
             __px += __x*r;\n\
             __py += __y*r;\n\
             if (__z != 0.f) __pz += __z*r;\n\
             else __pz += atan2f(__y, __x)*r;\n"
                .into(),
        )
    }

    fn box_clone(&self) -> Box<dyn VariationFunc> {
        Box::new(self.clone())
    }
}

static SWIRL3D_PARAMS: [ParamSpec; 1] = [ParamSpec::int_trunc("n")];

/// Swirl whose z and color follow the angular phase.
#[derive(Clone, Debug, Default)]
pub(crate) struct Swirl3D {
    n: f64,
}

impl VariationFunc for Swirl3D {
    fn name(&self) -> &'static str {
        "swirl3D_wf"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::D3 | Capabilities::DIRECT_COLOR | Capabilities::SUPPORTS_GPU
    }

    fn params(&self) -> &'static [ParamSpec] {
        &SWIRL3D_PARAMS
    }

    fn param(&self, _idx: usize) -> f64 {
        self.n
    }

    fn store_param(&mut self, _idx: usize, value: f64) {
        self.n = value;
    }

    fn transform(
        &mut self,
        _ctx: &mut Context,
        _xform: &XFormView,
        input: &mut XyzPoint,
        output: &mut XyzPoint,
        amount: f64,
    ) {
        let p = input.polar();
        let (rad, ang) = (p.sqrt, p.atan_yx);
        output.x += amount * (rad * ang.cos());
        output.y += amount * (rad * ang.sin());
        let phase = (6.0 * rad.cos() - self.n * ang).sin();
        output.z += amount * phase;
        output.color = phase.abs();
    }

    fn kernel_source(&self, _ctx: &Context) -> Option<String> {
        Some(
            "float rad = __r;\n\
             float ang = __theta;\n\
             __px += __swirl3D_wf*(rad*cosf(ang));\n\
             __py += __swirl3D_wf*(rad*sinf(ang));\n\
             __pz += __swirl3D_wf*(sinf(6.f*cosf(rad) - __swirl3D_wf_n*ang));\n\
             __pal = fabsf(sinf(6.f*cosf(rad) - __swirl3D_wf_n*ang));\n"
                .into(),
        )
    }

    fn box_clone(&self) -> Box<dyn VariationFunc> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/variation/funcs/z3d.rs"]
mod tests;
