use crate::context::Context;
use crate::foundation::core::XyzPoint;
use crate::foundation::math::{M_1_PI, PI, sign_nonneg, sqr};
use crate::variation::funcs::{carry_z, kernel_carry_z};
use crate::variation::{Capabilities, LayerView, ParamSpec, VariationFunc, XFormView};

/// Identity map scaled by the amount.
#[derive(Clone, Debug, Default)]
pub(crate) struct Linear;

impl VariationFunc for Linear {
    fn name(&self) -> &'static str {
        "linear"
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
        output.x += amount * input.x;
        output.y += amount * input.y;
        carry_z(ctx, input, output, amount);
    }

    fn kernel_source(&self, ctx: &Context) -> Option<String> {
        Some(format!(
            "__px += __linear*__x;\n__py += __linear*__y;\n{}",
            kernel_carry_z(ctx, "linear")
        ))
    }

    fn box_clone(&self) -> Box<dyn VariationFunc> {
        Box::new(self.clone())
    }
}

/// Identity map in all three axes.
#[derive(Clone, Debug, Default)]
pub(crate) struct Linear3D;

impl VariationFunc for Linear3D {
    fn name(&self) -> &'static str {
        "linear3D"
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
        output.x += amount * input.x;
        output.y += amount * input.y;
        output.z += amount * input.z;
    }

    fn kernel_source(&self, _ctx: &Context) -> Option<String> {
        Some("__px += __linear3D*__x;\n__py += __linear3D*__y;\n__pz += __linear3D*__z;\n".into())
    }

    fn box_clone(&self) -> Box<dyn VariationFunc> {
        Box::new(self.clone())
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Diamond;

impl VariationFunc for Diamond {
    fn name(&self) -> &'static str {
        "diamond"
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
        let p = input.polar();
        output.x += amount * p.sin_a * p.sqrt.cos();
        output.y += amount * p.cos_a * p.sqrt.sin();
        carry_z(ctx, input, output, amount);
    }

    fn kernel_source(&self, ctx: &Context) -> Option<String> {
        Some(format!(
            "__px += __diamond*__sinA*cosf(__r);\n\
             __py += __diamond*__cosA*sinf(__r);\n{}",
            kernel_carry_z(ctx, "diamond")
        ))
    }

    fn box_clone(&self) -> Box<dyn VariationFunc> {
        Box::new(self.clone())
    }
}

static LINEAR_T_PARAMS: [ParamSpec; 2] = [
    ParamSpec::float("powX").with_alias("lT_powX"),
    ParamSpec::float("powY").with_alias("lT_powY"),
];

/// Signed power law applied per axis.
#[derive(Clone, Debug)]
pub(crate) struct LinearT {
    pow_x: f64,
    pow_y: f64,
}

impl Default for LinearT {
    fn default() -> Self {
        Self {
            pow_x: 1.2,
            pow_y: 1.2,
        }
    }
}

impl VariationFunc for LinearT {
    fn name(&self) -> &'static str {
        "linearT"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::D2 | Capabilities::SUPPORTS_GPU
    }

    fn params(&self) -> &'static [ParamSpec] {
        &LINEAR_T_PARAMS
    }

    fn param(&self, idx: usize) -> f64 {
        match idx {
            0 => self.pow_x,
            _ => self.pow_y,
        }
    }

    fn store_param(&mut self, idx: usize, value: f64) {
        match idx {
            0 => self.pow_x = value,
            _ => self.pow_y = value,
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
        output.x += sign_nonneg(input.x) * input.x.abs().powf(self.pow_x) * amount;
        output.y += sign_nonneg(input.y) * input.y.abs().powf(self.pow_y) * amount;
        carry_z(ctx, input, output, amount);
    }

    fn kernel_source(&self, ctx: &Context) -> Option<String> {
        Some(format!(
            "__px += (__x < 0.f ? -1.f : 1.f)*powf(fabsf(__x), __linearT_powX)*__linearT;\n\
             __py += (__y < 0.f ? -1.f : 1.f)*powf(fabsf(__y), __linearT_powY)*__linearT;\n{}",
            kernel_carry_z(ctx, "linearT")
        ))
    }

    fn box_clone(&self) -> Box<dyn VariationFunc> {
        Box::new(self.clone())
    }
}

static SPLITS3D_PARAMS: [ParamSpec; 3] = [
    ParamSpec::float("x"),
    ParamSpec::float("y"),
    ParamSpec::float("z"),
];

/// Pushes each octant away from the axes.
#[derive(Clone, Debug)]
pub(crate) struct Splits3D {
    x: f64,
    y: f64,
    z: f64,
}

impl Default for Splits3D {
    fn default() -> Self {
        Self {
            x: 0.1,
            y: 0.3,
            z: 0.2,
        }
    }
}

impl VariationFunc for Splits3D {
    fn name(&self) -> &'static str {
        "splits3D"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::D3 | Capabilities::SUPPORTS_GPU
    }

    fn params(&self) -> &'static [ParamSpec] {
        &SPLITS3D_PARAMS
    }

    fn param(&self, idx: usize) -> f64 {
        match idx {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    fn store_param(&mut self, idx: usize, value: f64) {
        match idx {
            0 => self.x = value,
            1 => self.y = value,
            _ => self.z = value,
        }
    }

    fn transform(
        &mut self,
        _ctx: &mut Context,
        _xform: &XFormView,
        input: &mut XyzPoint,
        output: &mut XyzPoint,
        amount: f64,
    ) {
        let split = |v: f64, d: f64| if v >= 0.0 { v + d } else { v - d };
        output.x += amount * split(input.x, self.x);
        output.y += amount * split(input.y, self.y);
        output.z += amount * split(input.z, self.z);
    }

    fn kernel_source(&self, _ctx: &Context) -> Option<String> {
        Some(
            "if (__x >= 0.f)\n  __px += __splits3D*(__x + __splits3D_x);\n\
             else\n  __px += __splits3D*(__x - __splits3D_x);\n\
             if (__y >= 0.f)\n  __py += __splits3D*(__y + __splits3D_y);\n\
             else\n  __py += __splits3D*(__y - __splits3D_y);\n\
             if (__z >= 0.f)\n  __pz += __splits3D*(__z + __splits3D_z);\n\
             else\n  __pz += __splits3D*(__z - __splits3D_z);\n"
                .into(),
        )
    }

    fn box_clone(&self) -> Box<dyn VariationFunc> {
        Box::new(self.clone())
    }
}

/// Equirectangular-style unwrap of the unit disc.
#[derive(Clone, Debug, Default)]
pub(crate) struct Panorama2;

impl VariationFunc for Panorama2 {
    fn name(&self) -> &'static str {
        "panorama2"
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
        let aux = 1.0 / ((input.x * input.x + input.y * input.y).sqrt() + 1.0);
        let x1 = input.x * aux;
        let y1 = input.y * aux;
        let r = (x1 * x1 + y1 * y1).sqrt();
        output.x += amount * x1.atan2(y1) * M_1_PI;
        output.y += amount * (r - 0.5);
        carry_z(ctx, input, output, amount);
    }

    fn kernel_source(&self, ctx: &Context) -> Option<String> {
        Some(format!(
            "float aux = 1.f/(sqrtf(__x*__x + __y*__y) + 1.f);\n\
             float x1 = __x*aux;\n\
             float y1 = __y*aux;\n\
             aux = sqrtf(x1*x1 + y1*y1);\n\
             __px += __panorama2*atan2f(x1, y1)*M_1_PI_F;\n\
             __py += __panorama2*(aux - 0.5f);\n{}",
            kernel_carry_z(ctx, "panorama2")
        ))
    }

    fn box_clone(&self) -> Box<dyn VariationFunc> {
        Box::new(self.clone())
    }
}

/// Bipolar average of the two foci at `(±1, 0)`.
#[derive(Clone, Debug, Default)]
pub(crate) struct DeltaA;

impl VariationFunc for DeltaA {
    fn name(&self) -> &'static str {
        "deltaA"
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
        let (x, y) = (input.x, input.y);
        let avgr = amount * ((sqr(y) + sqr(x + 1.0)).sqrt() / (sqr(y) + sqr(x - 1.0)).sqrt());
        let avga = (y.atan2(x - 1.0) - y.atan2(x + 1.0)) / 2.0;
        output.x += avgr * avga.cos();
        output.y += avgr * avga.sin();
        carry_z(ctx, input, output, amount);
    }

    fn kernel_source(&self, ctx: &Context) -> Option<String> {
        Some(format!(
            "float avgr = __deltaA*(sqrtf(__y*__y + (__x + 1.f)*(__x + 1.f))/sqrtf(__y*__y + (__x - 1.f)*(__x - 1.f)));\n\
             float avga = (atan2f(__y, __x - 1.f) - atan2f(__y, __x + 1.f))/2.f;\n\
             __px += avgr*cosf(avga);\n\
             __py += avgr*sinf(avga);\n{}",
            kernel_carry_z(ctx, "deltaA")
        ))
    }

    fn box_clone(&self) -> Box<dyn VariationFunc> {
        Box::new(self.clone())
    }
}

/// Inverted disc.
#[derive(Clone, Debug, Default)]
pub(crate) struct IDisc {
    v: f64,
}

impl VariationFunc for IDisc {
    fn name(&self) -> &'static str {
        "idisc"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::D2 | Capabilities::SUPPORTS_GPU
    }

    fn init(&mut self, _ctx: &mut Context, _layer: &LayerView, _xform: &XFormView, amount: f64) {
        self.v = amount * M_1_PI;
    }

    fn transform(
        &mut self,
        ctx: &mut Context,
        _xform: &XFormView,
        input: &mut XyzPoint,
        output: &mut XyzPoint,
        amount: f64,
    ) {
        let a = PI / ((sqr(input.x) + sqr(input.y)).sqrt() + 1.0);
        let r = input.y.atan2(input.x) * self.v;
        output.x += r * a.cos();
        output.y += r * a.sin();
        carry_z(ctx, input, output, amount);
    }

    fn kernel_source(&self, ctx: &Context) -> Option<String> {
        Some(format!(
            "float a = M_PI_F/(__r + 1.f);\n\
             float r = atan2f(__y, __x)*__idisc*M_1_PI_F;\n\
             __px += r*cosf(a);\n\
             __py += r*sinf(a);\n{}",
            kernel_carry_z(ctx, "idisc")
        ))
    }

    fn box_clone(&self) -> Box<dyn VariationFunc> {
        Box::new(self.clone())
    }
}

/// Radial rays; overwrites the accumulated x/y rather than summing.
#[derive(Clone, Debug, Default)]
pub(crate) struct Rays1;

impl VariationFunc for Rays1 {
    fn name(&self) -> &'static str {
        "rays1"
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
        let t = sqr(input.x) + sqr(input.y);
        let u = 1.0 / t.sqrt().tan() + amount * sqr(2.0 / PI);
        output.x = amount * u * t / input.x;
        output.y = amount * u * t / input.y;
        carry_z(ctx, input, output, amount);
    }

    fn kernel_source(&self, ctx: &Context) -> Option<String> {
        Some(format!(
            "float t = __x*__x + __y*__y;\n\
             float u = 1.f/tanf(sqrtf(t)) + __rays1*sqrf(2.f/PI);\n\
             __px = __rays1*u*t/__x;\n\
             __py = __rays1*u*t/__y;\n{}",
            kernel_carry_z(ctx, "rays1")
        ))
    }

    fn box_clone(&self) -> Box<dyn VariationFunc> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/variation/funcs/basic.rs"]
mod tests;
