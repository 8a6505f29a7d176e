use crate::context::Context;
use crate::foundation::core::XyzPoint;
use crate::foundation::math::{EPSILON, FRAC_PI_2, PI};
use crate::variation::funcs::{carry_z, kernel_carry_z};
use crate::variation::{Capabilities, LayerView, ParamSpec, VariationFunc, XFormView};

static WAVES42_PARAMS: [ParamSpec; 7] = [
    ParamSpec::float("scalex"),
    ParamSpec::float("scaley"),
    ParamSpec::float("freqx"),
    ParamSpec::float("freqy"),
    ParamSpec::int_trunc_range("cont", 0, 1),
    ParamSpec::float("yfact"),
    ParamSpec::float("freqx2"),
];

/// Horizontal waves whose amplitude is hashed per band of `y`.
#[derive(Clone, Debug)]
pub(crate) struct Waves42 {
    scalex: f64,
    scaley: f64,
    freqx: f64,
    freqy: f64,
    cont: f64,
    yfact: f64,
    freqx2: f64,
}

impl Default for Waves42 {
    fn default() -> Self {
        Self {
            scalex: 0.05,
            scaley: 0.05,
            freqx: 7.0,
            freqy: 13.0,
            cont: 0.0,
            yfact: 0.1,
            freqx2: 1.0,
        }
    }
}

impl VariationFunc for Waves42 {
    fn name(&self) -> &'static str {
        "waves42"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::D2 | Capabilities::SUPPORTS_GPU
    }

    fn params(&self) -> &'static [ParamSpec] {
        &WAVES42_PARAMS
    }

    fn param(&self, idx: usize) -> f64 {
        match idx {
            0 => self.scalex,
            1 => self.scaley,
            2 => self.freqx,
            3 => self.freqy,
            4 => self.cont,
            5 => self.yfact,
            _ => self.freqx2,
        }
    }

    fn store_param(&mut self, idx: usize, value: f64) {
        match idx {
            0 => self.scalex = value,
            1 => self.scaley = value,
            2 => self.freqx = value,
            3 => self.freqy = value,
            4 => self.cont = value,
            5 => self.yfact = value,
            _ => self.freqx2 = value,
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
        let (x0, y0) = (input.x, input.y);
        let band = (y0 * self.freqx2).floor();
        let mut ax = (band * 12.9898 + band * 78.233 + 1.0 + y0 * 0.001 * self.yfact).sin() * 43758.5453;
        ax -= ax.trunc();
        if self.cont == 1.0 {
            ax = if ax > 0.5 { 1.0 } else { 0.0 };
        }
        output.x += amount * (x0 + (y0 * self.freqx).sin() * ax * ax * self.scalex);
        output.y += amount * (y0 + (x0 * self.freqy).sin() * self.scaley);
        carry_z(ctx, input, output, amount);
    }

    fn kernel_source(&self, ctx: &Context) -> Option<String> {
        Some(format!(
            "float x0 = __x;\n\
             float y0 = __y;\n\
             float ax = floorf(y0*__waves42_freqx2);\n\
             ax = sinf(ax*12.9898f + ax*78.233f + 1.f + y0*0.001f*__waves42_yfact)*43758.5453f;\n\
             ax = ax - (int)ax;\n\
             if (__waves42_cont == 1) ax = (ax > 0.5f) ? 1.f : 0.f;\n\
             __px += __waves42*(x0 + sinf(y0*__waves42_freqx)*ax*ax*__waves42_scalex);\n\
             __py += __waves42*(y0 + sinf(x0*__waves42_freqy)*__waves42_scaley);\n{}",
            kernel_carry_z(ctx, "waves42")
        ))
    }

    fn box_clone(&self) -> Box<dyn VariationFunc> {
        Box::new(self.clone())
    }
}

static WAVES4_PARAMS: [ParamSpec; 8] = [
    ParamSpec::float("scalex"),
    ParamSpec::float("scaley"),
    ParamSpec::float("freqx"),
    ParamSpec::float("freqy"),
    ParamSpec::int_range("use_cos_x", 0, 1),
    ParamSpec::int_range("use_cos_y", 0, 1),
    ParamSpec::float("dampx"),
    ParamSpec::float("dampy"),
];

/// Damped sine/cosine waves along both axes.
#[derive(Clone, Debug)]
pub(crate) struct Waves4 {
    scalex: f64,
    scaley: f64,
    freqx: f64,
    freqy: f64,
    use_cos_x: f64,
    use_cos_y: f64,
    dampx: f64,
    dampy: f64,
    damping_x: f64,
    damping_y: f64,
}

impl Default for Waves4 {
    fn default() -> Self {
        Self {
            scalex: 0.25,
            scaley: 0.5,
            freqx: FRAC_PI_2,
            freqy: PI / 4.0,
            use_cos_x: 1.0,
            use_cos_y: 0.0,
            dampx: 0.0,
            dampy: 0.0,
            damping_x: 1.0,
            damping_y: 1.0,
        }
    }
}

fn damping(d: f64) -> f64 {
    if d.abs() < EPSILON { 1.0 } else { d.exp() }
}

/// `cos·sin·cos` or `sin·cos·sin` of `t`.
fn wave(t: f64, use_cos: bool) -> f64 {
    let (s, c) = t.sin_cos();
    if use_cos { c * s * c } else { s * c * s }
}

impl VariationFunc for Waves4 {
    fn name(&self) -> &'static str {
        "waves4_wf"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::D2 | Capabilities::SUPPORTS_GPU
    }

    fn params(&self) -> &'static [ParamSpec] {
        &WAVES4_PARAMS
    }

    fn param(&self, idx: usize) -> f64 {
        match idx {
            0 => self.scalex,
            1 => self.scaley,
            2 => self.freqx,
            3 => self.freqy,
            4 => self.use_cos_x,
            5 => self.use_cos_y,
            6 => self.dampx,
            _ => self.dampy,
        }
    }

    fn store_param(&mut self, idx: usize, value: f64) {
        match idx {
            0 => self.scalex = value,
            1 => self.scaley = value,
            2 => self.freqx = value,
            3 => self.freqy = value,
            4 => self.use_cos_x = value,
            5 => self.use_cos_y = value,
            6 => self.dampx = value,
            _ => self.dampy = value,
        }
    }

    fn init(&mut self, _ctx: &mut Context, _layer: &LayerView, _xform: &XFormView, _amount: f64) {
        self.damping_x = damping(self.dampx);
        self.damping_y = damping(self.dampy);
    }

    fn transform(
        &mut self,
        ctx: &mut Context,
        _xform: &XFormView,
        input: &mut XyzPoint,
        output: &mut XyzPoint,
        amount: f64,
    ) {
        let (dx, dy) = (self.damping_x, self.damping_y);
        let wx = wave(input.y * self.freqx, self.use_cos_x == 1.0);
        let wy = wave(input.x * self.freqy, self.use_cos_y == 1.0);
        output.x += amount * (input.x + dx * self.scalex * wx) * dx;
        output.y += amount * (input.y + dy * self.scaley * wy) * dy;
        carry_z(ctx, input, output, amount);
    }

    fn kernel_source(&self, ctx: &Context) -> Option<String> {
        Some(format!(
            "float dX = fabsf(__waves4_wf_dampx) < epsilon ? 1.f : expf(__waves4_wf_dampx);\n\
             float dY = fabsf(__waves4_wf_dampy) < epsilon ? 1.f : expf(__waves4_wf_dampy);\n\
             float tx = __y*__waves4_wf_freqx;\n\
             float ty = __x*__waves4_wf_freqy;\n\
             if (__waves4_wf_use_cos_x == 1)\n\
               __px += __waves4_wf*(__x + dX*__waves4_wf_scalex*cosf(tx)*sinf(tx)*cosf(tx))*dX;\n\
             else\n\
               __px += __waves4_wf*(__x + dX*__waves4_wf_scalex*sinf(tx)*cosf(tx)*sinf(tx))*dX;\n\
             if (__waves4_wf_use_cos_y == 1)\n\
               __py += __waves4_wf*(__y + dY*__waves4_wf_scaley*cosf(ty)*sinf(ty)*cosf(ty))*dY;\n\
             else\n\
               __py += __waves4_wf*(__y + dY*__waves4_wf_scaley*sinf(ty)*cosf(ty)*sinf(ty))*dY;\n{}",
            kernel_carry_z(ctx, "waves4_wf")
        ))
    }

    fn box_clone(&self) -> Box<dyn VariationFunc> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/variation/funcs/waves.rs"]
mod tests;
