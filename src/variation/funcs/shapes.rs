//! Tilings, holes and symmetry-group shapes.

use crate::context::Context;
use crate::foundation::core::XyzPoint;
use crate::foundation::math::{FRAC_PI_2, PI, SMALL_EPSILON, fmod, sqr, sqrt_safe};
use crate::variation::funcs::{carry_z, kernel_carry_z};
use crate::variation::{Capabilities, LayerView, ParamSpec, VariationFunc, XFormView};

static ASTERIA_PARAMS: [ParamSpec; 1] = [ParamSpec::float("alpha")];

#[derive(Clone, Debug, Default)]
pub(crate) struct Asteria {
    alpha: f64,
    sina: f64,
    cosa: f64,
}

impl VariationFunc for Asteria {
    fn name(&self) -> &'static str {
        "asteria"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::D2 | Capabilities::SUPPORTS_GPU
    }

    fn params(&self) -> &'static [ParamSpec] {
        &ASTERIA_PARAMS
    }

    fn param(&self, _idx: usize) -> f64 {
        self.alpha
    }

    fn store_param(&mut self, _idx: usize, value: f64) {
        self.alpha = value;
    }

    fn init(&mut self, _ctx: &mut Context, _layer: &LayerView, _xform: &XFormView, _amount: f64) {
        (self.sina, self.cosa) = (PI * self.alpha).sin_cos();
    }

    fn transform(
        &mut self,
        ctx: &mut Context,
        _xform: &XFormView,
        input: &mut XyzPoint,
        output: &mut XyzPoint,
        amount: f64,
    ) {
        let x0 = amount * input.x;
        let y0 = amount * input.y;
        let r = sqr(x0) + sqr(y0);
        let xx = sqr(x0.abs() - 1.0);
        let yy = sqr(y0.abs() - 1.0);
        let r2 = (yy + xx).sqrt();
        let mut in1 = r < 1.0;
        let out2 = r2 < 1.0;
        if in1 && out2 {
            in1 = ctx.random() > 0.35;
        } else {
            in1 = !in1;
        }
        if in1 {
            output.x += x0;
            output.y += y0;
        } else {
            let (sina, cosa) = (self.sina, self.cosa);
            let xx = x0 * cosa - y0 * sina;
            let yy = x0 * sina + y0 * cosa;
            let nx = xx / (1.0 - yy * yy).sqrt() * (1.0 - (1.0 - sqr(-yy.abs() + 1.0)).sqrt());
            output.x += nx * cosa + yy * sina;
            output.y += -nx * sina + yy * cosa;
        }
        carry_z(ctx, input, output, amount);
    }

    fn kernel_source(&self, ctx: &Context) -> Option<String> {
        Some(format!(
            "float sina = sinf(PI*__asteria_alpha);\n\
             float cosa = cosf(PI*__asteria_alpha);\n\
             float x0 = __asteria*__x;\n\
             float y0 = __asteria*__y;\n\
             float xx = x0;\n\
             float yy = y0;\n\
             float r = xx*xx + yy*yy;\n\
             xx = sqrf(fabsf(xx) - 1.);\n\
             yy = sqrf(fabsf(yy) - 1.);\n\
             float r2 = sqrtf(yy + xx);\n\
             short in1 = r < 1.f;\n\
             short out2 = r2 < 1.f;\n\
             if (in1 && out2)\n  in1 = (RANDFLOAT() > 0.35f);\n\
             else\n  in1 = !in1;\n\
             if (in1) {{\n  __px += x0;\n  __py += y0;\n}} else {{\n\
             xx = x0*cosa - y0*sina;\n\
             yy = x0*sina + y0*cosa;\n\
             float nx = xx/sqrtf(1.f - yy*yy)*(1.f - sqrtf(1.f - sqrf(-fabsf(yy) + 1.f)));\n\
             __px += nx*cosa + yy*sina;\n\
             __py += -nx*sina + yy*cosa;\n\
             }}\n{}",
            kernel_carry_z(ctx, "asteria")
        ))
    }

    fn box_clone(&self) -> Box<dyn VariationFunc> {
        Box::new(self.clone())
    }
}

static BLOCKY_PARAMS: [ParamSpec; 3] = [
    ParamSpec::float("x"),
    ParamSpec::float("y"),
    ParamSpec::float("mp"),
];

#[derive(Clone, Debug)]
pub(crate) struct Blocky {
    x: f64,
    y: f64,
    mp: f64,
    v: f64,
}

impl Default for Blocky {
    fn default() -> Self {
        Self {
            x: 1.0,
            y: 1.0,
            mp: 4.0,
            v: 0.0,
        }
    }
}

impl VariationFunc for Blocky {
    fn name(&self) -> &'static str {
        "blocky"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::D2 | Capabilities::SUPPORTS_GPU
    }

    fn params(&self) -> &'static [ParamSpec] {
        &BLOCKY_PARAMS
    }

    fn param(&self, idx: usize) -> f64 {
        match idx {
            0 => self.x,
            1 => self.y,
            _ => self.mp,
        }
    }

    fn store_param(&mut self, idx: usize, value: f64) {
        match idx {
            0 => self.x = value,
            1 => self.y = value,
            _ => self.mp = value,
        }
    }

    fn init(&mut self, _ctx: &mut Context, _layer: &LayerView, _xform: &XFormView, amount: f64) {
        self.v = amount / FRAC_PI_2;
    }

    fn transform(
        &mut self,
        ctx: &mut Context,
        _xform: &XFormView,
        input: &mut XyzPoint,
        output: &mut XyzPoint,
        amount: f64,
    ) {
        let t = (input.x.cos() + input.y.cos()) / self.mp + 1.0;
        let r = amount / t;
        let tmp = sqr(input.y) + sqr(input.x) + 1.0;
        let x2 = 2.0 * input.x;
        let y2 = 2.0 * input.y;
        let xmax = 0.5 * ((tmp + x2).sqrt() + (tmp - x2).sqrt());
        let ymax = 0.5 * ((tmp + y2).sqrt() + (tmp - y2).sqrt());

        let a = input.x / xmax;
        let b = sqrt_safe(1.0 - sqr(a));
        output.x += self.v * a.atan2(b) * r * self.x;

        let a = input.y / ymax;
        let b = sqrt_safe(1.0 - sqr(a));
        output.y += self.v * a.atan2(b) * r * self.y;
        carry_z(ctx, input, output, amount);
    }

    fn kernel_source(&self, ctx: &Context) -> Option<String> {
        Some(format!(
            "float v = __blocky/(PI*0.5f);\n\
             float T = (cosf(__x) + cosf(__y))/__blocky_mp + 1.f;\n\
             float r = __blocky/T;\n\
             float tmp = __y*__y + __x*__x + 1.f;\n\
             float x2 = 2.f*__x;\n\
             float y2 = 2.f*__y;\n\
             float xmax = 0.5f*(sqrtf(tmp + x2) + sqrtf(tmp - x2));\n\
             float ymax = 0.5f*(sqrtf(tmp + y2) + sqrtf(tmp - y2));\n\
             float a = __x/xmax;\n\
             float b = sqrtf_safe(1.f - a*a);\n\
             __px += v*atan2f(a, b)*r*__blocky_x;\n\
             a = __y/ymax;\n\
             b = sqrtf_safe(1.f - a*a);\n\
             __py += v*atan2f(a, b)*r*__blocky_y;\n{}",
            kernel_carry_z(ctx, "blocky")
        ))
    }

    fn box_clone(&self) -> Box<dyn VariationFunc> {
        Box::new(self.clone())
    }
}

static HOLE2_PARAMS: [ParamSpec; 6] = [
    ParamSpec::float("a"),
    ParamSpec::float("b"),
    ParamSpec::float("c"),
    ParamSpec::float("d"),
    ParamSpec::int_range("inside", 0, 1),
    ParamSpec::int_range("shape", 0, 9),
];

/// Punches a hole around the origin; `shape` selects one of ten radial profiles.
#[derive(Clone, Debug)]
pub(crate) struct Hole2 {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    inside: f64,
    shape: f64,
}

impl Default for Hole2 {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 2.0,
            c: 1.0,
            d: 1.0,
            inside: 0.0,
            shape: 0.0,
        }
    }
}

impl VariationFunc for Hole2 {
    fn name(&self) -> &'static str {
        "hole2"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::D2 | Capabilities::SUPPORTS_GPU
    }

    fn params(&self) -> &'static [ParamSpec] {
        &HOLE2_PARAMS
    }

    fn param(&self, idx: usize) -> f64 {
        match idx {
            0 => self.a,
            1 => self.b,
            2 => self.c,
            3 => self.d,
            4 => self.inside,
            _ => self.shape,
        }
    }

    fn store_param(&mut self, idx: usize, value: f64) {
        match idx {
            0 => self.a = value,
            1 => self.b = value,
            2 => self.c = value,
            3 => self.d = value,
            4 => self.inside = value,
            _ => self.shape = value,
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
        let p = input.polar();
        let rhosq = p.sumsq;
        let theta = p.atan_yx * self.d;
        let delta = (theta / PI + 1.0).powf(self.a) * self.c;
        let b = self.b;
        let r1 = match self.shape as i32 {
            0 => rhosq.sqrt() + delta,
            1 => (rhosq + delta).sqrt(),
            2 => (rhosq + (b * theta).sin() + delta).sqrt(),
            3 => (rhosq + theta.sin() + delta).sqrt(),
            4 => (rhosq + sqr(theta) - delta + 1.0).sqrt(),
            5 => (rhosq + theta.tan().abs() + delta).sqrt(),
            6 => (rhosq * (1.0 + (b * theta).sin()) + delta).sqrt(),
            7 => (rhosq + (0.5 * b * theta).sin().abs() + delta).sqrt(),
            8 => (rhosq + (PI * (b * theta).sin()).sin() + delta).sqrt(),
            9 => (rhosq + ((b * theta).sin() + (2.0 * b * theta + FRAC_PI_2).sin()) / 2.0 + delta)
                .sqrt(),
            _ => 1.0,
        };
        let r1 = if self.inside != 0.0 {
            amount / r1
        } else {
            amount * r1
        };
        output.x += r1 * theta.cos();
        output.y += r1 * theta.sin();
        carry_z(ctx, input, output, amount);
    }

    fn kernel_source(&self, ctx: &Context) -> Option<String> {
        Some(format!(
            "float rhosq = __r2;\n\
             float theta = __theta*__hole2_d;\n\
             float delta = powf(theta/PI + 1.f, __hole2_a)*__hole2_c;\n\
             float b = __hole2_b;\n\
             int shape = __hole2_shape;\n\
             float r1 = 1.f;\n\
             if (shape == 0) r1 = sqrtf(rhosq) + delta;\n\
             else if (shape == 1) r1 = sqrtf(rhosq + delta);\n\
             else if (shape == 2) r1 = sqrtf(rhosq + sinf(b*theta) + delta);\n\
             else if (shape == 3) r1 = sqrtf(rhosq + sinf(theta) + delta);\n\
             else if (shape == 4) r1 = sqrtf(rhosq + theta*theta - delta + 1.f);\n\
             else if (shape == 5) r1 = sqrtf(rhosq + fabsf(tanf(theta)) + delta);\n\
             else if (shape == 6) r1 = sqrtf(rhosq*(1.f + sinf(b*theta)) + delta);\n\
             else if (shape == 7) r1 = sqrtf(rhosq + fabsf(sinf(0.5f*b*theta)) + delta);\n\
             else if (shape == 8) r1 = sqrtf(rhosq + sinf(PI*sinf(b*theta)) + delta);\n\
             else if (shape == 9) r1 = sqrtf(rhosq + (sinf(b*theta) + sinf(2.f*b*theta + M_PI_2))/2.f + delta);\n\
             if (__hole2_inside != 0) r1 = __hole2/r1;\n\
             else r1 = __hole2*r1;\n\
             __px += r1*cosf(theta);\n\
             __py += r1*sinf(theta);\n{}",
            kernel_carry_z(ctx, "hole2")
        ))
    }

    fn box_clone(&self) -> Box<dyn VariationFunc> {
        Box::new(self.clone())
    }
}

static LAZY_TRAVIS_PARAMS: [ParamSpec; 3] = [
    ParamSpec::float("spin_in"),
    ParamSpec::float("spin_out"),
    ParamSpec::float("space"),
];

/// Square spiral: points inside the unit square spin one way, outside the other.
#[derive(Clone, Debug)]
pub(crate) struct LazyTravis {
    spin_in: f64,
    spin_out: f64,
    space: f64,
    spin_in4: f64,
    spin_out4: f64,
}

impl Default for LazyTravis {
    fn default() -> Self {
        Self {
            spin_in: 1.0,
            spin_out: 0.5,
            space: FRAC_PI_2,
            spin_in4: 0.0,
            spin_out4: 0.0,
        }
    }
}

/// Perimeter coordinate of `(x, y)` on the square of half-side `s`.
fn square_perimeter(x: f64, y: f64, spin: f64) -> (f64, f64) {
    let (ax, ay) = (x.abs(), y.abs());
    let (s, p) = if ax > ay {
        let s = ax;
        if x > 0.0 {
            (s, s + y + s * spin)
        } else {
            (s, 5.0 * s - y + s * spin)
        }
    } else {
        let s = ay;
        if y > 0.0 {
            (s, 3.0 * s - x + s * spin)
        } else {
            (s, 7.0 * s + x + s * spin)
        }
    };
    (s, fmod(p, s * 8.0))
}

impl VariationFunc for LazyTravis {
    fn name(&self) -> &'static str {
        "lazyTravis"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::D2 | Capabilities::SUPPORTS_GPU
    }

    fn params(&self) -> &'static [ParamSpec] {
        &LAZY_TRAVIS_PARAMS
    }

    fn param(&self, idx: usize) -> f64 {
        match idx {
            0 => self.spin_in,
            1 => self.spin_out,
            _ => self.space,
        }
    }

    fn store_param(&mut self, idx: usize, value: f64) {
        match idx {
            0 => self.spin_in = value,
            1 => self.spin_out = value,
            _ => self.space = value,
        }
    }

    fn init(&mut self, _ctx: &mut Context, _layer: &LayerView, _xform: &XFormView, _amount: f64) {
        self.spin_in4 = 4.0 * self.spin_in;
        self.spin_out4 = 4.0 * self.spin_out;
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
        if x.abs() > amount || y.abs() > amount {
            let space = self.space;
            let (s, p) = square_perimeter(x, y, self.spin_out4);
            let (x2, y2);
            if p <= 2.0 * s {
                x2 = s + space;
                let t = -(s - p);
                y2 = t + t / s * space;
            } else if p <= 4.0 * s {
                y2 = s + space;
                let t = 3.0 * s - p;
                x2 = t + t / s * space;
            } else if p <= 6.0 * s {
                x2 = -(s + space);
                let t = 5.0 * s - p;
                y2 = t + t / s * space;
            } else {
                y2 = -(s + space);
                let t = -(7.0 * s - p);
                x2 = t + t / s * space;
            }
            output.x += amount * x2;
            output.y += amount * y2;
        } else {
            let (s, p) = square_perimeter(x, y, self.spin_in4);
            if p <= 2.0 * s {
                output.x += amount * s;
                output.y -= amount * (s - p);
            } else if p <= 4.0 * s {
                output.x += amount * (3.0 * s - p);
                output.y += amount * s;
            } else if p <= 6.0 * s {
                output.x -= amount * s;
                output.y += amount * (5.0 * s - p);
            } else {
                output.x -= amount * (7.0 * s - p);
                output.y -= amount * s;
            }
        }
        carry_z(ctx, input, output, amount);
    }

    fn kernel_source(&self, ctx: &Context) -> Option<String> {
        Some(format!(
            "float spin_in = 4.f*__lazyTravis_spin_in;\n\
             float spin_out = 4.f*__lazyTravis_spin_out;\n\
             float space = __lazyTravis_space;\n\
             float x = fabsf(__x);\n\
             float y = fabsf(__y);\n\
             float s, p, x2, y2;\n\
             short outer = x > __lazyTravis || y > __lazyTravis;\n\
             float spin = outer ? spin_out : spin_in;\n\
             if (x > y) {{\n\
               s = x;\n\
               if (__x > 0.f) p = s + __y + s*spin;\n\
               else p = 5.f*s - __y + s*spin;\n\
             }} else {{\n\
               s = y;\n\
               if (__y > 0.f) p = 3.f*s - __x + s*spin;\n\
               else p = 7.f*s + __x + s*spin;\n\
             }}\n\
             p = fmodf(p, s*8.f);\n\
             if (outer) {{\n\
               if (p <= 2.f*s) {{\n\
                 x2 = s + space;\n\
                 y2 = -(1.f*s - p);\n\
                 y2 = y2 + y2/s*space;\n\
               }} else if (p <= 4.f*s) {{\n\
                 y2 = s + space;\n\
                 x2 = 3.f*s - p;\n\
                 x2 = x2 + x2/s*space;\n\
               }} else if (p <= 6.f*s) {{\n\
                 x2 = -(s + space);\n\
                 y2 = 5.f*s - p;\n\
                 y2 = y2 + y2/s*space;\n\
               }} else {{\n\
                 y2 = -(s + space);\n\
                 x2 = -(7.f*s - p);\n\
                 x2 = x2 + x2/s*space;\n\
               }}\n\
               __px += __lazyTravis*x2;\n\
               __py += __lazyTravis*y2;\n\
             }} else {{\n\
               if (p <= 2.f*s) {{\n\
                 __px += __lazyTravis*s;\n\
                 __py -= __lazyTravis*(s - p);\n\
               }} else if (p <= 4.f*s) {{\n\
                 __px += __lazyTravis*(3.f*s - p);\n\
                 __py += __lazyTravis*s;\n\
               }} else if (p <= 6.f*s) {{\n\
                 __px -= __lazyTravis*s;\n\
                 __py += __lazyTravis*(5.f*s - p);\n\
               }} else {{\n\
                 __px -= __lazyTravis*(7.f*s - p);\n\
                 __py -= __lazyTravis*s;\n\
               }}\n\
             }}\n{}",
            kernel_carry_z(ctx, "lazyTravis")
        ))
    }

    fn box_clone(&self) -> Box<dyn VariationFunc> {
        Box::new(self.clone())
    }
}

static LAZYSUSAN_PARAMS: [ParamSpec; 5] = [
    ParamSpec::float("space"),
    ParamSpec::float("twist"),
    ParamSpec::float("spin"),
    ParamSpec::float("x"),
    ParamSpec::float("y"),
];

/// Rotating disc of radius `amount` centred on `(x, -y)`.
#[derive(Clone, Debug)]
pub(crate) struct LazySusan {
    space: f64,
    twist: f64,
    spin: f64,
    x: f64,
    y: f64,
}

impl Default for LazySusan {
    fn default() -> Self {
        Self {
            space: 0.4,
            twist: 0.2,
            spin: 0.1,
            x: 0.1,
            y: 0.2,
        }
    }
}

impl VariationFunc for LazySusan {
    fn name(&self) -> &'static str {
        "lazysusan"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::D2 | Capabilities::SUPPORTS_GPU
    }

    fn params(&self) -> &'static [ParamSpec] {
        &LAZYSUSAN_PARAMS
    }

    fn param(&self, idx: usize) -> f64 {
        match idx {
            0 => self.space,
            1 => self.twist,
            2 => self.spin,
            3 => self.x,
            _ => self.y,
        }
    }

    fn store_param(&mut self, idx: usize, value: f64) {
        match idx {
            0 => self.space = value,
            1 => self.twist = value,
            2 => self.spin = value,
            3 => self.x = value,
            _ => self.y = value,
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
        let xx = input.x - self.x;
        let yy = input.y + self.y;
        let rr = (xx * xx + yy * yy).sqrt();
        if rr < amount {
            let a = yy.atan2(xx) + self.spin + self.twist * (amount - rr);
            let rr = amount * rr;
            output.x += rr * a.cos() + self.x;
            output.y += rr * a.sin() - self.y;
        } else {
            let rr = amount * (1.0 + self.space / rr);
            output.x += rr * xx + self.x;
            output.y += rr * yy - self.y;
        }
        carry_z(ctx, input, output, amount);
    }

    fn kernel_source(&self, ctx: &Context) -> Option<String> {
        Some(format!(
            "float xx = __x - __lazysusan_x;\n\
             float yy = __y + __lazysusan_y;\n\
             float rr = sqrtf(xx*xx + yy*yy);\n\
             if (rr < __lazysusan) {{\n\
               float a = atan2f(yy, xx) + __lazysusan_spin + __lazysusan_twist*(__lazysusan - rr);\n\
               rr = __lazysusan*rr;\n\
               __px += rr*cosf(a) + __lazysusan_x;\n\
               __py += rr*sinf(a) - __lazysusan_y;\n\
             }} else {{\n\
               rr = __lazysusan*(1.f + __lazysusan_space/rr);\n\
               __px += rr*xx + __lazysusan_x;\n\
               __py += rr*yy - __lazysusan_y;\n\
             }}\n{}",
            kernel_carry_z(ctx, "lazysusan")
        ))
    }

    fn box_clone(&self) -> Box<dyn VariationFunc> {
        Box::new(self.clone())
    }
}

static SYM_NG17_PARAMS: [ParamSpec; 3] = [
    ParamSpec::float("Prop. Sep."),
    ParamSpec::float("StepX"),
    ParamSpec::float("StepY"),
];

/// Linear part `[a, b, d, e]` of the twelve point-group operations; rows are used twice.
const NG17_BASE: [[f64; 4]; 12] = [
    [1.0, 0.0, 0.0, 1.0],
    [1.0, 0.0, 0.0, -1.0],
    [0.5, -0.866, 0.866, 0.5],
    [0.5, 0.866, 0.866, -0.5],
    [-0.5, -0.866, 0.866, -0.5],
    [-0.5, 0.866, 0.866, 0.5],
    [-1.0, 0.0, 0.0, -1.0],
    [-1.0, 0.0, 0.0, 1.0],
    [-0.5, 0.866, -0.866, -0.5],
    [-0.5, -0.866, -0.866, 0.5],
    [0.5, 0.866, -0.866, 0.5],
    [0.5, -0.866, -0.866, -0.5],
];

/// Network symmetry group 17: one of 24 random isometries per call.
#[derive(Clone, Debug)]
pub(crate) struct SymNg17 {
    radius: f64,
    step_x: f64,
    step_y: f64,
    space: f64,
    matrices: [[f64; 6]; 24],
}

impl Default for SymNg17 {
    fn default() -> Self {
        let mut f = Self {
            radius: 0.0,
            step_x: 0.0,
            step_y: 0.0,
            space: 0.0,
            matrices: [[0.0; 6]; 24],
        };
        f.rebuild();
        f
    }
}

impl SymNg17 {
    fn rebuild(&mut self) {
        self.space = (self.radius * self.radius / 2.0).sqrt();
        let sx = self.step_x / 2.0;
        let sy = self.step_y / 2.0;
        for (i, m) in self.matrices.iter_mut().enumerate() {
            let [a, b, d, e] = NG17_BASE[i % 12];
            let (c, f) = if i < 12 { (-sx, -sy) } else { (sx, sy) };
            *m = [a, b, c, d, e, f];
        }
    }
}

impl VariationFunc for SymNg17 {
    fn name(&self) -> &'static str {
        "sym_ng17"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::D2
    }

    fn params(&self) -> &'static [ParamSpec] {
        &SYM_NG17_PARAMS
    }

    fn param(&self, idx: usize) -> f64 {
        match idx {
            0 => self.radius,
            1 => self.step_x,
            _ => self.step_y,
        }
    }

    fn store_param(&mut self, idx: usize, value: f64) {
        match idx {
            0 => self.radius = value,
            1 => self.step_x = value,
            _ => self.step_y = value,
        }
    }

    fn init(&mut self, _ctx: &mut Context, _layer: &LayerView, _xform: &XFormView, _amount: f64) {
        self.rebuild();
    }

    fn transform(
        &mut self,
        ctx: &mut Context,
        _xform: &XFormView,
        input: &mut XyzPoint,
        output: &mut XyzPoint,
        amount: f64,
    ) {
        let zx = input.x + self.space;
        let zy = input.y + self.space;
        let pick = ctx.random_int(self.matrices.len() as i32) as usize;
        let [a, b, c, d, e, f] = self.matrices[pick];
        output.x += amount * (a * zx + b * zy + c);
        output.y += amount * (d * zx + e * zy + f);
        carry_z(ctx, input, output, amount);
    }

    fn box_clone(&self) -> Box<dyn VariationFunc> {
        Box::new(self.clone())
    }
}

static TRUCHET_PARAMS: [ParamSpec; 7] = [
    ParamSpec::int_range("extended", 0, 1),
    ParamSpec::float("exponent"),
    ParamSpec::float("arc_width"),
    ParamSpec::float("rotation"),
    ParamSpec::float("size"),
    ParamSpec::float("seed"),
    ParamSpec::int_range("direct_color", 0, 1),
];

const TRUCHET_MULTIPLIER: f64 = 32747.0;
const TRUCHET_OFFSET: f64 = 12345.0;
const TRUCHET_MODBASE: f64 = 65535.0;

/// Truchet arc tiles with a pseudo-random tile orientation per cell.
#[derive(Clone, Debug)]
pub(crate) struct Truchet {
    extended: f64,
    exponent: f64,
    arc_width: f64,
    rotation: f64,
    size: f64,
    seed: f64,
    direct_color: f64,
}

impl Default for Truchet {
    fn default() -> Self {
        Self {
            extended: 0.0,
            exponent: 2.0,
            arc_width: 0.5,
            rotation: 0.0,
            size: 1.0,
            seed: 50.0,
            direct_color: 0.0,
        }
    }
}

impl Truchet {
    fn tile_type(&self, x: f64, y: f64) -> f64 {
        let seed = self.seed.abs();
        if seed == 0.0 {
            return 0.0;
        }
        if seed == 1.0 {
            return 1.0;
        }
        let seed2 = (seed + seed / 2.0 + SMALL_EPSILON).sqrt() / (seed * 0.5 + SMALL_EPSILON) * 0.25;
        let randint = if self.extended == 0.0 {
            let xr = x.round() * seed2;
            let yr = y.round() * seed2;
            let niter = xr + yr + xr * yr;
            let r = (niter + seed) * seed2 / 2.0;
            fmod(r * TRUCHET_MULTIPLIER + TRUCHET_OFFSET, TRUCHET_MODBASE)
        } else {
            let xr = x.round();
            let yr = y.round();
            let niter = (xr + yr + xr * yr).abs().min(1000.0);
            let mut r = seed.floor() + niter;
            let mut i = 0.0;
            while i < niter {
                i += 1.0;
                r = fmod(r * TRUCHET_MULTIPLIER + TRUCHET_OFFSET, TRUCHET_MODBASE);
            }
            r
        };
        fmod(randint, 2.0)
    }
}

fn pow_norm(x: f64, y: f64, n: f64) -> f64 {
    (x.abs().powf(n) + y.abs().powf(n)).powf(1.0 / n)
}

impl VariationFunc for Truchet {
    fn name(&self) -> &'static str {
        "truchet"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::D2
            | Capabilities::DIRECT_COLOR
            | Capabilities::SIMULATION
            | Capabilities::SUPPORTS_GPU
    }

    fn params(&self) -> &'static [ParamSpec] {
        &TRUCHET_PARAMS
    }

    fn param(&self, idx: usize) -> f64 {
        match idx {
            0 => self.extended,
            1 => self.exponent,
            2 => self.arc_width,
            3 => self.rotation,
            4 => self.size,
            5 => self.seed,
            _ => self.direct_color,
        }
    }

    fn store_param(&mut self, idx: usize, value: f64) {
        match idx {
            0 => self.extended = value,
            1 => self.exponent = value,
            2 => self.arc_width = value,
            3 => self.rotation = value,
            4 => self.size = value,
            5 => self.seed = value,
            _ => self.direct_color = value,
        }
    }

    /// Stored values are authored verbatim; the working range is enforced here.
    fn init(&mut self, _ctx: &mut Context, _layer: &LayerView, _xform: &XFormView, _amount: f64) {
        self.extended = self.extended.clamp(0.0, 1.0);
        self.exponent = self.exponent.clamp(0.001, 2.0);
        self.arc_width = self.arc_width.clamp(0.001, 1.0);
        self.size = self.size.clamp(0.001, 10.0);
    }

    fn transform(
        &mut self,
        ctx: &mut Context,
        _xform: &XFormView,
        input: &mut XyzPoint,
        output: &mut XyzPoint,
        amount: f64,
    ) {
        let n = self.exponent;
        let r = -self.rotation;
        let rmax = 0.5 * (2f64.powf(1.0 / n) - 1.0) * self.arc_width;
        let scale = (r.cos() - r.sin()) / amount;

        let cell = |v: f64| {
            let f = v - v.round();
            if f < 0.0 { 1.0 + f } else { f }
        };
        let x = cell(input.x * scale);
        let y = cell(input.y * scale);

        let tile = self.tile_type(input.x, input.y);
        let straight = if self.extended == 0.0 {
            tile < 1.0
        } else {
            tile == 1.0
        };
        let (r0, r1) = if straight {
            (pow_norm(x, y, n), pow_norm(x - 1.0, y - 1.0, n))
        } else {
            (pow_norm(x - 1.0, y, n), pow_norm(x, y - 1.0, n))
        };

        let dx = self.size * (x + input.x.floor());
        let dy = self.size * (y + input.y.floor());
        if (r0 - 0.5).abs() / rmax < 1.0 {
            if self.direct_color == 1.0 {
                output.color = r0.clamp(0.0, 1.0);
            }
            output.x += dx;
            output.y += dy;
        }
        if (r1 - 0.5).abs() / rmax < 1.0 {
            if self.direct_color == 1.0 {
                output.color = (1.0 - r1).clamp(0.0, 1.0);
            }
            output.x += dx;
            output.y += dy;
            carry_z(ctx, input, output, amount);
        }
    }

    fn kernel_source(&self, ctx: &Context) -> Option<String> {
        Some(format!(
            "float n = fminf(fmaxf(__truchet_exponent, 0.001f), 2.f);\n\
             float width = fminf(fmaxf(__truchet_arc_width, 0.001f), 1.f);\n\
             float size = fminf(fmaxf(__truchet_size, 0.001f), 10.f);\n\
             float onen = 1.f/n;\n\
             float seed = fabsf(__truchet_seed);\n\
             float seed2 = sqrtf(seed + seed/2.f + 1.e-6f)/(seed*0.5f + 1.e-6f)*0.25f;\n\
             float r = -__truchet_rotation;\n\
             float rmax = 0.5f*(powf(2.f, 1.f/n) - 1.f)*width;\n\
             float scale = (cosf(r) - sinf(r))/__truchet;\n\
             float tiletype = 0.f;\n\
             float randint = 0.f;\n\
             float x = __x*scale;\n\
             float y = __y*scale;\n\
             r = x - roundf(x);\n\
             x = r < 0.f ? 1.f + r : r;\n\
             r = y - roundf(y);\n\
             y = r < 0.f ? 1.f + r : r;\n\
             if (seed == 0.f) tiletype = 0.f;\n\
             else if (seed == 1.f) tiletype = 1.f;\n\
             else {{\n\
               if (__truchet_extended == 0) {{\n\
                 float xrand = roundf(__x)*seed2;\n\
                 float yrand = roundf(__y)*seed2;\n\
                 float niter = xrand + yrand + xrand*yrand;\n\
                 randint = (niter + seed)*seed2/2.f;\n\
                 randint = fmodf(randint*32747.f + 12345.f, 65535.f);\n\
               }} else {{\n\
                 seed = floorf(seed);\n\
                 float xri = roundf(__x);\n\
                 float yri = roundf(__y);\n\
                 float niter = fabsf(xri + yri + xri*yri);\n\
                 if (niter > 1000.f) niter = 1000.f;\n\
                 randint = seed + niter;\n\
                 int randiter = 0;\n\
                 while (randiter < niter) {{\n\
                   randiter += 1;\n\
                   randint = fmodf(randint*32747.f + 12345.f, 65535.f);\n\
                 }}\n\
               }}\n\
               tiletype = fmodf(randint, 2.f);\n\
             }}\n\
             short straight = __truchet_extended == 0 ? tiletype < 1.f : tiletype == 1.f;\n\
             float r0, r1;\n\
             if (straight) {{\n\
               r0 = powf(powf(fabsf(x), n) + powf(fabsf(y), n), onen);\n\
               r1 = powf(powf(fabsf(x - 1.f), n) + powf(fabsf(y - 1.f), n), onen);\n\
             }} else {{\n\
               r0 = powf(powf(fabsf(x - 1.f), n) + powf(fabsf(y), n), onen);\n\
               r1 = powf(powf(fabsf(x), n) + powf(fabsf(y - 1.f), n), onen);\n\
             }}\n\
             float dx = size*(x + floorf(__x));\n\
             float dy = size*(y + floorf(__y));\n\
             if (fabsf(r0 - 0.5f)/rmax < 1.f) {{\n\
               if (__truchet_direct_color == 1) __pal = fminf(fmaxf(r0, 0.f), 1.f);\n\
               __px += dx;\n\
               __py += dy;\n\
             }}\n\
             if (fabsf(r1 - 0.5f)/rmax < 1.f) {{\n\
               if (__truchet_direct_color == 1) __pal = fminf(fmaxf(1.f - r1, 0.f), 1.f);\n\
               __px += dx;\n\
               __py += dy;\n\
               {}\
             }}\n",
            kernel_carry_z(ctx, "truchet")
        ))
    }

    fn box_clone(&self) -> Box<dyn VariationFunc> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/variation/funcs/shapes.rs"]
mod tests;
