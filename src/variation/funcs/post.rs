//! Post-role functions: they read the composed output and overwrite it.

use crate::context::Context;
use crate::foundation::core::XyzPoint;
use crate::foundation::math::{EPSILON, M_2PI, fmod};
use crate::variation::{Capabilities, LayerView, ParamSpec, VariationFunc, XFormView};

static POST_AXIS_SYMMETRY_PARAMS: [ParamSpec; 11] = [
    ParamSpec::int_range("axis", 0, 2),
    ParamSpec::float("centre_x"),
    ParamSpec::float("centre_y"),
    ParamSpec::float("centre_z"),
    ParamSpec::float("rotation"),
    ParamSpec::float("x1colorshift"),
    ParamSpec::float("y1colorshift"),
    ParamSpec::float("z1colorshift"),
    ParamSpec::float("x2colorshift"),
    ParamSpec::float("y2colorshift"),
    ParamSpec::float("z2colorshift"),
];

/// Mirrors the composed point across an axis plane, splitting the halves by `amount` and
/// optionally rotating each copy about the centre.
///
/// The second Y-axis branch only shifts color while rotating, and the Z branch rotates `z`
/// around `centre_y`. Saved flames are rendered with both as-is.
#[derive(Clone, Debug)]
pub(crate) struct PostAxisSymmetry {
    axis: f64,
    centre_x: f64,
    centre_y: f64,
    centre_z: f64,
    rotation: f64,
    /// `[x1, y1, z1, x2, y2, z2]`
    shifts: [f64; 6],
    sina: f64,
    cosa: f64,
    halve_dist: f64,
    rotate: bool,
}

impl Default for PostAxisSymmetry {
    fn default() -> Self {
        Self {
            axis: 0.0,
            centre_x: 0.25,
            centre_y: 0.5,
            centre_z: 0.5,
            rotation: 30.0,
            shifts: [0.0; 6],
            sina: 0.0,
            cosa: 1.0,
            halve_dist: 0.0,
            rotate: false,
        }
    }
}

impl PostAxisSymmetry {
    fn mirror_x(&self, ctx: &mut Context, p: &mut XyzPoint) {
        let (cx, cy) = (self.centre_x, self.centre_y);
        let dx = p.x - cx;
        if ctx.random() < 0.5 {
            let (mut ax, mut ay) = (cx + dx + self.halve_dist, p.y);
            if self.rotate {
                let (dx, dy) = (ax - cx, ay - cy);
                ax = cx + dx * self.cosa + dy * self.sina;
                ay = cy + dy * self.cosa - dx * self.sina;
            }
            p.x = ax;
            p.y = ay;
            p.color = fmod(p.color + self.shifts[0], 1.0);
        } else {
            let (mut bx, mut by) = (cx - dx - self.halve_dist, p.y);
            if self.rotate {
                let (dx, dy) = (bx - cx, by - cy);
                bx = cx + dx * self.cosa - dy * self.sina;
                by = cy + dy * self.cosa + dx * self.sina;
            }
            p.x = bx;
            p.y = by;
            p.color = fmod(p.color + self.shifts[3], 1.0);
        }
    }

    fn mirror_y(&self, ctx: &mut Context, p: &mut XyzPoint) {
        let (cx, cy) = (self.centre_x, self.centre_y);
        let dy = p.y - cy;
        if ctx.random() < 0.5 {
            let (mut ax, mut ay) = (p.x, cy + dy + self.halve_dist);
            if self.rotate {
                let (dx, dy) = (ax - cx, ay - cy);
                ax = cx + dx * self.cosa + dy * self.sina;
                ay = cy + dy * self.cosa - dx * self.sina;
            }
            p.x = ax;
            p.y = ay;
            p.color = fmod(p.color + self.shifts[1], 1.0);
        } else {
            let (mut bx, mut by) = (p.x, cy - dy - self.halve_dist);
            if self.rotate {
                let (dx, dy) = (bx - cx, by - cy);
                bx = cx + dx * self.cosa - dy * self.sina;
                by = cy + dy * self.cosa + dx * self.sina;
                p.color = fmod(p.color + self.shifts[4], 1.0);
            }
            p.x = bx;
            p.y = by;
        }
    }

    fn mirror_z(&self, ctx: &mut Context, p: &mut XyzPoint) {
        let (cx, cy, cz) = (self.centre_x, self.centre_y, self.centre_z);
        let dz = p.z - cz;
        if ctx.random() < 0.5 {
            let (mut ax, mut az) = (p.x, cz + dz + self.halve_dist);
            if self.rotate {
                let (dx, dz) = (ax - cx, az - cz);
                ax = cx + dx * self.cosa + dz * self.sina;
                az = cy + dz * self.cosa - dx * self.sina;
            }
            p.x = ax;
            p.z = az;
            p.color = fmod(p.color + self.shifts[2], 1.0);
        } else {
            let (mut bx, mut bz) = (p.x, cz - dz - self.halve_dist);
            if self.rotate {
                let (dx, dz) = (bx - cx, bz - cz);
                bx = cx + dx * self.cosa - dz * self.sina;
                bz = cy + dz * self.cosa + dx * self.sina;
            }
            p.x = bx;
            p.z = bz;
            p.color = fmod(p.color + self.shifts[5], 1.0);
        }
    }
}

impl VariationFunc for PostAxisSymmetry {
    fn name(&self) -> &'static str {
        "post_axis_symmetry_wf"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::D2
            | Capabilities::DIRECT_COLOR
            | Capabilities::POST
            | Capabilities::SUPPORTS_GPU
    }

    fn params(&self) -> &'static [ParamSpec] {
        &POST_AXIS_SYMMETRY_PARAMS
    }

    fn param(&self, idx: usize) -> f64 {
        match idx {
            0 => self.axis,
            1 => self.centre_x,
            2 => self.centre_y,
            3 => self.centre_z,
            4 => self.rotation,
            i => self.shifts[i - 5],
        }
    }

    fn store_param(&mut self, idx: usize, value: f64) {
        match idx {
            0 => self.axis = value,
            1 => self.centre_x = value,
            2 => self.centre_y = value,
            3 => self.centre_z = value,
            4 => self.rotation = value,
            i => self.shifts[i - 5] = value,
        }
    }

    fn init(&mut self, _ctx: &mut Context, _layer: &LayerView, _xform: &XFormView, amount: f64) {
        let a = self.rotation * M_2PI / 180.0 / 2.0;
        self.rotate = a.abs() > EPSILON;
        (self.sina, self.cosa) = a.sin_cos();
        self.halve_dist = amount / 2.0;
    }

    fn transform(
        &mut self,
        ctx: &mut Context,
        _xform: &XFormView,
        _input: &mut XyzPoint,
        output: &mut XyzPoint,
        amount: f64,
    ) {
        if amount.abs() <= EPSILON {
            return;
        }
        match self.axis as i32 {
            0 => self.mirror_x(ctx, output),
            1 => self.mirror_y(ctx, output),
            _ => self.mirror_z(ctx, output),
        }
    }

    fn kernel_source(&self, _ctx: &Context) -> Option<String> {
        Some(
            "float a = __post_axis_symmetry_wf_rotation*(2.f*PI)/180.f/2.f;\n\
             short rot = fabsf(a) > epsilon;\n\
             float sina = sinf(a);\n\
             float cosa = cosf(a);\n\
             float halve = __post_axis_symmetry_wf/2.f;\n\
             float cx = __post_axis_symmetry_wf_centre_x;\n\
             float cy = __post_axis_symmetry_wf_centre_y;\n\
             float cz = __post_axis_symmetry_wf_centre_z;\n\
             int axis = lroundf(__post_axis_symmetry_wf_axis);\n\
             if (fabsf(__post_axis_symmetry_wf) > epsilon) {\n\
               float dx, dy, dz;\n\
               if (axis == 0) {\n\
                 dx = __px - cx;\n\
                 if (RANDFLOAT() < 0.5f) {\n\
                   float ax = cx + dx + halve;\n\
                   float ay = __py;\n\
                   if (rot) {\n\
                     dx = ax - cx;\n\
                     dy = ay - cy;\n\
                     ax = cx + dx*cosa + dy*sina;\n\
                     ay = cy + dy*cosa - dx*sina;\n\
                   }\n\
                   __px = ax;\n\
                   __py = ay;\n\
                   __pal = fmodf(__pal + __post_axis_symmetry_wf_x1colorshift, 1.f);\n\
                 } else {\n\
                   float bx = cx - dx - halve;\n\
                   float by = __py;\n\
                   if (rot) {\n\
                     dx = bx - cx;\n\
                     dy = by - cy;\n\
                     bx = cx + dx*cosa - dy*sina;\n\
                     by = cy + dy*cosa + dx*sina;\n\
                   }\n\
                   __px = bx;\n\
                   __py = by;\n\
                   __pal = fmodf(__pal + __post_axis_symmetry_wf_x2colorshift, 1.f);\n\
                 }\n\
               } else if (axis == 1) {\n\
                 dy = __py - cy;\n\
                 if (RANDFLOAT() < 0.5f) {\n\
                   float ax = __px;\n\
                   float ay = cy + dy + halve;\n\
                   if (rot) {\n\
                     dx = ax - cx;\n\
                     dy = ay - cy;\n\
                     ax = cx + dx*cosa + dy*sina;\n\
                     ay = cy + dy*cosa - dx*sina;\n\
                   }\n\
                   __px = ax;\n\
                   __py = ay;\n\
                   __pal = fmodf(__pal + __post_axis_symmetry_wf_y1colorshift, 1.f);\n\
                 } else {\n\
                   float bx = __px;\n\
                   float by = cy - dy - halve;\n\
                   if (rot) {\n\
                     dx = bx - cx;\n\
                     dy = by - cy;\n\
                     bx = cx + dx*cosa - dy*sina;\n\
                     by = cy + dy*cosa + dx*sina;\n\
                     __pal = fmodf(__pal + __post_axis_symmetry_wf_y2colorshift, 1.f);\n\
                   }\n\
                   __px = bx;\n\
                   __py = by;\n\
                 }\n\
               } else {\n\
                 dz = __pz - cz;\n\
                 if (RANDFLOAT() < 0.5f) {\n\
                   float ax = __px;\n\
                   float az = cz + dz + halve;\n\
                   if (rot) {\n\
                     dx = ax - cx;\n\
                     dz = az - cz;\n\
                     ax = cx + dx*cosa + dz*sina;\n\
                     az = cy + dz*cosa - dx*sina;\n\
                   }\n\
                   __px = ax;\n\
                   __pz = az;\n\
                   __pal = fmodf(__pal + __post_axis_symmetry_wf_z1colorshift, 1.f);\n\
                 } else {\n\
                   float bx = __px;\n\
                   float bz = cz - dz - halve;\n\
                   if (rot) {\n\
                     dx = bx - cx;\n\
                     dz = bz - cz;\n\
                     bx = cx + dx*cosa - dz*sina;\n\
                     bz = cy + dz*cosa + dx*sina;\n\
                   }\n\
                   __px = bx;\n\
                   __pz = bz;\n\
                   __pal = fmodf(__pal + __post_axis_symmetry_wf_z2colorshift, 1.f);\n\
                 }\n\
               }\n\
             }\n"
                .into(),
        )
    }

    fn box_clone(&self) -> Box<dyn VariationFunc> {
        Box::new(self.clone())
    }
}

static POST_ZSCALE_PARAMS: [ParamSpec; 1] = [ParamSpec::float("ztranslate")];

#[derive(Clone, Debug, Default)]
pub(crate) struct PostZScale {
    ztranslate: f64,
}

impl VariationFunc for PostZScale {
    fn name(&self) -> &'static str {
        "post_zscale_wf"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::Z_TRANSFORM | Capabilities::POST | Capabilities::SUPPORTS_GPU
    }

    fn params(&self) -> &'static [ParamSpec] {
        &POST_ZSCALE_PARAMS
    }

    fn param(&self, _idx: usize) -> f64 {
        self.ztranslate
    }

    fn store_param(&mut self, _idx: usize, value: f64) {
        self.ztranslate = value;
    }

    fn transform(
        &mut self,
        _ctx: &mut Context,
        _xform: &XFormView,
        _input: &mut XyzPoint,
        output: &mut XyzPoint,
        amount: f64,
    ) {
        output.z = amount * output.z + self.ztranslate;
    }

    fn kernel_source(&self, _ctx: &Context) -> Option<String> {
        Some("__pz = __post_zscale_wf*__pz + __post_zscale_wf_ztranslate;\n".into())
    }

    fn box_clone(&self) -> Box<dyn VariationFunc> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/variation/funcs/post.rs"]
mod tests;
