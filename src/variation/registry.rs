//! Closed name -> constructor table of every built-in variation function.
//!
//! Function names are matched exactly (case-sensitive); parameter names are not. Authoring files
//! rely on that asymmetry.

use crate::foundation::error::{FlameError, FlameResult};
use crate::variation::VariationFunc;
use crate::variation::funcs::{basic, blur, hyperbolic, post, shapes, waves, z3d};

type Ctor = fn() -> Box<dyn VariationFunc>;

fn make<T: VariationFunc + Default + 'static>() -> Box<dyn VariationFunc> {
    Box::new(T::default())
}

static REGISTRY: &[(&str, Ctor)] = &[
    ("asteria", make::<shapes::Asteria>),
    ("blocky", make::<shapes::Blocky>),
    ("blur", make::<blur::Blur>),
    ("blur3D", make::<blur::Blur3D>),
    ("cosh2_bs", make::<hyperbolic::Cosh2Bs>),
    ("crop3D", make::<z3d::Crop3D>),
    ("csc2_bs", make::<hyperbolic::Csc2Bs>),
    ("csch", make::<hyperbolic::Csch>),
    ("cschq", make::<hyperbolic::Cschq>),
    ("deltaA", make::<basic::DeltaA>),
    ("diamond", make::<basic::Diamond>),
    ("disc3d", make::<z3d::Disc3D>),
    ("ePush", make::<hyperbolic::EPush>),
    ("hole2", make::<shapes::Hole2>),
    ("idisc", make::<basic::IDisc>),
    ("inflateZ_2", make::<z3d::InflateZ2>),
    ("julia3Dq", make::<z3d::Julia3Dq>),
    ("lazyTravis", make::<shapes::LazyTravis>),
    ("lazysusan", make::<shapes::LazySusan>),
    ("linear", make::<basic::Linear>),
    ("linear3D", make::<basic::Linear3D>),
    ("linearT", make::<basic::LinearT>),
    ("panorama2", make::<basic::Panorama2>),
    ("parabola", make::<blur::Parabola>),
    ("post_axis_symmetry_wf", make::<post::PostAxisSymmetry>),
    ("post_zscale_wf", make::<post::PostZScale>),
    ("pre_blur", make::<blur::PreBlur>),
    ("rays1", make::<basic::Rays1>),
    ("scry_3D", make::<z3d::Scry3D>),
    ("sec2_bs", make::<hyperbolic::Sec2Bs>),
    ("splits3D", make::<basic::Splits3D>),
    ("sqrt_asinh", make::<hyperbolic::SqrtAsinh>),
    ("swirl3D_wf", make::<z3d::Swirl3D>),
    ("sym_ng17", make::<shapes::SymNg17>),
    ("truchet", make::<shapes::Truchet>),
    ("waves42", make::<waves::Waves42>),
    ("waves4_wf", make::<waves::Waves4>),
];

/// Construct a fresh instance of the function registered under `name`.
pub fn create(name: &str) -> FlameResult<Box<dyn VariationFunc>> {
    match REGISTRY.iter().find(|(n, _)| *n == name) {
        Some((_, ctor)) => Ok(ctor()),
        None => {
            tracing::debug!(name, "variation lookup miss");
            Err(FlameError::unknown_variation(name))
        }
    }
}

/// Whether `name` is registered (exact match).
pub fn contains(name: &str) -> bool {
    REGISTRY.iter().any(|(n, _)| *n == name)
}

/// All registered names, in table order.
pub fn names() -> impl Iterator<Item = &'static str> {
    REGISTRY.iter().map(|(n, _)| *n)
}

/// Fresh instance of every registered function.
pub fn all() -> Vec<Box<dyn VariationFunc>> {
    REGISTRY.iter().map(|(_, ctor)| ctor()).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/variation/registry.rs"]
mod tests;
