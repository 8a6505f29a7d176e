//! Kernel export: collects the wrapped kernel fragments of a flame for a GPU backend.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use xxhash_rust::xxh3::Xxh3;

use crate::context::Context;
use crate::flame::Flame;
use crate::foundation::error::{FlameError, FlameResult};
use crate::kernel::symbols;
use crate::variation::Variation;

const XXH3_SEED: u64 = 0x8b5ad4a0c7d8e9f1;

/// One variation instance's fragment, wrapped with its bindings.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct KernelEntry {
    /// Layer index.
    pub layer: usize,
    /// Transform index within the layer (final transforms are counted separately).
    pub xform: usize,
    /// Whether the owning transform is a final transform.
    pub final_xform: bool,
    /// Function name.
    pub name: &'static str,
    /// Self-contained source: a block declaring the bindings, then the fragment.
    pub source: String,
}

/// Exporter output for one flame.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct KernelBundle {
    /// Identifier of the distinct function set, formatted `8-4-4-4-12` upper-case hex.
    pub varset_id: String,
    /// Wrapped fragments in layer/transform/variation order.
    pub entries: Vec<KernelEntry>,
    /// Sorted names of functions used by the flame that have no kernel form.
    pub unsupported: Vec<&'static str>,
}

impl KernelBundle {
    /// Fail when any used function lacks a kernel form.
    pub fn require_complete(&self) -> FlameResult<()> {
        match self.unsupported.first() {
            Some(name) => Err(FlameError::unsupported(*name, "SUPPORTS_GPU")),
            None => Ok(()),
        }
    }
}

/// Collect the kernel fragments of every variation in `flame`.
///
/// `ctx` supplies the render-wide flags (preserve-Z) that shape the generated source.
#[tracing::instrument(skip_all, fields(flame = %flame.name()))]
pub fn export_kernels(flame: &Flame, ctx: &Context) -> KernelBundle {
    let mut names = BTreeSet::new();
    let mut unsupported = BTreeSet::new();
    let mut entries = Vec::new();

    for (li, layer) in flame.layers().iter().enumerate() {
        let groups = [(false, layer.xforms()), (true, layer.final_xforms())];
        for (final_xform, xforms) in groups {
            for (xi, xf) in xforms.iter().enumerate() {
                for v in xf.variations() {
                    names.insert(v.name());
                    match v.func().kernel_source(ctx) {
                        Some(src) => entries.push(KernelEntry {
                            layer: li,
                            xform: xi,
                            final_xform,
                            name: v.name(),
                            source: wrap_fragment(v, &src),
                        }),
                        None => {
                            if unsupported.insert(v.name()) {
                                tracing::warn!(name = v.name(), "variation has no kernel form");
                            }
                        }
                    }
                }
            }
        }
    }

    KernelBundle {
        varset_id: varset_id(names.iter().copied()),
        entries,
        unsupported: unsupported.into_iter().collect(),
    }
}

/// Wrap `src` in a block that declares the variation's amount and parameter symbols.
pub fn wrap_fragment(variation: &Variation, src: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "// {}", variation.name());
    out.push_str("{\n");
    for (sym, v) in symbols::bindings(variation) {
        let v = if v.is_finite() { v } else { 0.0 };
        let _ = writeln!(out, "  float {sym} = {v:?};");
    }
    for line in src.lines() {
        if line.is_empty() {
            out.push('\n');
        } else {
            let _ = writeln!(out, "  {line}");
        }
    }
    out.push_str("}\n");
    out
}

/// Identifier of a function set: xxh3-128 over the sorted distinct names joined with `#`.
pub fn varset_id<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    let distinct: BTreeSet<&str> = names.into_iter().collect();
    let joined = distinct.into_iter().collect::<Vec<_>>().join("#");

    let mut h = Xxh3::with_seed(XXH3_SEED);
    h.update(joined.as_bytes());
    let hex = format!("{:032X}", h.digest128());
    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/export.rs"]
mod tests;
