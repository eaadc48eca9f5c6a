//! Offline checks of the WGSL programs against the Rust-side layouts.
//!
//! wgpu only reports a location or binding mismatch when the pipeline is
//! created, and then as a device error. Running the programs through naga
//! first turns that into an ordinary `anyhow::Error` and lets tests cover all
//! three programs without an adapter.

use std::collections::BTreeMap;

use anyhow::{bail, ensure, Context};
use naga::{AddressSpace, Binding, ScalarKind, ShaderStage, TypeInner};

use super::layer::DrawKind;

pub const VERTEX_ENTRY: &str = "vs_main";
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// Resource class expected at a `(group, binding)` slot.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SlotResource {
    Uniform,
    Texture,
    Sampler,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BindingSlot {
    pub group: u32,
    pub binding: u32,
    pub resource: SlotResource,
}

impl BindingSlot {
    #[inline]
    pub const fn new(group: u32, binding: u32, resource: SlotResource) -> Self {
        Self { group, binding, resource }
    }
}

/// Parses and validates the program for `kind`, then checks that its vertex
/// inputs and resource bindings agree with the Rust layouts.
pub fn validate(kind: DrawKind) -> anyhow::Result<naga::Module> {
    validate_source(
        kind.label(),
        kind.shader_source(),
        &kind.vertex_layouts(),
        kind.bindings(),
    )
}

pub(crate) fn validate_source(
    label: &str,
    source: &str,
    layouts: &[wgpu::VertexBufferLayout<'_>],
    bindings: &[BindingSlot],
) -> anyhow::Result<naga::Module> {
    let module = naga::front::wgsl::parse_str(source)
        .map_err(|e| anyhow::anyhow!("{label} shader: {}", e.emit_to_string(source)))?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    validator
        .validate(&module)
        .map_err(|e| anyhow::anyhow!("{label} shader failed validation: {e:?}"))?;

    find_entry(&module, ShaderStage::Vertex, VERTEX_ENTRY)
        .with_context(|| format!("{label} shader"))?;
    find_entry(&module, ShaderStage::Fragment, FRAGMENT_ENTRY)
        .with_context(|| format!("{label} shader"))?;

    check_vertex_inputs(&module, layouts).with_context(|| format!("{label} vertex inputs"))?;
    check_bindings(&module, bindings).with_context(|| format!("{label} resource bindings"))?;

    log::debug!("{label} shader validated");
    Ok(module)
}

fn find_entry<'m>(
    module: &'m naga::Module,
    stage: ShaderStage,
    name: &str,
) -> anyhow::Result<&'m naga::EntryPoint> {
    module
        .entry_points
        .iter()
        .find(|ep| ep.stage == stage && ep.name == name)
        .with_context(|| format!("missing {stage:?} entry point `{name}`"))
}

/// Scalar kind and component count of one vertex input.
type InputShape = (ScalarKind, u32);

fn format_shape(format: wgpu::VertexFormat) -> Option<InputShape> {
    use wgpu::VertexFormat as F;
    Some(match format {
        F::Float32 => (ScalarKind::Float, 1),
        F::Float32x2 => (ScalarKind::Float, 2),
        F::Float32x3 => (ScalarKind::Float, 3),
        F::Float32x4 => (ScalarKind::Float, 4),
        F::Uint32 => (ScalarKind::Uint, 1),
        F::Uint32x2 => (ScalarKind::Uint, 2),
        F::Uint32x3 => (ScalarKind::Uint, 3),
        F::Uint32x4 => (ScalarKind::Uint, 4),
        F::Sint32 => (ScalarKind::Sint, 1),
        F::Sint32x2 => (ScalarKind::Sint, 2),
        F::Sint32x3 => (ScalarKind::Sint, 3),
        F::Sint32x4 => (ScalarKind::Sint, 4),
        _ => return None,
    })
}

fn type_shape(inner: &TypeInner) -> Option<InputShape> {
    match *inner {
        TypeInner::Scalar(scalar) => Some((scalar.kind, 1)),
        TypeInner::Vector { size, scalar } => {
            let n = match size {
                naga::VectorSize::Bi => 2,
                naga::VectorSize::Tri => 3,
                naga::VectorSize::Quad => 4,
            };
            Some((scalar.kind, n))
        }
        _ => None,
    }
}

/// Collects `@location` inputs of the vertex entry, flattening struct args.
fn vertex_inputs(module: &naga::Module) -> anyhow::Result<BTreeMap<u32, InputShape>> {
    let entry = find_entry(module, ShaderStage::Vertex, VERTEX_ENTRY)?;
    let mut inputs = BTreeMap::new();

    let mut record =
        |binding: Option<&Binding>, ty: naga::Handle<naga::Type>| -> anyhow::Result<()> {
            let Some(Binding::Location { location, .. }) = binding else { return Ok(()) };
            let inner = &module.types[ty].inner;
            let shape = type_shape(inner)
                .with_context(|| format!("location {location} has unsupported type {inner:?}"))?;
            let fresh = inputs.insert(*location, shape).is_none();
            ensure!(fresh, "location {location} declared twice");
            Ok(())
        };

    for arg in &entry.function.arguments {
        match &module.types[arg.ty].inner {
            TypeInner::Struct { members, .. } if arg.binding.is_none() => {
                for member in members {
                    record(member.binding.as_ref(), member.ty)?;
                }
            }
            _ => record(arg.binding.as_ref(), arg.ty)?,
        }
    }

    Ok(inputs)
}

fn check_vertex_inputs(
    module: &naga::Module,
    layouts: &[wgpu::VertexBufferLayout<'_>],
) -> anyhow::Result<()> {
    let inputs = vertex_inputs(module)?;

    let mut provided: BTreeMap<u32, wgpu::VertexFormat> = BTreeMap::new();
    for layout in layouts {
        for attr in layout.attributes {
            ensure!(
                provided.insert(attr.shader_location, attr.format).is_none(),
                "location {} provided by more than one attribute",
                attr.shader_location
            );
        }
    }

    for (location, &(kind, components)) in &inputs {
        let Some(&format) = provided.get(location) else {
            bail!("location {location} is read by the program but no buffer provides it");
        };
        let Some((attr_kind, attr_components)) = format_shape(format) else {
            bail!("location {location} uses unsupported vertex format {format:?}");
        };
        ensure!(
            attr_kind == kind && attr_components == components,
            "location {location}: program expects {components}x {kind:?}, \
             buffer provides {format:?}"
        );
    }

    for location in provided.keys() {
        ensure!(
            inputs.contains_key(location),
            "location {location} is provided but the program never reads it"
        );
    }

    Ok(())
}

fn check_bindings(module: &naga::Module, expected: &[BindingSlot]) -> anyhow::Result<()> {
    let mut declared = Vec::new();

    for (_, var) in module.global_variables.iter() {
        let Some(rb) = var.binding.as_ref() else { continue };
        let name = var.name.as_deref().unwrap_or("<unnamed>");
        let resource = match (var.space, &module.types[var.ty].inner) {
            (AddressSpace::Uniform, _) => SlotResource::Uniform,
            (AddressSpace::Handle, TypeInner::Image { .. }) => SlotResource::Texture,
            (AddressSpace::Handle, TypeInner::Sampler { .. }) => SlotResource::Sampler,
            (space, inner) => bail!("`{name}` has unsupported resource kind {space:?} / {inner:?}"),
        };
        declared.push(BindingSlot::new(rb.group, rb.binding, resource));
    }

    declared.sort_by_key(|slot| (slot.group, slot.binding));
    let mut expected = expected.to_vec();
    expected.sort_by_key(|slot| (slot.group, slot.binding));

    ensure!(
        declared == expected,
        "program declares {declared:?}, renderer binds {expected:?}"
    );
    Ok(())
}
