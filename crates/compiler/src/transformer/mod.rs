/*!
Transform template AST into block IR.

The pipeline visits every node once. Registered node transforms run at
node enter in registration order; each may hand back exit callbacks,
which run after descent in reverse order. Descent is not automatic:
`transform_children` is the transform responsible for it.

# Node transforms (base preset order)
* transform_if
* transform_each
* transform_slot_outlet
* transform_text
* transform_element
* transform_component_slots
* transform_children

Directive transforms used by the props builder live in `converter`.
 */

use crate::error::CompileResult;
use smallvec::SmallVec;
use tracing::trace;

mod context;
mod process_expression;
mod transform_children;
mod transform_element;
mod transform_slot_outlet;
mod transform_text;
mod v_each;
mod v_if;
mod v_slot;

pub use context::{CompileUnit, ParentFrame, TransformContext};
pub use transform_children::transform_children;
pub use transform_element::{resolve_setup_reference, transform_element};
pub use transform_slot_outlet::transform_slot_outlet;
pub use transform_text::{condense_whitespace, transform_text};
pub use v_each::transform_each;
pub use v_if::transform_if;
pub use v_slot::transform_component_slots;

/// Deferred work of one node, run after its children are done.
pub type ExitFn = fn(&mut TransformContext<'_>) -> CompileResult<()>;
pub type Exits = SmallVec<[ExitFn; 2]>;
/// Runs at node enter. May replace or remove `ctx.node`.
pub type NodeTransform = fn(&mut TransformContext<'_>) -> CompileResult<Exits>;

pub fn get_base_transform_preset() -> Vec<NodeTransform> {
    vec![
        transform_if,
        transform_each,
        transform_slot_outlet,
        transform_text,
        transform_element,
        transform_component_slots,
        transform_children,
    ]
}

pub fn transform_node(ctx: &mut TransformContext<'_>) -> CompileResult<()> {
    let options = ctx.options;
    trace!(index = ctx.index, kind = node_kind(&ctx.node), "enter node");
    let mut exits = Exits::new();
    for transform in options.node_transforms.iter() {
        exits.extend(transform(ctx)?);
        if ctx.removed {
            trace!(index = ctx.index, "node removed");
            return Ok(());
        }
    }
    for exit in exits.into_iter().rev() {
        exit(ctx)?;
    }
    if ctx.is_block_root {
        ctx.register_template();
    }
    Ok(())
}

fn node_kind(node: &crate::ast::TemplateNode) -> &'static str {
    use crate::ast::TemplateNode as N;
    match node {
        N::Fragment(_) => "fragment",
        N::Element(_) => "element",
        N::Text(_) => "text",
        N::Comment(_) => "comment",
        N::MustacheTag(_) => "mustache",
        N::RawMustacheTag(_) => "raw-mustache",
        N::IfBlock(_) => "if",
        N::EachBlock(_) => "each",
        N::AwaitBlock(_) => "await",
        N::KeyBlock(_) => "key",
        N::ConstTag(_) => "const",
        N::DebugTag(_) => "debug",
    }
}
