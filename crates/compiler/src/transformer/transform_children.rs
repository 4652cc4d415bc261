use super::{transform_node, Exits, ParentFrame, TransformContext};
use crate::{
    ast::{ElementKind, TemplateNode},
    error::CompileResult,
    flags::DynamicFlag,
    ir::Operation,
};
use std::mem;

/// Descends into the children of fragments and native elements.
/// Components and slot outlets turn their children into blocks elsewhere.
pub fn transform_children(ctx: &mut TransformContext<'_>) -> CompileResult<Exits> {
    let is_fragment = match &*ctx.node {
        TemplateNode::Fragment(_) => true,
        TemplateNode::Element(e) if e.kind == ElementKind::Regular => false,
        _ => return Ok(Exits::new()),
    };
    // children are borrowed by the child contexts while ctx is reborrowed
    let node = mem::take(&mut ctx.node);
    let walked = walk_children(ctx, &node, is_fragment);
    ctx.node = node;
    walked?;
    if !is_fragment {
        process_dynamic_children(ctx);
    }
    Ok(Exits::new())
}

fn walk_children(
    ctx: &mut TransformContext<'_>,
    node: &TemplateNode,
    is_fragment: bool,
) -> CompileResult<()> {
    let frame = ParentFrame::new(node, ctx.consumed_children);
    for (i, child) in node.children().iter().enumerate() {
        let mut child_ctx = ctx.create(child, i, &frame);
        transform_node(&mut child_ctx)?;
        if child_ctx.removed {
            child_ctx.dynamic.flags |= DynamicFlag::NON_TEMPLATE;
        } else if is_fragment {
            let id = child_ctx.reference();
            child_ctx.register_template();
            let flags = child_ctx.dynamic.flags;
            if !flags.contains(DynamicFlag::NON_TEMPLATE) || flags.contains(DynamicFlag::INSERT) {
                child_ctx.block.returns.push(id);
            }
        }
        let TransformContext {
            dynamic, template, ..
        } = child_ctx;
        if !is_fragment {
            ctx.children_template.push(template);
        }
        if dynamic.is_dynamic() {
            ctx.dynamic.has_dynamic_child = true;
        }
        ctx.dynamic.children.push(dynamic);
    }
    Ok(())
}

/// Inserted children cannot live in the template. A run of them is
/// prepended when nothing static precedes it, inserted before a `<!>`
/// placeholder when something static follows, or appended otherwise.
fn process_dynamic_children(ctx: &mut TransformContext<'_>) {
    let mut run: Vec<usize> = vec![];
    let mut has_static_template = false;
    for index in 0..ctx.dynamic.children.len() {
        let flags = ctx.dynamic.children[index].flags;
        if flags.contains(DynamicFlag::INSERT) {
            run.push(index);
        }
        if flags.contains(DynamicFlag::NON_TEMPLATE) {
            continue;
        }
        if !run.is_empty() {
            let elements = run_ids(ctx, &run);
            let first = run[0];
            if has_static_template {
                ctx.children_template[first] = "<!>".into();
                let anchor = ctx.allocate_id();
                let placeholder = &mut ctx.dynamic.children[first];
                placeholder.flags.remove(DynamicFlag::NON_TEMPLATE);
                placeholder.anchor = Some(anchor);
                let parent = ctx.reference();
                ctx.register_operation(Operation::InsertNode {
                    elements,
                    parent,
                    anchor: Some(anchor),
                });
            } else {
                let parent = ctx.reference();
                ctx.register_operation(Operation::PrependNode { elements, parent });
            }
            run.clear();
        }
        has_static_template = true;
    }
    if !run.is_empty() {
        let elements = run_ids(ctx, &run);
        let parent = ctx.reference();
        ctx.register_operation(Operation::InsertNode {
            elements,
            parent,
            anchor: None,
        });
    }
}

fn run_ids(ctx: &TransformContext<'_>, run: &[usize]) -> Vec<usize> {
    run.iter()
        .filter_map(|&i| ctx.dynamic.children[i].id)
        .collect()
}
