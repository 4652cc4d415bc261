use super::{Exits, TransformContext};
use crate::{
    ast::{EachBlock, TemplateNode},
    error::CompileResult,
    flags::DynamicFlag,
    ir::{ForIRNode, Operation, SimpleExpression},
    js,
};
use tracing::trace;

/// `{#each items as item, i (item.id)}...{:else}...{/each}`
pub fn transform_each(ctx: &mut TransformContext<'_>) -> CompileResult<Exits> {
    let b = match &*ctx.node {
        TemplateNode::EachBlock(b) => b.clone(),
        _ => return Ok(Exits::new()),
    };
    ctx.dynamic.flags |= DynamicFlag::NON_TEMPLATE | DynamicFlag::INSERT;
    let id = ctx.reference();
    let for_node = build_for(ctx, id, b)?;
    ctx.register_operation(Operation::For(for_node));
    Ok(Exits::new())
}

fn build_for(
    ctx: &mut TransformContext<'_>,
    id: usize,
    b: EachBlock,
) -> CompileResult<ForIRNode> {
    let EachBlock {
        expression,
        context,
        index,
        key,
        children,
        fallback,
        location,
    } = b;
    // the source is evaluated outside of the loop scope
    let source = ctx.process_expression(SimpleExpression::from(&expression))?;
    let mut names =
        js::pattern_bound_names(&context).map_err(|e| e.with_location(location.clone()))?;
    let value = SimpleExpression::dynamic(context.trim(), location.clone());
    let index = index.map(|name| SimpleExpression::dynamic(name, location.clone()));

    if let Some(index) = &index {
        names.push(index.content.clone());
    }
    trace!(?names, "each block scope");
    let (render, key_prop) = ctx.with_identifiers(&names, |ctx| {
        ctx.unit.in_for += 1;
        let render = ctx.create_block(TemplateNode::Fragment(children));
        let key_prop = key
            .map(|k| ctx.process_expression(SimpleExpression::from(&k)))
            .transpose();
        ctx.unit.in_for -= 1;
        Ok((render?, key_prop?))
    })?;
    let fallback = match fallback {
        Some(fallback) => Some(ctx.create_block(TemplateNode::Fragment(fallback))?),
        None => None,
    };
    Ok(ForIRNode {
        id,
        source,
        value,
        index,
        key_prop,
        render,
        fallback,
    })
}
