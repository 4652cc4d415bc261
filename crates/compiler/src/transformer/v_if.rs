use super::{Exits, TransformContext};
use crate::{
    ast::{IfBlock, TemplateNode},
    error::{CompilationError, CompileResult},
    flags::DynamicFlag,
    ir::{IfIRNode, IfNegative, Operation, SimpleExpression},
};

/// `{#if}` chains. Also rejects the block syntax without an IR
/// counterpart, as this transform runs first.
pub fn transform_if(ctx: &mut TransformContext<'_>) -> CompileResult<Exits> {
    let b = match &*ctx.node {
        TemplateNode::IfBlock(b) => b.clone(),
        TemplateNode::AwaitBlock(a) => {
            return Err(CompilationError::not_implemented("{#await} block", &a.location))
        }
        TemplateNode::KeyBlock(k) => {
            return Err(CompilationError::not_implemented("{#key} block", &k.location))
        }
        TemplateNode::ConstTag(c) => {
            return Err(CompilationError::not_implemented("{@const} tag", &c.location))
        }
        TemplateNode::DebugTag(d) => {
            return Err(CompilationError::not_implemented("{@debug} tag", &d.location))
        }
        _ => return Ok(Exits::new()),
    };
    ctx.dynamic.flags |= DynamicFlag::NON_TEMPLATE | DynamicFlag::INSERT;
    let id = ctx.reference();
    let if_node = build_if(ctx, id, &b)?;
    ctx.register_operation(Operation::If(if_node));
    Ok(Exits::new())
}

fn build_if(ctx: &mut TransformContext<'_>, id: usize, b: &IfBlock) -> CompileResult<IfIRNode> {
    let condition = ctx.process_expression(SimpleExpression::from(&b.test))?;
    let positive = ctx.create_block(TemplateNode::Fragment(b.consequent.clone()))?;
    let negative = if let Some(else_if) = b.else_if() {
        let id = ctx.allocate_id();
        Some(IfNegative::If(Box::new(build_if(ctx, id, else_if)?)))
    } else if let Some(alternate) = &b.alternate {
        let block = ctx.create_block(TemplateNode::Fragment(alternate.clone()))?;
        Some(IfNegative::Block(block))
    } else {
        None
    };
    Ok(IfIRNode {
        id,
        condition,
        positive,
        negative,
    })
}
