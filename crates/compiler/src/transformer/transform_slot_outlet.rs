use super::{Exits, TransformContext};
use crate::{
    ast::{ElementKind, Fragment, TemplateNode},
    converter::build_props,
    error::CompileResult,
    flags::DynamicFlag,
    ir::{Operation, SimpleExpression, SlotOutletIRNode},
    normalizer::{normalize_attributes, ElementProp},
};

/// `<slot name="x" {...props}>fallback</slot>`
pub fn transform_slot_outlet(ctx: &mut TransformContext<'_>) -> CompileResult<Exits> {
    let e = match &*ctx.node {
        TemplateNode::Element(e) if e.kind == ElementKind::SlotOutlet => e.clone(),
        _ => return Ok(Exits::new()),
    };
    let id = ctx.reference();
    ctx.dynamic.flags |= DynamicFlag::INSERT | DynamicFlag::NON_TEMPLATE;

    let mut name = None;
    let mut props = vec![];
    for prop in normalize_attributes(&e.attributes)? {
        match prop {
            ElementProp::Attribute(a) if a.name == "name" => {
                name = Some(SimpleExpression::new_static(a.value, a.location));
            }
            ElementProp::Directive(d) if d.name == "bind" && d.static_arg() == Some("name") => {
                name = d.exp.map(|exp| ctx.process_expression(exp)).transpose()?;
            }
            other => props.push(other),
        }
    }
    let name =
        name.unwrap_or_else(|| SimpleExpression::new_static("default", e.location.clone()));
    let props = build_props(&e, props, ctx, true)?.into_props();

    let fallback = if e.children.iter().all(TemplateNode::is_whitespace_text) {
        None
    } else {
        let fragment = Fragment {
            children: e.children.clone(),
            location: e.location.clone(),
        };
        Some(ctx.create_block(TemplateNode::Fragment(fragment))?)
    };
    ctx.replace_node(TemplateNode::Element(e.without_children()));
    ctx.register_operation(Operation::SlotOutlet(SlotOutletIRNode {
        id,
        name,
        props,
        fallback,
    }));
    Ok(Exits::new())
}
