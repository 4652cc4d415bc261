use super::{Exits, TransformContext};
use crate::{
    ast::{Element, ElementKind, Fragment, IfBlock, TemplateNode},
    error::{CompilationError, CompileResult},
    flags::DynamicFlag,
    ir::{Operation, SimpleExpression},
    util::{self, escape_html, is_preformatted_tag},
};

pub fn transform_text(ctx: &mut TransformContext<'_>) -> CompileResult<Exits> {
    if let Some(frame) = ctx.parent {
        if ctx.index < frame.consumed_until.get() {
            ctx.dynamic.flags |= DynamicFlag::NON_TEMPLATE;
            return Ok(Exits::new());
        }
    }
    let node = ctx.node.clone();
    match &*node {
        TemplateNode::Element(e) if e.kind == ElementKind::Regular => {
            process_text_container(ctx, e)?;
        }
        TemplateNode::MustacheTag(_) => process_text_like(ctx)?,
        TemplateNode::RawMustacheTag(e) => {
            let construct = "{@html} outside of a single-child element";
            return Err(CompilationError::not_implemented(construct, &e.location));
        }
        TemplateNode::Text(t) => ctx.template.push_str(&escape_html(&t.data)),
        TemplateNode::Comment(c) => {
            if ctx.options.comments {
                ctx.template.push_str(&format!("<!--{}-->", c.data));
            } else {
                ctx.remove_node();
            }
        }
        _ => (),
    }
    Ok(Exits::new())
}

/// `<p>Hello {name}!</p>` sets the text of `p` in one operation.
fn process_text_container(ctx: &mut TransformContext<'_>, e: &Element) -> CompileResult<()> {
    if let [TemplateNode::RawMustacheTag(html)] = e.children.as_slice() {
        let value = ctx.process_expression(SimpleExpression::from(html))?;
        let element = ctx.reference();
        ctx.consumed_children = 1;
        ctx.register_effect(vec![value.clone()], Operation::SetHtml { element, value });
        return Ok(());
    }
    let is_all_text_like = e.children.iter().all(TemplateNode::is_text_like)
        && e.children
            .iter()
            .any(|n| matches!(n, TemplateNode::MustacheTag(_)));
    if !is_all_text_like {
        return Ok(());
    }
    let values = text_values(ctx, &e.children)?;
    ctx.consumed_children = e.children.len();
    // inlined into the template, so markup in the values must stay text
    let literals: Option<Vec<String>> = values
        .iter()
        .map(|v| v.literal_value().map(|s| escape_html(&s)))
        .collect();
    match literals {
        Some(literals) => ctx.children_template = literals,
        None => {
            let element = ctx.reference();
            ctx.register_effect(values.clone(), Operation::SetText { element, values });
        }
    }
    Ok(())
}

/// A run of text and interpolations starting at an interpolation
/// becomes one runtime text node.
fn process_text_like(ctx: &mut TransformContext<'_>) -> CompileResult<()> {
    let frame = match ctx.parent {
        Some(frame) => frame,
        None => return Ok(()),
    };
    let nexts = &frame.children[ctx.index..];
    let len = nexts
        .iter()
        .position(|n| !n.is_text_like())
        .unwrap_or(nexts.len());
    frame.consume_until(ctx.index + len);
    let values = text_values(ctx, &nexts[..len])?;
    let id = ctx.reference();
    ctx.dynamic.flags |= DynamicFlag::INSERT | DynamicFlag::NON_TEMPLATE;
    let effect = !values.iter().all(SimpleExpression::is_constant);
    ctx.register_operation(Operation::CreateTextNode { id, values, effect });
    Ok(())
}

fn text_values(
    ctx: &TransformContext<'_>,
    nodes: &[TemplateNode],
) -> CompileResult<Vec<SimpleExpression>> {
    nodes
        .iter()
        .filter_map(|n| match n {
            TemplateNode::Text(t) => {
                let value = SimpleExpression::new_static(t.data.as_str(), t.location.clone());
                Some(Ok(value))
            }
            TemplateNode::MustacheTag(e) => {
                Some(ctx.process_expression(SimpleExpression::from(e)))
            }
            _ => None,
        })
        .collect()
}

/// Whitespace pass run before traversal in `Condense` mode.
/// Whitespace-only text at either end of a child list, or between two
/// elements when it contains a newline, is dropped. Other whitespace
/// runs collapse to one space. Preformatted content is left untouched.
pub fn condense_whitespace(fragment: &mut Fragment) {
    condense_children(&mut fragment.children);
}

fn condense_children(children: &mut Vec<TemplateNode>) {
    let len = children.len();
    let mut keep = vec![true; len];
    for i in 0..len {
        let t = match &children[i] {
            TemplateNode::Text(t) => t,
            _ => continue,
        };
        if !t.is_all_whitespace() {
            continue;
        }
        let is_markup = |n: Option<&TemplateNode>| {
            matches!(n, Some(TemplateNode::Element(_) | TemplateNode::Comment(_)))
        };
        let prev = i.checked_sub(1).and_then(|p| children.get(p));
        let next = children.get(i + 1);
        if i == 0
            || i == len - 1
            || (is_markup(prev) && is_markup(next) && t.data.contains(['\n', '\r']))
        {
            keep[i] = false;
        }
    }
    let mut keep = keep.into_iter();
    children.retain(|_| keep.next().unwrap_or(true));
    for child in children.iter_mut() {
        condense_node(child);
    }
}

fn condense_node(node: &mut TemplateNode) {
    match node {
        TemplateNode::Text(t) => {
            t.data = util::condense_whitespace(&t.data);
        }
        TemplateNode::Element(e) if !is_preformatted_tag(&e.name) => {
            condense_children(&mut e.children);
        }
        TemplateNode::Fragment(f) => condense_children(&mut f.children),
        TemplateNode::IfBlock(b) => condense_if(b),
        TemplateNode::EachBlock(b) => {
            condense_children(&mut b.children.children);
            if let Some(fallback) = &mut b.fallback {
                condense_children(&mut fallback.children);
            }
        }
        TemplateNode::KeyBlock(b) => condense_children(&mut b.children.children),
        _ => (),
    }
}

fn condense_if(b: &mut IfBlock) {
    condense_children(&mut b.consequent.children);
    if let Some(alternate) = &mut b.alternate {
        condense_children(&mut alternate.children);
    }
}
