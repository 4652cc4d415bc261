use super::{Exits, TransformContext};
use crate::{
    ast::{Element, ElementKind, Fragment, TemplateNode},
    error::{CompilationError, CompilationErrorKind as ErrorKind, CompileResult},
    ir::IRSlot,
    SourceLocation,
};
use rustc_hash::FxHashSet;

/// Turns the children of a component into slot blocks. A direct child
/// element with a static `slot="name"` attribute fills that slot, a
/// `<svelte:fragment slot="name">` contributes only its children.
/// Everything else goes to the default slot.
pub fn transform_component_slots(ctx: &mut TransformContext<'_>) -> CompileResult<Exits> {
    let e = match &*ctx.node {
        TemplateNode::Element(e) if e.kind == ElementKind::Component => e.clone(),
        _ => return Ok(Exits::new()),
    };
    let mut default_children = vec![];
    let mut named: Vec<(String, Fragment)> = vec![];
    for child in &e.children {
        match slot_name(child) {
            Some((name, child)) => named.push((name.to_string(), slot_content(child))),
            None => default_children.push(child.clone()),
        }
    }

    let mut slots = vec![];
    let mut seen = FxHashSet::default();
    if !default_children.iter().all(TemplateNode::is_whitespace_text) {
        let fragment = Fragment {
            children: default_children,
            location: e.location.clone(),
        };
        seen.insert("default".to_string());
        slots.push(("default".to_string(), fragment));
    }
    for (name, fragment) in named {
        if !seen.insert(name.clone()) {
            return Err(duplicate_slot(&name, &fragment.location));
        }
        slots.push((name, fragment));
    }

    let mut ir_slots = Vec::with_capacity(slots.len());
    for (name, fragment) in slots {
        let block = ctx.create_block(TemplateNode::Fragment(fragment))?;
        ir_slots.push(IRSlot { name, block });
    }
    ctx.slots = ir_slots;
    ctx.replace_node(TemplateNode::Element(e.without_children()));
    Ok(Exits::new())
}

fn slot_name(node: &TemplateNode) -> Option<(&str, &Element)> {
    let e = node.get_element()?;
    e.static_attribute("slot").map(|name| (name, e))
}

fn slot_content(e: &Element) -> Fragment {
    let children = if e.name == "svelte:fragment" {
        e.children.clone()
    } else {
        vec![TemplateNode::Element(e.clone())]
    };
    Fragment {
        children,
        location: e.location.clone(),
    }
}

fn duplicate_slot(name: &str, location: &SourceLocation) -> CompilationError {
    CompilationError::new(ErrorKind::DuplicateSlotName)
        .with_location(location.clone())
        .with_additional_message(name)
}
