use super::{ExitFn, Exits, TransformContext};
use crate::{
    ast::{Element, ElementKind, TemplateNode},
    converter::{build_props, PropsResult},
    error::{CompilationError, CompileResult},
    flags::{BindingTypes, DynamicFlag},
    ir::{CreateComponentIRNode, Operation},
    js::quote,
    normalizer::{normalize_attributes, ElementProp},
    util::{
        camelize, capitalize, escape_attr, get_self_name, is_valid_html_nesting, is_void_tag,
    },
};
use smallvec::smallvec;
use std::mem;
use tracing::debug;

pub fn transform_element(ctx: &mut TransformContext<'_>) -> CompileResult<Exits> {
    let e = match &*ctx.node {
        TemplateNode::Element(e) => e,
        _ => return Ok(Exits::new()),
    };
    match e.kind {
        ElementKind::Regular | ElementKind::Component => {
            Ok(smallvec![post_transform_element as ExitFn])
        }
        ElementKind::SlotOutlet => Ok(Exits::new()),
        ElementKind::Special => {
            let construct = format!("<{}>", e.name);
            Err(CompilationError::not_implemented(&construct, &e.location))
        }
    }
}

// props are built on exit so that children are processed first
fn post_transform_element(ctx: &mut TransformContext<'_>) -> CompileResult<()> {
    let e = match ctx.element() {
        Some(e) => e.clone(),
        None => return Ok(()),
    };
    let props = normalize_attributes(&e.attributes)?;
    if e.is_component() {
        transform_component(ctx, &e, props)
    } else {
        transform_native_element(ctx, &e, props)
    }
}

fn transform_native_element(
    ctx: &mut TransformContext<'_>,
    e: &Element,
    props: Vec<ElementProp>,
) -> CompileResult<()> {
    let mut template = format!("<{}", e.name);
    if let Some(scope_id) = &ctx.options.scope_id {
        template.push(' ');
        template.push_str(scope_id);
    }
    match build_props(e, props, ctx, false)? {
        PropsResult::Dynamic { props, expressions } => {
            let element = ctx.reference();
            ctx.register_effect(expressions, Operation::SetDynamicProps { element, props });
        }
        PropsResult::Static(props) => {
            for prop in props {
                if prop.is_static() {
                    write_static_prop(&mut template, &prop.key.content, &prop.values[0].content);
                    continue;
                }
                let element = ctx.reference();
                let values = prop.values.clone();
                ctx.register_effect(values, Operation::SetProp { element, prop });
            }
        }
    }
    template.push('>');
    if !is_void_tag(&e.name) {
        for child in mem::take(&mut ctx.children_template) {
            template.push_str(&child);
        }
        template.push_str("</");
        template.push_str(&e.name);
        template.push('>');
    }

    let parent_tag = ctx.parent.and_then(|frame| frame.tag);
    match parent_tag {
        // the browser would re-parent it, so it gets its own template
        Some(parent) if !is_valid_html_nesting(parent, &e.name) => {
            debug!(parent, child = %e.name, "invalid html nesting");
            ctx.reference();
            ctx.dynamic.template = Some(ctx.push_template(&template));
            ctx.dynamic.flags |= DynamicFlag::INSERT | DynamicFlag::NON_TEMPLATE;
        }
        _ => ctx.template.push_str(&template),
    }
    Ok(())
}

fn write_static_prop(template: &mut String, key: &str, value: &str) {
    template.push(' ');
    template.push_str(key);
    if !value.is_empty() {
        template.push_str("=\"");
        template.push_str(&escape_attr(value));
        template.push('"');
    }
}

fn transform_component(
    ctx: &mut TransformContext<'_>,
    e: &Element,
    props: Vec<ElementProp>,
) -> CompileResult<()> {
    let (tag, asset) = resolve_component_type(ctx, &e.name);
    if asset {
        ctx.unit.components.insert(tag.clone());
    }
    let props = build_props(e, props, ctx, true)?.into_props();
    ctx.dynamic.flags |= DynamicFlag::INSERT | DynamicFlag::NON_TEMPLATE;
    let id = ctx.reference();
    let slots = mem::take(&mut ctx.slots);
    ctx.register_operation(Operation::CreateComponent(CreateComponentIRNode {
        id,
        tag,
        props,
        slots,
        asset,
    }));
    Ok(())
}

/// Resolved tag of a component, and whether it is a runtime asset.
fn resolve_component_type(ctx: &TransformContext<'_>, tag: &str) -> (String, bool) {
    // 1. template-scope name, e.g. `{#each widgets as Widget}`
    if ctx.unit.is_identifier(tag) {
        return (tag.to_string(), false);
    }
    // 2. setup binding
    if let Some(resolved) = resolve_setup_reference(tag, ctx) {
        return (resolved, false);
    }
    // 3. namespaced, e.g. `Form.Input`
    if let Some((ns, rest)) = tag.split_once('.') {
        if ctx.unit.is_identifier(ns) {
            return (tag.to_string(), false);
        }
        if let Some(resolved) = resolve_setup_reference(ns, ctx) {
            return (format!("{}.{}", resolved, rest), false);
        }
    }
    // 4. self reference
    let self_name = get_self_name(&ctx.options.filename);
    if self_name.as_deref() == Some(tag) {
        return (format!("{}__self", tag), true);
    }
    (tag.to_string(), true)
}

/// Access expression of a setup binding named `name`, trying the name
/// as written, camelized and capitalized.
pub fn resolve_setup_reference(name: &str, ctx: &TransformContext<'_>) -> Option<String> {
    let bindings = &ctx.options.binding_metadata;
    if bindings.is_empty() {
        return None;
    }
    let camel = camelize(name);
    let pascal = capitalize(&camel);
    let variety = |ty: BindingTypes| {
        [name, camel.as_str(), pascal.as_str()]
            .into_iter()
            .find(|n| bindings.get(*n) == Some(&ty))
    };
    let inline = ctx.options.inline;
    if let Some(from_const) = variety(BindingTypes::SetupConst) {
        return Some(if inline {
            from_const.to_string()
        } else {
            format!("$setup[{}]", quote(from_const))
        });
    }
    let from_maybe_ref = variety(BindingTypes::SetupLet)
        .or_else(|| variety(BindingTypes::SetupRef))
        .or_else(|| variety(BindingTypes::SetupMaybeRef));
    from_maybe_ref.map(|maybe_ref| {
        if inline {
            format!("_unref({})", maybe_ref)
        } else {
            format!("$setup[{}]", quote(maybe_ref))
        }
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        compiler::{BindingMetadata, CompileOption},
        ir::BlockIR,
        transformer::CompileUnit,
    };
    use std::rc::Rc;

    fn resolve(option: &CompileOption, tag: &str) -> (String, bool) {
        let node = TemplateNode::default();
        let mut block = BlockIR::new(TemplateNode::default());
        let mut unit = CompileUnit::default();
        let ctx = TransformContext::new_root(&node, &mut block, &mut unit, option);
        resolve_component_type(&ctx, tag)
    }

    fn with_bindings(inline: bool) -> CompileOption {
        let bindings: BindingMetadata = [
            ("FooBar", BindingTypes::SetupConst),
            ("Lazy", BindingTypes::SetupRef),
            ("Form", BindingTypes::SetupConst),
        ]
        .into_iter()
        .collect();
        CompileOption {
            filename: "src/Tree.svelte".into(),
            inline,
            binding_metadata: Rc::new(bindings),
            ..Default::default()
        }
    }

    #[test]
    fn test_resolve_component() {
        let option = with_bindings(false);
        assert_eq!(resolve(&option, "FooBar"), (r#"$setup["FooBar"]"#.into(), false));
        assert_eq!(resolve(&option, "Form.Input"), (r#"$setup["Form"].Input"#.into(), false));
        assert_eq!(resolve(&option, "Tree"), ("Tree__self".into(), true));
        assert_eq!(resolve(&option, "Other"), ("Other".into(), true));
    }

    #[test]
    fn test_resolve_component_inline() {
        let option = with_bindings(true);
        assert_eq!(resolve(&option, "FooBar"), ("FooBar".into(), false));
        assert_eq!(resolve(&option, "Lazy"), ("_unref(Lazy)".into(), false));
    }

    #[test]
    fn test_static_prop_text() {
        let mut t = String::from("<input");
        write_static_prop(&mut t, "disabled", "");
        write_static_prop(&mut t, "title", "say \"hi\"");
        assert_eq!(t, r#"<input disabled title="say &quot;hi&quot;""#);
    }
}
