use super::{DirectiveTransform, DirectiveTransformResult};
use crate::{
    ast::{Element, ElementKind},
    error::{CompilationError as Error, CompilationErrorKind as ErrorKind, CompileResult},
    ir::{EventModifiers, Operation, SimpleExpression},
    normalizer::BoundDirective,
    transformer::TransformContext,
    util::to_handler_key,
    SourceLocation,
};

// passed to addEventListener as options
const OPTION_MODIFIERS: &[&str] = &["once", "capture", "passive", "nonpassive"];
// checked inside the wrapped handler
const NON_KEY_MODIFIERS: &[&str] = &[
    "preventDefault",
    "stopPropagation",
    "stopImmediatePropagation",
    "self",
    "trusted",
];

// this module processes `on:event|modifiers={handler}`.
pub fn transform_v_on(
    dir: &BoundDirective,
    e: &Element,
    ctx: &mut TransformContext<'_>,
) -> CompileResult<Option<DirectiveTransformResult>> {
    let BoundDirective {
        arg,
        exp,
        modifiers,
        location,
        ..
    } = dir;
    let no_expression = || Error::new(ErrorKind::VOnNoExpression).with_location(location.clone());
    let arg = match arg {
        Some(arg) => arg,
        None => return Err(no_expression()),
    };
    // allow on:click|preventDefault without a handler
    if exp.is_none() && modifiers.is_empty() {
        return Err(no_expression());
    }
    let modifiers = resolve_modifiers(modifiers, location)?;

    if matches!(e.kind, ElementKind::Component | ElementKind::SlotOutlet) {
        let key = if arg.is_static {
            SimpleExpression::new_static(to_handler_key(&arg.content), arg.location.clone())
        } else {
            arg.clone()
        };
        let value = exp
            .clone()
            .unwrap_or_else(|| SimpleExpression::dynamic("() => undefined", location.clone()));
        let mut result = DirectiveTransformResult::new(key, value);
        result.handler = true;
        return Ok(Some(result));
    }

    let element = ctx.reference();
    let value = exp.clone().map(|exp| ctx.process_expression(exp)).transpose()?;
    let key = if arg.is_static {
        arg.clone()
    } else {
        ctx.process_expression(arg.clone())?
    };
    let effect = !key.is_static;
    let op = Operation::SetEvent {
        element,
        key: key.clone(),
        value,
        modifiers,
        effect,
    };
    if effect {
        ctx.register_effect(vec![key], op);
    } else {
        ctx.register_operation(op);
    }
    Ok(None)
}

fn resolve_modifiers(
    modifiers: &[String],
    location: &SourceLocation,
) -> CompileResult<EventModifiers> {
    let mut resolved = EventModifiers::default();
    for modifier in modifiers {
        if OPTION_MODIFIERS.contains(&modifier.as_str()) {
            resolved.options.push(modifier.clone());
        } else if NON_KEY_MODIFIERS.contains(&modifier.as_str()) {
            resolved.non_keys.push(modifier.clone());
        } else {
            let error = Error::new(ErrorKind::InvalidEventModifier)
                .with_location(location.clone())
                .with_additional_message(modifier.as_str());
            return Err(error);
        }
    }
    Ok(resolved)
}

pub const V_ON: DirectiveTransform = ("on", transform_v_on);
