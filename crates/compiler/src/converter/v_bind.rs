use super::{DirectiveTransform, DirectiveTransformResult};
use crate::{
    ast::Element,
    error::{CompilationError as Error, CompilationErrorKind as ErrorKind, CompileResult},
    ir::{PropModifier, SimpleExpression},
    normalizer::BoundDirective,
    transformer::TransformContext,
    util::{camelize, is_reserved_prop},
};

// this module processes bind with an argument, e.g. `href={url}`.
// argument-less binds are object spreads and handled by build_props.
pub fn transform_v_bind(
    dir: &BoundDirective,
    _: &Element,
    _: &mut TransformContext<'_>,
) -> CompileResult<Option<DirectiveTransformResult>> {
    let BoundDirective {
        arg,
        exp,
        modifiers,
        location,
        ..
    } = dir;
    let arg = match arg {
        Some(arg) => arg,
        None => return Ok(None),
    };
    let exp = match exp {
        Some(exp) => exp.clone(),
        None => {
            let error = Error::new(ErrorKind::VBindNoExpression);
            return Err(error.with_location(location.clone()));
        }
    };
    if arg.is_static && is_reserved_prop(&arg.content) {
        return Ok(None);
    }
    let mut key = arg.clone();
    let mut runtime_camelize = false;
    if modifiers.iter().any(|m| m == "camel") {
        if key.is_static {
            key = SimpleExpression::new_static(camelize(&key.content), key.location);
        } else {
            runtime_camelize = true;
        }
    }
    let modifier = if modifiers.iter().any(|m| m == "prop") {
        Some(PropModifier::Prop)
    } else if modifiers.iter().any(|m| m == "attr") {
        Some(PropModifier::Attr)
    } else {
        None
    };
    let mut result = DirectiveTransformResult::new(key, exp);
    result.modifier = modifier;
    result.runtime_camelize = runtime_camelize;
    Ok(Some(result))
}

pub const V_BIND: DirectiveTransform = ("bind", transform_v_bind);
