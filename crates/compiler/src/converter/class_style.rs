use super::{DirectiveTransform, DirectiveTransformResult};
use crate::{
    ast::Element,
    error::{CompilationError as Error, CompilationErrorKind as ErrorKind, CompileResult},
    ir::SimpleExpression,
    js,
    normalizer::BoundDirective,
    transformer::TransformContext,
};

// `class:active={cond}` becomes the object prop `class: { active: cond }`
// which build_props merges with other class values.
pub fn transform_class(
    dir: &BoundDirective,
    _: &Element,
    _: &mut TransformContext<'_>,
) -> CompileResult<Option<DirectiveTransformResult>> {
    toggle_object("class", dir, false).map(Some)
}

// `style:color={c}` becomes `style: { color: c }`.
pub fn transform_style(
    dir: &BoundDirective,
    _: &Element,
    _: &mut TransformContext<'_>,
) -> CompileResult<Option<DirectiveTransformResult>> {
    let important = dir.modifiers.iter().any(|m| m == "important");
    toggle_object("style", dir, important).map(Some)
}

fn toggle_object(
    key: &str,
    dir: &BoundDirective,
    important: bool,
) -> CompileResult<DirectiveTransformResult> {
    let malformed = || {
        Error::new(ErrorKind::MalformedDirectiveValue)
            .with_location(dir.location.clone())
            .with_additional_message(format!("{}:", key))
    };
    let name = dir.static_arg().ok_or_else(malformed)?;
    let exp = dir.exp.as_ref().ok_or_else(malformed)?;
    let mut value = if exp.is_static {
        js::quote(&exp.content)
    } else {
        exp.content.clone()
    };
    if important {
        value = js::concat(&[value, js::quote(" !important")]);
    }
    let value = js::object(&[(name, value)]);
    let key = SimpleExpression::new_static(key, dir.location.clone().with_source(key));
    let value = SimpleExpression::dynamic(value, exp.location.clone());
    Ok(DirectiveTransformResult::new(key, value))
}

pub const V_CLASS: DirectiveTransform = ("class", transform_class);
pub const V_STYLE: DirectiveTransform = ("style", transform_style);
