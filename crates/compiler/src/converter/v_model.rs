use super::{DirectiveTransform, DirectiveTransformResult};
use crate::{
    ast::{Element, ElementKind},
    error::{CompilationError as Error, CompilationErrorKind as ErrorKind, CompileResult},
    ir::{ModelType, Operation, SimpleExpression, WithDirectiveIRNode},
    js,
    normalizer::BoundDirective,
    transformer::TransformContext,
};

// two-way binding, `bind:value={x}` on form elements and components.
pub fn transform_v_model(
    dir: &BoundDirective,
    e: &Element,
    ctx: &mut TransformContext<'_>,
) -> CompileResult<Option<DirectiveTransformResult>> {
    let exp = match &dir.exp {
        Some(exp) => exp,
        None => {
            let error = Error::new(ErrorKind::VModelNoExpression);
            return Err(error.with_location(dir.location.clone()));
        }
    };
    if !is_member_expression(exp) {
        let error = Error::new(ErrorKind::VModelMalformedExpression);
        return Err(error.with_location(exp.location.clone()));
    }

    if e.kind == ElementKind::Component {
        let key = dir
            .arg
            .clone()
            .unwrap_or_else(|| SimpleExpression::new_static("modelValue", dir.location.clone()));
        let mut result = DirectiveTransformResult::new(key, exp.clone());
        result.model = true;
        result.model_modifiers = dir.modifiers.clone();
        return Ok(Some(result));
    }

    let model_type = resolve_model_type(e)?;
    let mut dir = dir.clone();
    dir.exp = dir.exp.map(|exp| ctx.process_expression(exp)).transpose()?;
    let element = ctx.reference();
    ctx.register_operation(Operation::WithDirective(WithDirectiveIRNode {
        element,
        name: "model".into(),
        dir,
        builtin: true,
        asset: false,
        model_type: Some(model_type),
    }));
    Ok(None)
}

fn is_member_expression(exp: &SimpleExpression) -> bool {
    !exp.is_static && js::is_member_or_identifier(&exp.content)
}

fn resolve_model_type(e: &Element) -> CompileResult<ModelType> {
    let model_type = match e.name.as_str() {
        "input" => {
            if e.has_spread() {
                return Ok(ModelType::Dynamic);
            }
            match e.static_attribute("type") {
                Some("radio") => ModelType::Radio,
                Some("checkbox") => ModelType::Checkbox,
                Some("file") => {
                    let error = Error::new(ErrorKind::VModelOnFileInput);
                    return Err(error.with_location(e.location.clone()));
                }
                Some(_) => ModelType::Text,
                // type={t} can only be resolved at runtime
                None if e.has_attribute("type") => ModelType::Dynamic,
                None => ModelType::Text,
            }
        }
        "select" => ModelType::Select,
        "textarea" => ModelType::Text,
        _ => {
            let error = Error::new(ErrorKind::VModelOnInvalidElement);
            return Err(error.with_location(e.location.clone()));
        }
    };
    Ok(model_type)
}

pub const V_MODEL: DirectiveTransform = ("model", transform_v_model);
