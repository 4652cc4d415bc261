use super::{DirectiveTransform, DirectiveTransformResult};
use crate::{
    ast::Element,
    error::{CompilationError as Error, CompilationErrorKind as ErrorKind, CompileResult},
    ir::{Operation, SimpleExpression},
    js,
    normalizer::BoundDirective,
    transformer::TransformContext,
};

// `bind:this={el}` and plain `ref` attributes register the element handle.
pub fn transform_template_ref(
    dir: &BoundDirective,
    _: &Element,
    ctx: &mut TransformContext<'_>,
) -> CompileResult<Option<DirectiveTransformResult>> {
    let exp = match &dir.exp {
        Some(exp) => exp,
        None => {
            let error = Error::new(ErrorKind::VBindNoExpression);
            return Err(error.with_location(dir.location.clone()));
        }
    };
    let name = exp.content.trim();
    // a setup binding named by string is resolved by the runtime
    let value = if !exp.is_static && js::is_identifier(name) && !ctx.unit.is_identifier(name) {
        SimpleExpression::new_static(name, exp.location.clone())
    } else {
        ctx.process_expression(exp.clone())?
    };
    let element = ctx.reference();
    let op = Operation::SetTemplateRef {
        element,
        value: value.clone(),
        ref_for: ctx.is_in_for(),
    };
    if value.is_static {
        ctx.register_operation(op);
    } else {
        ctx.register_effect(vec![value], op);
    }
    Ok(None)
}

pub const V_REF: DirectiveTransform = ("ref", transform_template_ref);

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        ast::{ElementKind, TemplateNode},
        compiler::CompileOption,
        ir::BlockIR,
        transformer::CompileUnit,
    };

    fn div() -> Element {
        Element {
            name: "div".into(),
            kind: ElementKind::Regular,
            attributes: vec![],
            children: vec![],
            location: Default::default(),
        }
    }

    fn this(exp: &str) -> BoundDirective {
        BoundDirective {
            name: "ref".into(),
            arg: None,
            exp: Some(SimpleExpression::dynamic(exp, Default::default())),
            modifiers: vec![],
            location: Default::default(),
        }
    }

    #[test]
    fn test_static_ref() {
        let node = TemplateNode::default();
        let option = CompileOption::default();
        let mut block = BlockIR::new(TemplateNode::default());
        let mut unit = CompileUnit::default();
        let mut ctx = TransformContext::new_root(&node, &mut block, &mut unit, &option);
        transform_template_ref(&this("input"), &div(), &mut ctx).unwrap();
        match &block.operations[0] {
            Operation::SetTemplateRef { value, ref_for, .. } => {
                assert!(value.is_static);
                assert_eq!(value.content, "input");
                assert!(!ref_for);
            }
            op => panic!("unexpected operation {:?}", op),
        }
    }

    #[test]
    fn test_dynamic_ref() {
        let node = TemplateNode::default();
        let option = CompileOption::default();
        let mut block = BlockIR::new(TemplateNode::default());
        let mut unit = CompileUnit::default();
        let mut ctx = TransformContext::new_root(&node, &mut block, &mut unit, &option);
        transform_template_ref(&this("refs.input"), &div(), &mut ctx).unwrap();
        assert!(block.operations.is_empty());
        assert_eq!(block.effects.len(), 1);
    }
}
