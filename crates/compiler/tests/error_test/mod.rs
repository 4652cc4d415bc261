use super::common::*;
use compiler::ast::{AwaitBlock, DirectiveKind, TemplateNode};
use compiler::compiler::CompileOption;
use compiler::CompilationErrorKind as ErrorKind;
use vapor_compiler_core as compiler;

fn compile_err(children: Vec<TemplateNode>) -> compiler::CompilationError {
    compile_with(children, &CompileOption::default()).unwrap_err()
}

#[test]
fn test_unsupported_constructs() {
    let transition = directive(DirectiveKind::Transition, "fade", None);
    let err = compile_err(vec![el("div", vec![transition], vec![])]);
    assert_eq!(err.kind, ErrorKind::NotImplemented);
    assert_eq!(err.to_string(), "Not implemented: transition:fade");

    let await_block = TemplateNode::AwaitBlock(AwaitBlock {
        expression: exp("promise"),
        location: Default::default(),
    });
    let err = compile_err(vec![await_block]);
    assert_eq!(err.to_string(), "Not implemented: {#await} block");

    let err = compile_err(vec![el("svelte:window", vec![], vec![])]);
    assert_eq!(err.to_string(), "Not implemented: <svelte:window>");

    let div = el("div", vec![], vec![el("i", vec![], vec![]), raw_html("x")]);
    let err = compile_err(vec![div]);
    assert_eq!(err.kind, ErrorKind::NotImplemented);
}

#[test]
fn test_duplicate_slot() {
    let card = el(
        "Card",
        vec![],
        vec![
            el("h1", vec![attr("slot", "title")], vec![]),
            el("h2", vec![attr("slot", "title")], vec![]),
        ],
    );
    let err = compile_err(vec![card]);
    assert_eq!(err.kind, ErrorKind::DuplicateSlotName);
    assert_eq!(err.to_string(), "Duplicate slot names found: title");
}

#[test]
fn test_model_errors() {
    let model = |e| directive(DirectiveKind::Binding, "value", Some(e));
    let err = compile_err(vec![el("div", vec![model("x")], vec![])]);
    assert_eq!(err.kind, ErrorKind::VModelOnInvalidElement);

    let file = vec![attr("type", "file"), model("x")];
    let err = compile_err(vec![el("input", file, vec![])]);
    assert_eq!(err.kind, ErrorKind::VModelOnFileInput);

    let err = compile_err(vec![el("input", vec![model("get()")], vec![])]);
    assert_eq!(err.kind, ErrorKind::VModelMalformedExpression);
}

#[test]
fn test_unparsable_expression() {
    let option = CompileOption {
        prefix_identifiers: true,
        ..Default::default()
    };
    let p = el("p", vec![], vec![mustache("count +")]);
    let err = compile_with(vec![p], &option).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidExpression);
    assert_eq!(err.to_string(), "Error parsing JavaScript expression: count +");

    let tree = vec![each_block("rows", "{ id", None, None, vec![])];
    let err = compile_with(tree, &CompileOption::default()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidExpression);
}

#[test]
fn test_error_inside_block_propagates() {
    let bad = el("div", vec![directive(DirectiveKind::Animation, "flip", None)], vec![]);
    let err = compile_err(vec![if_block("ok", vec![bad], None)]);
    assert_eq!(err.to_string(), "Not implemented: animate:flip");
}

#[test]
fn test_ssr_rejected() {
    let option = CompileOption {
        ssr: true,
        ..Default::default()
    };
    let err = compile_with(vec![text("x")], &option).unwrap_err();
    assert_eq!(err.kind, ErrorKind::SsrNotSupported);
}
