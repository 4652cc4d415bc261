use super::common::*;
use super::templates;
use compiler::ast::DirectiveKind;
use compiler::compiler::CompileOption;
use compiler::ir::{IRProps, Operation};
use insta::assert_snapshot;
use vapor_compiler_core as compiler;

#[test]
fn test_static_element() {
    let ir = base_compile(vec![el("div", vec![attr("id", "app")], vec![])]);
    assert_snapshot!(templates(&ir), @r###"<div id="app"></div>"###);
    assert!(ir.block.effects.is_empty());
    assert!(ir.block.operations.is_empty());
    assert_eq!(ir.block.returns, [1]);
}

#[test]
fn test_static_partition() {
    let attrs = vec![attr("class", "a"), bool_attr("hidden"), attr("title", "x")];
    let ir = base_compile(vec![el("span", attrs, vec![text("hi")])]);
    assert_snapshot!(templates(&ir), @r###"<span class="a" hidden title="x">hi</span>"###);
    assert!(ir.block.effects.is_empty());
}

#[test]
fn test_interpolated_attribute() {
    let href = attr_interpolated("href", vec![Ok("page/"), Err("p")]);
    let ir = base_compile(vec![el("a", vec![href], vec![])]);
    assert_snapshot!(templates(&ir), @"<a></a>");
    let effect = &ir.block.effects[0];
    assert_eq!(effect.expressions.len(), 1);
    match &effect.operations[0] {
        Operation::SetProp { element, prop } => {
            assert_eq!(*element, 1);
            assert!(prop.key.is_static);
            assert_eq!(prop.key.content, "href");
            assert!(!prop.values[0].is_static);
            assert_eq!(prop.values[0].content, r#""page/" + p"#);
        }
        op => panic!("unexpected operation {:?}", op),
    }
}

#[test]
fn test_component_object_bind() {
    let ir = base_compile(vec![el("Widget", vec![spread("things")], vec![])]);
    assert!(ir.template.is_empty());
    assert!(ir.components.contains("Widget"));
    let component = match &ir.block.operations[0] {
        Operation::CreateComponent(c) => c,
        op => panic!("unexpected operation {:?}", op),
    };
    assert_eq!(component.tag, "Widget");
    assert!(component.asset);
    assert_eq!(component.props.len(), 1);
    assert!(matches!(
        &component.props[0],
        IRProps::Dynamic { value, handler: false } if value.content == "things"
    ));
}

#[test]
fn test_merge_class_and_style() {
    let attrs = vec![
        attr("class", "a"),
        directive(DirectiveKind::Class, "active", Some("on")),
        attr("style", "color: red"),
        directive(DirectiveKind::StyleDirective, "width", Some("w")),
    ];
    let ir = base_compile(vec![el("div", attrs, vec![])]);
    assert_snapshot!(templates(&ir), @"<div></div>");
    let effects = &ir.block.effects;
    assert_eq!(effects.len(), 2);
    let class = match &effects[0].operations[0] {
        Operation::SetProp { prop, .. } => prop,
        op => panic!("unexpected operation {:?}", op),
    };
    let values: Vec<_> = class.values.iter().map(|v| v.content.as_str()).collect();
    assert_eq!(values, ["a", "{ active: on }"]);
    // the static part of the merged value is not a dependency
    assert_eq!(effects[0].expressions.len(), 1);
    assert_eq!(effects[1].expressions[0].content, "{ width: w }");
}

#[test]
fn test_dynamic_props_fallback() {
    let attrs = vec![attr("id", "a"), spread("rest"), attr_expr("title", "t")];
    let ir = base_compile(vec![el("div", attrs, vec![])]);
    assert_snapshot!(templates(&ir), @"<div></div>");
    match &ir.block.effects[0].operations[0] {
        Operation::SetDynamicProps { props, .. } => {
            assert_eq!(props.len(), 3);
            assert!(matches!(&props[0], IRProps::Static(p) if p[0].key.content == "id"));
            assert!(matches!(&props[1], IRProps::Dynamic { .. }));
            assert!(matches!(&props[2], IRProps::Static(p) if p[0].key.content == "title"));
        }
        op => panic!("unexpected operation {:?}", op),
    }
}

#[test]
fn test_event_and_ref() {
    let attrs = vec![
        directive(DirectiveKind::EventHandler, "click", Some("inc")),
        directive(DirectiveKind::Binding, "this", Some("button")),
    ];
    let ir = base_compile(vec![el("button", attrs, vec![text("+")])]);
    assert_snapshot!(templates(&ir), @"<button>+</button>");
    assert!(ir.block.effects.is_empty());
    let ops = &ir.block.operations;
    assert_eq!(ops.len(), 2);
    assert!(matches!(
        &ops[0],
        Operation::SetEvent { element: 1, key, .. } if key.content == "click"
    ));
    assert!(matches!(
        &ops[1],
        Operation::SetTemplateRef { element: 1, value, ref_for: false } if value.content == "button"
    ));
}

#[test]
fn test_model_on_input() {
    let attrs = vec![
        attr("type", "checkbox"),
        directive(DirectiveKind::Binding, "checked", Some("done")),
    ];
    let ir = base_compile(vec![el("input", attrs, vec![])]);
    assert_snapshot!(templates(&ir), @r###"<input type="checkbox">"###);
    match &ir.block.operations[0] {
        Operation::WithDirective(d) => {
            assert_eq!(d.name, "model");
            assert_eq!(d.model_type, Some(compiler::ir::ModelType::Checkbox));
        }
        op => panic!("unexpected operation {:?}", op),
    }
}

#[test]
fn test_custom_action() {
    let attrs = vec![directive(DirectiveKind::Action, "tooltip", Some("opts"))];
    let ir = base_compile(vec![el("div", attrs, vec![])]);
    assert!(ir.directives.contains("tooltip"));
    assert!(matches!(&ir.block.operations[0], Operation::WithDirective(d) if !d.builtin));
}

#[test]
fn test_scope_id() {
    let option = CompileOption {
        scope_id: Some("data-v-7ba5bd90".into()),
        ..Default::default()
    };
    let ir = compile_with(vec![el("p", vec![attr("id", "x")], vec![])], &option).unwrap();
    assert_snapshot!(templates(&ir), @r###"<p data-v-7ba5bd90 id="x"></p>"###);
}

#[test]
fn test_idempotent_compile() {
    let tree = || {
        vec![el(
            "div",
            vec![attr("class", "a"), directive(DirectiveKind::Class, "b", Some("b"))],
            vec![mustache("msg")],
        )]
    };
    let first = base_compile(tree());
    let second = base_compile(tree());
    assert_eq!(first.template, second.template);
    assert_eq!(first.block.effects, second.block.effects);
    assert_eq!(first.block.operations, second.block.operations);
}
