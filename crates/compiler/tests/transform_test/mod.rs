use super::common::*;
use super::templates;
use compiler::compiler::{BindingMetadata, CompileOption, WhitespaceStrategy};
use compiler::flags::{BindingTypes, DynamicFlag};
use compiler::ir::{IfNegative, Operation};
use insta::assert_snapshot;
use std::rc::Rc;
use vapor_compiler_core as compiler;

#[test]
fn test_text_only_root() {
    let ir = base_compile(vec![text("hello world")]);
    assert_snapshot!(templates(&ir), @"hello world");
    assert_eq!(ir.block.returns, [1]);
}

#[test]
fn test_set_text() {
    let p = el("p", vec![], vec![text("Hello "), mustache("name"), text("!")]);
    let ir = base_compile(vec![p]);
    assert_snapshot!(templates(&ir), @"<p></p>");
    let effect = &ir.block.effects[0];
    assert_eq!(effect.expressions[0].content, "name");
    match &effect.operations[0] {
        Operation::SetText { element, values } => {
            assert_eq!(*element, 1);
            let values: Vec<_> = values.iter().map(|v| v.content.as_str()).collect();
            assert_eq!(values, ["Hello ", "name", "!"]);
        }
        op => panic!("unexpected operation {:?}", op),
    }
}

#[test]
fn test_literal_text_is_inlined() {
    let p = el("p", vec![], vec![mustache(r#""fixed""#)]);
    let ir = base_compile(vec![p]);
    assert_snapshot!(templates(&ir), @"<p>fixed</p>");
    assert!(ir.block.effects.is_empty());
}

#[test]
fn test_markup_in_text_is_escaped() {
    let div = el("div", vec![], vec![text("1 < 2 <b>x</b> & more")]);
    let ir = base_compile(vec![div]);
    assert_snapshot!(templates(&ir), @"<div>1 &lt; 2 &lt;b&gt;x&lt;/b&gt; &amp; more</div>");

    let p = el("p", vec![], vec![mustache(r#""<img src=x>""#)]);
    let ir = base_compile(vec![p]);
    assert_snapshot!(templates(&ir), @"<p>&lt;img src=x&gt;</p>");
    assert!(ir.block.effects.is_empty());

    let div = el("div", vec![attr("title", r#"a "b" & <c>"#)], vec![]);
    let ir = base_compile(vec![div]);
    assert_snapshot!(templates(&ir), @r#"<div title="a &quot;b&quot; &amp; <c>"></div>"#);
}

#[test]
fn test_set_html() {
    let div = el("div", vec![], vec![raw_html("content")]);
    let ir = base_compile(vec![div]);
    assert_snapshot!(templates(&ir), @"<div></div>");
    assert!(matches!(
        &ir.block.effects[0].operations[0],
        Operation::SetHtml { element: 1, value } if value.content == "content"
    ));
}

#[test]
fn test_insert_with_anchor() {
    let div = el(
        "div",
        vec![],
        vec![el("span", vec![], vec![]), mustache("msg"), el("b", vec![], vec![])],
    );
    let ir = base_compile(vec![div]);
    assert_snapshot!(templates(&ir), @"<div><span></span><!><b></b></div>");
    let ops = &ir.block.operations;
    assert!(matches!(&ops[0], Operation::CreateTextNode { id: 1, effect: true, .. }));
    assert!(matches!(
        &ops[1],
        Operation::InsertNode { elements, parent: 3, anchor: Some(2) } if elements == &[1]
    ));
    let children = &ir.block.dynamic.children[0].children;
    assert_eq!(children[1].anchor, Some(2));
    assert!(!children[1].flags.contains(DynamicFlag::NON_TEMPLATE));
}

#[test]
fn test_prepend_and_append() {
    let div = el("div", vec![], vec![mustache("a"), el("span", vec![], vec![])]);
    let ir = base_compile(vec![div]);
    assert_snapshot!(templates(&ir), @"<div><span></span></div>");
    assert!(matches!(
        &ir.block.operations[1],
        Operation::PrependNode { elements, parent: 2 } if elements == &[1]
    ));

    let div = el("div", vec![], vec![el("span", vec![], vec![]), mustache("a")]);
    let ir = base_compile(vec![div]);
    assert!(matches!(
        &ir.block.operations[1],
        Operation::InsertNode { anchor: None, .. }
    ));
}

#[test]
fn test_text_run_is_merged() {
    let div = el(
        "div",
        vec![],
        vec![el("i", vec![], vec![]), mustache("a"), text(" and "), mustache("b")],
    );
    let ir = base_compile(vec![div]);
    match &ir.block.operations[0] {
        Operation::CreateTextNode { values, .. } => assert_eq!(values.len(), 3),
        op => panic!("unexpected operation {:?}", op),
    }
    let children = &ir.block.dynamic.children[0].children;
    assert!(children[2].flags.contains(DynamicFlag::NON_TEMPLATE));
    assert!(children[3].flags.contains(DynamicFlag::NON_TEMPLATE));
}

#[test]
fn test_invalid_nesting() {
    let p = el("p", vec![], vec![el("div", vec![], vec![])]);
    let ir = base_compile(vec![p]);
    assert_snapshot!(templates(&ir), @r###"
    <div></div>
    <p></p>
    "###);
    assert!(matches!(
        &ir.block.operations[0],
        Operation::InsertNode { elements, parent: 2, anchor: None } if elements == &[1]
    ));
}

#[test]
fn test_template_dedup() {
    let item = || el("li", vec![], vec![text("x")]);
    let ir = base_compile(vec![item(), item(), el("hr", vec![], vec![])]);
    assert_snapshot!(templates(&ir), @r###"
    <li>x</li>
    <hr>
    "###);
    let children = &ir.block.dynamic.children;
    assert_eq!(children[0].template, Some(0));
    assert_eq!(children[1].template, Some(0));
    assert_eq!(ir.block.returns, [1, 2, 3]);
}

#[test]
fn test_whitespace() {
    let tree = || {
        vec![
            text("\n  "),
            el("div", vec![], vec![text("  a  b ")]),
            text("\n  "),
            el("pre", vec![], vec![text(" keep  ")]),
            text("\n"),
        ]
    };
    let ir = base_compile(tree());
    assert_snapshot!(templates(&ir), @r###"
    <div> a b </div>
    <pre> keep  </pre>
    "###);
    let option = CompileOption {
        whitespace: WhitespaceStrategy::Preserve,
        ..Default::default()
    };
    let ir = compile_with(tree(), &option).unwrap();
    assert_eq!(ir.template.len(), 4);
}

#[test]
fn test_comments() {
    let ir = base_compile(vec![comment(" note "), el("i", vec![], vec![])]);
    assert_snapshot!(templates(&ir), @r###"
    <!-- note -->
    <i></i>
    "###);
    let option = CompileOption {
        comments: false,
        ..Default::default()
    };
    let ir = compile_with(vec![comment(" note "), el("i", vec![], vec![])], &option).unwrap();
    assert_snapshot!(templates(&ir), @"<i></i>");
}

#[test]
fn test_if_chain() {
    let tree = vec![if_block(
        "a",
        vec![el("p", vec![], vec![text("A")])],
        Some(vec![else_if(
            "b",
            vec![el("p", vec![], vec![text("B")])],
            Some(vec![el("p", vec![], vec![text("C")])]),
        )]),
    )];
    let ir = base_compile(tree);
    assert_snapshot!(templates(&ir), @r###"
    <p>A</p>
    <p>B</p>
    <p>C</p>
    "###);
    assert_eq!(ir.block.returns, [1]);
    let if_node = match &ir.block.operations[0] {
        Operation::If(n) => n,
        op => panic!("unexpected operation {:?}", op),
    };
    assert_eq!(if_node.id, 1);
    assert_eq!(if_node.condition.content, "a");
    assert_eq!(if_node.positive.returns.len(), 1);
    let nested = match &if_node.negative {
        Some(IfNegative::If(n)) => n,
        other => panic!("expect else-if, got {:?}", other),
    };
    assert_eq!(nested.condition.content, "b");
    assert!(nested.id > if_node.id);
    assert!(matches!(&nested.negative, Some(IfNegative::Block(b)) if b.returns.len() == 1));
}

#[test]
fn test_each_scope() {
    let option = CompileOption {
        prefix_identifiers: true,
        ..Default::default()
    };
    let li = el("li", vec![], vec![mustache("item.name")]);
    let tree = vec![
        each_block("items", "item", Some("i"), Some("item.id"), vec![li]),
        el("p", vec![], vec![mustache("item")]),
    ];
    let ir = compile_with(tree, &option).unwrap();
    let for_node = match &ir.block.operations[0] {
        Operation::For(n) => n,
        op => panic!("unexpected operation {:?}", op),
    };
    assert_eq!(for_node.source.content, "_ctx.items");
    assert_eq!(for_node.value.content, "item");
    assert_eq!(for_node.index.as_ref().map(|i| i.content.as_str()), Some("i"));
    assert_eq!(for_node.key_prop.as_ref().map(|k| k.content.as_str()), Some("item.id"));
    let render = &for_node.render;
    assert_eq!(render.effects[0].expressions[0].content, "item.name");
    // the loop variable is out of scope after the block
    assert_eq!(ir.block.effects[0].expressions[0].content, "_ctx.item");
}

#[test]
fn test_ref_in_each() {
    let div = el(
        "div",
        vec![directive(compiler::ast::DirectiveKind::Binding, "this", Some("rows"))],
        vec![],
    );
    let ir = base_compile(vec![each_block("list", "x", None, None, vec![div])]);
    let for_node = match &ir.block.operations[0] {
        Operation::For(n) => n,
        op => panic!("unexpected operation {:?}", op),
    };
    assert!(matches!(
        &for_node.render.operations[0],
        Operation::SetTemplateRef { ref_for: true, .. }
    ));
}

#[test]
fn test_component_slots() {
    let card = el(
        "Card",
        vec![],
        vec![
            el("h1", vec![attr("slot", "title")], vec![text("T")]),
            el("p", vec![], vec![text("body")]),
        ],
    );
    let ir = base_compile(vec![card]);
    assert_snapshot!(templates(&ir), @r###"
    <p>body</p>
    <h1>T</h1>
    "###);
    let component = match &ir.block.operations[0] {
        Operation::CreateComponent(c) => c,
        op => panic!("unexpected operation {:?}", op),
    };
    let names: Vec<_> = component.slots.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["default", "title"]);
    assert!(component.props.is_empty());
}

#[test]
fn test_component_resolution() {
    let bindings: BindingMetadata = [("Child", BindingTypes::SetupConst)].into_iter().collect();
    let option = CompileOption {
        filename: "components/Tree.svelte".into(),
        binding_metadata: Rc::new(bindings),
        ..Default::default()
    };
    let tree = vec![el("Child", vec![], vec![]), el("Tree", vec![], vec![])];
    let ir = compile_with(tree, &option).unwrap();
    let tags: Vec<_> = ir
        .block
        .operations
        .iter()
        .filter_map(|op| match op {
            Operation::CreateComponent(c) => Some((c.tag.as_str(), c.asset)),
            _ => None,
        })
        .collect();
    assert_eq!(tags, [(r#"$setup["Child"]"#, false), ("Tree__self", true)]);
    assert!(ir.components.contains("Tree__self"));
    assert_eq!(ir.components.len(), 1);
}

#[test]
fn test_slot_outlet() {
    let slot = el(
        "slot",
        vec![attr("name", "footer"), attr_expr("count", "n")],
        vec![text("fallback")],
    );
    let ir = base_compile(vec![slot]);
    let outlet = match &ir.block.operations[0] {
        Operation::SlotOutlet(s) => s,
        op => panic!("unexpected operation {:?}", op),
    };
    assert_eq!(outlet.name.content, "footer");
    assert_eq!(outlet.props.len(), 1);
    assert!(outlet.fallback.is_some());
    assert_snapshot!(templates(&ir), @"fallback");
}

#[test]
fn test_constant_interpolation_needs_no_effect() {
    let div = el("div", vec![], vec![el("i", vec![], vec![]), mustache("1 + 2")]);
    let ir = base_compile(vec![div]);
    assert!(matches!(
        &ir.block.operations[0],
        Operation::CreateTextNode { effect: false, .. }
    ));
}

#[test]
fn test_destructured_each_context() {
    let option = CompileOption {
        prefix_identifiers: true,
        ..Default::default()
    };
    let li = el("li", vec![], vec![mustache("id + label + rest.length + other")]);
    let tree = vec![each_block("rows", "{ id, info: { label }, ...rest }", None, None, vec![li])];
    let ir = compile_with(tree, &option).unwrap();
    let for_node = match &ir.block.operations[0] {
        Operation::For(n) => n,
        op => panic!("unexpected operation {:?}", op),
    };
    assert_eq!(for_node.value.content, "{ id, info: { label }, ...rest }");
    let render = &for_node.render;
    assert_eq!(
        render.effects[0].expressions[0].content,
        "id + label + rest.length + _ctx.other"
    );
}
