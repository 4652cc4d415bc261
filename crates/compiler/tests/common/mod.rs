use compiler::ast::{
    Attribute, AttributeChunk, AttributeNode, AttributeValue, Comment, Directive, DirectiveKind,
    EachBlock, Element, ElementKind, Expression, Fragment, IfBlock, Spread, TemplateNode, TextNode,
};
use compiler::compiler::{compile, CompileOption};
use compiler::ir::RootIR;
use compiler::CompileResult;
use vapor_compiler_core as compiler;

pub fn exp(e: &str) -> Expression {
    Expression::from(e)
}

pub fn text(s: &str) -> TemplateNode {
    TemplateNode::Text(text_node(s))
}

fn text_node(s: &str) -> TextNode {
    TextNode {
        data: s.into(),
        raw: s.into(),
        location: Default::default(),
    }
}

pub fn comment(s: &str) -> TemplateNode {
    TemplateNode::Comment(Comment {
        data: s.into(),
        location: Default::default(),
    })
}

pub fn mustache(e: &str) -> TemplateNode {
    TemplateNode::MustacheTag(exp(e))
}

pub fn raw_html(e: &str) -> TemplateNode {
    TemplateNode::RawMustacheTag(exp(e))
}

pub fn el(
    name: &str,
    attributes: Vec<AttributeNode>,
    children: Vec<TemplateNode>,
) -> TemplateNode {
    TemplateNode::Element(Element {
        name: name.into(),
        kind: ElementKind::from_tag(name),
        attributes,
        children,
        location: Default::default(),
    })
}

pub fn attr(name: &str, value: &str) -> AttributeNode {
    let chunk = AttributeChunk::Text(text_node(value));
    attr_chunks(name, vec![chunk])
}

pub fn bool_attr(name: &str) -> AttributeNode {
    AttributeNode::Attribute(Attribute {
        name: name.into(),
        value: AttributeValue::Boolean,
        location: Default::default(),
    })
}

pub fn attr_expr(name: &str, e: &str) -> AttributeNode {
    attr_chunks(name, vec![AttributeChunk::Mustache(exp(e))])
}

/// `name="page/{p}"`: text parts and expressions in order
pub fn attr_interpolated(name: &str, parts: Vec<Result<&str, &str>>) -> AttributeNode {
    let chunks = parts
        .into_iter()
        .map(|part| match part {
            Ok(s) => AttributeChunk::Text(text_node(s)),
            Err(e) => AttributeChunk::Mustache(exp(e)),
        })
        .collect();
    attr_chunks(name, chunks)
}

fn attr_chunks(name: &str, chunks: Vec<AttributeChunk>) -> AttributeNode {
    AttributeNode::Attribute(Attribute {
        name: name.into(),
        value: AttributeValue::Chunks(chunks),
        location: Default::default(),
    })
}

pub fn spread(e: &str) -> AttributeNode {
    AttributeNode::Spread(Spread {
        expression: exp(e),
        location: Default::default(),
    })
}

pub fn directive(kind: DirectiveKind, name: &str, value: Option<&str>) -> AttributeNode {
    let value = match value {
        Some(e) => AttributeValue::Chunks(vec![AttributeChunk::Mustache(exp(e))]),
        None => AttributeValue::Boolean,
    };
    AttributeNode::Directive(Directive {
        kind,
        name: name.into(),
        modifiers: vec![],
        value,
        location: Default::default(),
    })
}

pub fn if_block(
    test: &str,
    consequent: Vec<TemplateNode>,
    alternate: Option<Vec<TemplateNode>>,
) -> TemplateNode {
    TemplateNode::IfBlock(if_node(test, consequent, alternate))
}

/// `{:else if}` branch, to be placed alone in an alternate
pub fn else_if(
    test: &str,
    consequent: Vec<TemplateNode>,
    alternate: Option<Vec<TemplateNode>>,
) -> TemplateNode {
    let mut b = if_node(test, consequent, alternate);
    b.elseif = true;
    TemplateNode::IfBlock(b)
}

fn if_node(
    test: &str,
    consequent: Vec<TemplateNode>,
    alternate: Option<Vec<TemplateNode>>,
) -> IfBlock {
    IfBlock {
        test: exp(test),
        consequent: Fragment::new(consequent),
        alternate: alternate.map(Fragment::new),
        elseif: false,
        location: Default::default(),
    }
}

pub fn each_block(
    source: &str,
    context: &str,
    index: Option<&str>,
    key: Option<&str>,
    children: Vec<TemplateNode>,
) -> TemplateNode {
    TemplateNode::EachBlock(EachBlock {
        expression: exp(source),
        context: context.into(),
        index: index.map(String::from),
        key: key.map(exp),
        children: Fragment::new(children),
        fallback: None,
        location: Default::default(),
    })
}

pub fn compile_with(
    children: Vec<TemplateNode>,
    option: &CompileOption,
) -> CompileResult<RootIR> {
    compile(&Fragment::new(children), option)
}

pub fn base_compile(children: Vec<TemplateNode>) -> RootIR {
    compile_with(children, &CompileOption::default()).expect("template should compile")
}
