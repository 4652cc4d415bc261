//! Which tags may be rendered inside which, following the HTML parsing
//! rules a browser applies when it builds a template's content.
//! A child that fails the check cannot live in its parent's literal
//! template text and has to be inserted at runtime.

use phf::{phf_map, Map};

const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];
const EMPTY: &[&str] = &[];

/// parent -> the only children it accepts
static ONLY_VALID_CHILDREN: Map<&'static str, &'static [&'static str]> = phf_map! {
    "head" => &[
        "base", "basefront", "bgsound", "link", "meta", "title", "noscript", "noframes",
        "style", "script", "template",
    ],
    "optgroup" => &["option"],
    "select" => &["optgroup", "option", "hr"],
    // table
    "table" => &["caption", "colgroup", "tbody", "tfoot", "thead"],
    "tr" => &["td", "th"],
    "colgroup" => &["col"],
    "tbody" => &["tr"],
    "thead" => &["tr"],
    "tfoot" => &["tr"],
    // no element children at all
    "script" => EMPTY,
    "iframe" => EMPTY,
    "option" => EMPTY,
    "textarea" => EMPTY,
    "style" => EMPTY,
    "title" => EMPTY,
};

/// child -> the only parents it accepts
static ONLY_VALID_PARENTS: Map<&'static str, &'static [&'static str]> = phf_map! {
    "html" => EMPTY,
    "body" => &["html"],
    "head" => &["html"],
    "td" => &["tr"],
    "colgroup" => &["table"],
    "caption" => &["table"],
    "tbody" => &["table"],
    "tfoot" => &["table"],
    "col" => &["colgroup"],
    "th" => &["tr"],
    "thead" => &["table"],
    "tr" => &["tbody", "thead", "tfoot"],
    "dd" => &["dl", "div"],
    "dt" => &["dl", "div"],
    "figcaption" => &["figure"],
    "summary" => &["details"],
    "area" => &["map"],
};

static KNOWN_INVALID_CHILDREN: Map<&'static str, &'static [&'static str]> = phf_map! {
    "p" => &[
        "address", "article", "aside", "blockquote", "center", "details", "dialog", "dir",
        "div", "dl", "fieldset", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5",
        "h6", "header", "hgroup", "hr", "li", "main", "nav", "menu", "ol", "p", "pre",
        "section", "table", "ul",
    ],
    "svg" => &[
        "b", "blockquote", "br", "code", "dd", "div", "dl", "dt", "em", "embed", "h1", "h2",
        "h3", "h4", "h5", "h6", "hr", "i", "img", "li", "menu", "meta", "ol", "p", "pre",
        "ruby", "s", "small", "span", "strong", "sub", "sup", "table", "u", "ul", "var",
    ],
};

static KNOWN_INVALID_PARENTS: Map<&'static str, &'static [&'static str]> = phf_map! {
    "a" => &["a"],
    "button" => &["button"],
    "dd" => &["dd", "dt"],
    "dt" => &["dd", "dt"],
    "form" => &["form"],
    "li" => &["li"],
    "h1" => HEADINGS,
    "h2" => HEADINGS,
    "h3" => HEADINGS,
    "h4" => HEADINGS,
    "h5" => HEADINGS,
    "h6" => HEADINGS,
};

pub fn is_valid_html_nesting(parent: &str, child: &str) -> bool {
    if let Some(children) = ONLY_VALID_CHILDREN.get(parent) {
        return children.contains(&child);
    }
    if let Some(parents) = ONLY_VALID_PARENTS.get(child) {
        return parents.contains(&parent);
    }
    if let Some(children) = KNOWN_INVALID_CHILDREN.get(parent) {
        if children.contains(&child) {
            return false;
        }
    }
    if let Some(parents) = KNOWN_INVALID_PARENTS.get(child) {
        if parents.contains(&parent) {
            return false;
        }
    }
    true
}
