mod html_nesting;

pub use html_nesting::is_valid_html_nesting;

pub fn non_whitespace(c: char) -> bool {
    !c.is_ascii_whitespace()
}

pub fn is_mergeable_prop(prop: &str) -> bool {
    prop == "class" || prop == "style"
}

pub fn is_simple_identifier(s: &str) -> bool {
    let is_ident = |c: char| c == '$' || c == '_' || c.is_ascii_alphanumeric();
    !s.is_empty() && s.chars().all(is_ident) && !s.starts_with(|c: char| c.is_ascii_digit())
}

macro_rules! make_list {
    ( $($id: ident),* ) => {
        &[
            $(stringify!($id)),*
        ]
    }
}

// use simple contains for small str array
// benchmark shows linear scan takes at most 10ns
// while phf or bsearch takes 30ns
const ALLOWED_GLOBALS: &[&str] = make_list!(
    Infinity,
    undefined,
    NaN,
    isFinite,
    isNaN,
    parseFloat,
    parseInt,
    decodeURI,
    decodeURIComponent,
    encodeURI,
    encodeURIComponent,
    Math,
    Number,
    Date,
    Array,
    Object,
    Boolean,
    String,
    RegExp,
    Map,
    Set,
    JSON,
    Intl,
    BigInt,
    console
);
pub fn is_global_allow_listed(s: &str) -> bool {
    ALLOWED_GLOBALS.contains(&s)
}

// consumed by the compiler itself, never rendered
const RESERVED: &[&str] = make_list!(key, slot);

#[inline]
pub fn is_reserved_prop(tag: &str) -> bool {
    RESERVED.contains(&tag)
}

const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];
pub fn is_void_tag(s: &str) -> bool {
    VOID_TAGS.contains(&s)
}

/// content is kept verbatim under these tags
pub fn is_preformatted_tag(s: &str) -> bool {
    s.eq_ignore_ascii_case("pre") || s.eq_ignore_ascii_case("textarea")
}

// NB: JS word boundary is `\w`: `[a-zA-Z0-9-]`.
pub fn camelize(s: &str) -> String {
    // str.replace(/-(\w)/g, (_, c) => c.toUpperCase())
    let mut ret = String::with_capacity(s.len());
    let mut is_minus = false;
    for c in s.chars() {
        if c.is_ascii_alphanumeric() && is_minus {
            ret.push(c.to_ascii_uppercase());
            is_minus = false;
            continue;
        }
        // write pending -
        if is_minus {
            ret.push('-');
        }
        is_minus = c == '-';
        if !is_minus {
            ret.push(c);
        }
    }
    if is_minus {
        ret.push('-');
    }
    ret
}

pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `click` becomes `onClick`, `update:value` becomes `onUpdate:value`
pub fn to_handler_key(event: &str) -> String {
    format!("on{}", capitalize(&camelize(event)))
}

/// compress consecutive whitespaces into one.
pub fn condense_whitespace(mut s: &str) -> String {
    let mut ret = String::with_capacity(s.len());
    while let Some(p) = s.find(|c: char| c.is_ascii_whitespace()) {
        let (prev, after) = s.split_at(p);
        ret.push_str(prev);
        ret.push(' ');
        if let Some(p) = after.find(non_whitespace) {
            s = after.split_at(p).1;
        } else {
            s = "";
        }
    }
    ret.push_str(s);
    ret
}

/// Component name a single-file template refers to itself by,
/// e.g. `src/FooBar.svelte` or `foo-bar.svelte?v=1` gives `FooBar`.
pub fn get_self_name(filename: &str) -> Option<String> {
    let path = filename.split('?').next()?;
    let base = path.rsplit(|c| c == '/' || c == '\\').next()?;
    let (stem, ext) = base.rsplit_once('.')?;
    let ext_ok = !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if stem.is_empty() || !ext_ok {
        return None;
    }
    Some(capitalize(&camelize(stem)))
}

/// Escapes literal text placed into template markup.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escapes text placed inside a double-quoted template attribute.
pub fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;").replace('"', "&quot;")
}
