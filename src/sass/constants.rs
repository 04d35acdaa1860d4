//! Sass language constants
//!
//! Diagnostic codes, keyword lists and other fixed strings used across the Sass
//! module. Centralizing them keeps the classifier, parser and formatter in sync.

/// Source reported on every diagnostic
pub const DIAGNOSTIC_SOURCE: &str = "sass";

// Diagnostic codes
/// `@use` after any rule other than `@use`, comments or variables
pub const CODE_USE_NOT_TOP_LEVEL: &str = "@useNotTopLevel";
/// Indentation deeper than any open block permits
pub const CODE_INVALID_INDENTATION: &str = "invalidIndentation";
/// Variable reference without a declaration in scope or imports
pub const CODE_VARIABLE_NOT_FOUND: &str = "variableNotFound";
/// Line that matches no known construct
pub const CODE_UNCLASSIFIED_LINE: &str = "unclassifiedLine";

// Keywords
pub const KEYWORD_MIXIN: &str = "@mixin";
pub const KEYWORD_INCLUDE: &str = "@include";
pub const KEYWORD_EXTEND: &str = "@extend";

/// Legacy spelling of `@mixin`
pub const SYMBOL_MIXIN: &str = "=";
/// Legacy spelling of `@include`
pub const SYMBOL_INCLUDE: &str = "+";

/// Extensions tried when resolving an import without one
pub const IMPORT_EXTENSIONS: &[&str] = &["sass", "scss", "css"];

/// HTML element names recognized as type selectors
pub const HTML_TAGS: &[&str] = &[
    "a", "abbr", "address", "area", "article", "aside", "audio", "b", "base", "bdi", "bdo",
    "blockquote", "body", "br", "button", "canvas", "caption", "cite", "code", "col",
    "colgroup", "data", "datalist", "dd", "del", "details", "dfn", "dialog", "div", "dl", "dt",
    "em", "embed", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4",
    "h5", "h6", "head", "header", "hgroup", "hr", "html", "i", "iframe", "img", "input", "ins",
    "kbd", "keygen", "label", "legend", "li", "link", "main", "map", "mark", "menu", "menuitem",
    "meta", "meter", "nav", "noscript", "object", "ol", "optgroup", "option", "output", "p",
    "param", "picture", "pre", "progress", "q", "rb", "rp", "rt", "rtc", "ruby", "s", "samp",
    "script", "section", "select", "small", "source", "span", "strong", "style", "sub",
    "summary", "sup", "svg", "table", "tbody", "td", "template", "textarea", "tfoot", "th",
    "thead", "time", "title", "tr", "track", "u", "ul", "var", "video", "wbr",
];

/// Pseudo classes and elements that may follow a type selector (`a:hover`)
pub const PSEUDO_SELECTORS: &[&str] = &[
    "active", "after", "before", "checked", "default", "disabled", "empty", "enabled",
    "first", "first-child", "first-letter", "first-line", "first-of-type", "focus",
    "focus-visible", "focus-within", "hover", "in-range", "indeterminate", "invalid", "is",
    "lang", "last-child", "last-of-type", "link", "marker", "not", "nth-child",
    "nth-last-child", "nth-last-of-type", "nth-of-type", "only-child", "only-of-type",
    "optional", "out-of-range", "placeholder", "read-only", "read-write", "required", "root",
    "selection", "target", "valid", "visited", "where", "has",
];
