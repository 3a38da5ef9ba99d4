//! Native name handling.
//!
//! Native names arrive as the symbol backend prints them: fully qualified,
//! possibly with template argument lists that themselves contain qualified
//! names (`std::map<ns::Key, ns::Value>`). Every split here honors nesting so
//! separators inside `<...>` or `(...)` are never cut.

/// Byte offsets of every top-level occurrence of `pat` in `name`.
fn top_level_positions(name: &str, pat: &str) -> Vec<usize> {
    let bytes = name.as_bytes();
    let mut depth = 0usize;
    let mut out = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'<' | b'(' | b'[' => depth += 1,
            b'>' | b')' | b']' => depth = depth.saturating_sub(1),
            _ if depth == 0 && bytes[i..].starts_with(pat.as_bytes()) => {
                out.push(i);
                i += pat.len();
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    out
}

/// Split a qualified name into its namespace and its last segment.
///
/// # Examples
/// ```
/// use symgen_core::utils::split_qualified;
/// assert_eq!(split_qualified("geo::Point"), (Some("geo"), "Point"));
/// assert_eq!(split_qualified("Point"), (None, "Point"));
/// assert_eq!(split_qualified("a::Box<b::C>"), (Some("a"), "Box<b::C>"));
/// ```
pub fn split_qualified(name: &str) -> (Option<&str>, &str) {
    match top_level_positions(name, "::").last() {
        Some(&pos) => (Some(&name[..pos]), &name[pos + 2..]),
        None => (None, name),
    }
}

/// Split a qualified name at every top-level `::`.
///
/// # Examples
/// ```
/// use symgen_core::utils::qualified_segments;
/// assert_eq!(qualified_segments("a::B<c::D>::E"), ["a", "B<c::D>", "E"]);
/// ```
pub fn qualified_segments(name: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    for pos in top_level_positions(name, "::") {
        segments.push(&name[start..pos]);
        start = pos + 2;
    }
    segments.push(&name[start..]);
    segments
}

/// Strip the top-level template argument list, if any.
///
/// # Examples
/// ```
/// use symgen_core::utils::strip_template_arguments;
/// assert_eq!(strip_template_arguments("Stack<int>"), "Stack");
/// assert_eq!(strip_template_arguments("Stack"), "Stack");
/// ```
pub fn strip_template_arguments(name: &str) -> &str {
    match name.find('<') {
        Some(pos) if pos > 0 => name[..pos].trim_end(),
        _ => name,
    }
}

/// Split the argument list of an instantiated name into its top-level arguments.
///
/// # Examples
/// ```
/// use symgen_core::utils::template_arguments;
/// assert_eq!(template_arguments("Map<int, Pair<a, b>>"), ["int", "Pair<a, b>"]);
/// assert!(template_arguments("Plain").is_empty());
/// ```
pub fn template_arguments(name: &str) -> Vec<&str> {
    let (Some(open), Some(close)) = (name.find('<'), name.rfind('>')) else {
        return Vec::new();
    };
    if close <= open {
        return Vec::new();
    }
    let inner = &name[open + 1..close];
    let mut args = Vec::new();
    let mut start = 0;
    for pos in top_level_positions(inner, ",") {
        args.push(inner[start..pos].trim());
        start = pos + 1;
    }
    let last = inner[start..].trim();
    if !last.is_empty() {
        args.push(last);
    }
    args
}

/// Turn an arbitrary native name into a Rust identifier.
///
/// Runs of characters outside `[A-Za-z0-9_]` collapse into one `_`, leading
/// and trailing underscores are dropped, and a leading digit gets a `_` prefix.
///
/// # Examples
/// ```
/// use symgen_core::utils::sanitize_identifier;
/// assert_eq!(sanitize_identifier("<unnamed-tag>"), "unnamed_tag");
/// assert_eq!(sanitize_identifier("Pointer<Point>"), "Pointer_Point");
/// assert_eq!(sanitize_identifier("3d"), "_3d");
/// ```
pub fn sanitize_identifier(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_sep = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            if pending_sep && !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            pending_sep = false;
            out.push(c);
        } else {
            pending_sep = true;
        }
    }
    let trimmed = out.trim_matches('_');
    if trimmed.is_empty() {
        return "_".to_string();
    }
    if trimmed.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("_{trimmed}");
    }
    trimmed.to_string()
}

const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "dyn", "else", "enum", "extern",
    "false", "fn", "for", "gen", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut",
    "pub", "ref", "return", "static", "struct", "trait", "true", "type", "unsafe", "use",
    "where", "while", "abstract", "become", "box", "do", "final", "macro", "override", "priv",
    "try", "typeof", "unsized", "virtual", "yield",
];

/// Sanitize a name and make it usable as a field identifier.
///
/// Keywords become raw identifiers. `self`, `Self`, `super` and `crate` cannot
/// be raw, so they get a trailing underscore instead.
///
/// # Examples
/// ```
/// use symgen_core::utils::field_identifier;
/// assert_eq!(field_identifier("type"), "r#type");
/// assert_eq!(field_identifier("self"), "self_");
/// assert_eq!(field_identifier("m_count"), "m_count");
/// ```
pub fn field_identifier(name: &str) -> String {
    let ident = sanitize_identifier(name);
    if matches!(ident.as_str(), "self" | "Self" | "super" | "crate" | "_") {
        return format!("{ident}_");
    }
    if RUST_KEYWORDS.contains(&ident.as_str()) {
        return format!("r#{ident}");
    }
    ident
}
