//! Identifier helpers used when generating predicate names and validating
//! declarations.

/// Convert an UpperCamelCase identifier to lower_snake_case.
///
/// A `_` separator is inserted before every ASCII uppercase character that is
/// not the first character, then the whole string is lowercased:
///
/// ```rust
/// # use tyfam::ident::upper_camel_to_snake;
/// assert_eq!(upper_camel_to_snake("AbsExpr"), "abs_expr");
/// assert_eq!(upper_camel_to_snake("Var"), "var");
/// assert_eq!(upper_camel_to_snake("X"), "x");
/// ```
///
/// Only ASCII letters are in scope. Non-ASCII characters are passed through
/// lowercased, but that behavior is unspecified and must not be relied upon.
pub fn upper_camel_to_snake(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i != 0 {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}

/// Whether `name` is usable as a variant or field identifier: nonempty,
/// starting with an ASCII letter or `_`, continuing with ASCII alphanumerics
/// or `_`.
pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
