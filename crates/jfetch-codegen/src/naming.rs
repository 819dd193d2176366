/// Lower-cases the first character of `name`, leaving the rest untouched.
///
/// Characters without a lower-case form (e.g. CJK ideographs) are kept as-is. The first
/// character maps to exactly one character: `İ` becomes `i`, not `i̇`.
pub(crate) fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first
            .to_lowercase()
            .next()
            .into_iter()
            .chain(chars)
            .collect(),
        None => String::new(),
    }
}
