/// Normalize a decoded payload for uniqueness comparison: surrounding
/// whitespace removed, lowercase.
pub fn normalize(payload: &str) -> String {
    payload.trim().to_lowercase()
}

/// Whether `payload` is empty once whitespace is removed.
pub fn is_blank(payload: &str) -> bool {
    payload.trim().is_empty()
}

/// Whether `candidate` matches any of `known` after normalizing both sides.
pub fn contains<'a, I>(known: I, candidate: &str) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    let needle = normalize(candidate);
    known.into_iter().any(|code| normalize(code) == needle)
}
