/// Canonical comparison form for picks and outcome values.
pub fn normalize_name(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_lowercase()
}

pub(crate) fn same_name(left: &str, right: &str) -> bool {
    normalize_name(left) == normalize_name(right)
}

pub(crate) fn list_contains<'a, I>(names: I, candidate: &str) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    let needle = normalize_name(candidate);
    if needle.is_empty() {
        return false;
    }
    names.into_iter().any(|name| normalize_name(name) == needle)
}
