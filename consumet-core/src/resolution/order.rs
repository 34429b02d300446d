//! Attempt ordering

/// The hint, lowercased, if it names a member of the default order
#[must_use]
pub fn recognized_hint(default_order: &[String], hint: Option<&str>) -> Option<String> {
    hint.map(|h| h.trim().to_ascii_lowercase())
        .filter(|h| default_order.iter().any(|name| name == h))
}

/// Build the attempt order from a domain's default order and a caller hint
///
/// A hint naming a member of the default order moves that provider to the
/// front; any other hint is ignored. The result never contains duplicates.
#[must_use]
pub fn attempt_order(default_order: &[String], hint: Option<&str>) -> Vec<String> {
    let hint = recognized_hint(default_order, hint);

    let mut order = Vec::with_capacity(default_order.len());
    if let Some(ref hinted) = hint {
        order.push(hinted.clone());
    }
    order.extend(
        default_order
            .iter()
            .filter(|name| hint.as_deref() != Some(name.as_str()))
            .cloned(),
    );
    order
}
