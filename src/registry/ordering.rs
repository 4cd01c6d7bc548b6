use std::cmp::Ordering;

/// Default-version ordering (§3): a version-less model is treated as a
/// manually pinned "latest" and always sorts newer than a versioned one.
/// Otherwise, integer-parseable versions compare numerically; everything
/// else compares lexicographically. Equal comparisons keep the current
/// default (callers should treat `Ordering::Equal` as "don't replace").
pub fn compare_versions(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => match (a.parse::<i64>(), b.parse::<i64>()) {
            (Ok(a), Ok(b)) => a.cmp(&b),
            _ => a.cmp(b),
        },
    }
}

/// True iff `candidate` should replace `current` as the default, per the
/// incremental `_refreshDefault` policy: adopt on newer-or-equal, or on a
/// version-less candidate. A tie re-adopts the candidate as the new default
/// object (matches upstream `_is_newer(new, old) >= 0`).
pub fn is_newer_or_versionless(candidate: Option<&str>, current: Option<&str>) -> bool {
    if candidate.is_none() {
        return true;
    }
    if current.is_none() {
        return false;
    }
    compare_versions(candidate, current) != Ordering::Less
}
