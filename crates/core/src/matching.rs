//! Deterministic task-name resolution for opt-out queries.
//!
//! Case-insensitive, exact match first. A lone substring match wins;
//! among several, the shortest name wins; names tying at the shortest
//! length are reported as ambiguous rather than picked arbitrarily.

/// Outcome of resolving a user-typed query against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome<T> {
    Found(T),
    NotFound,
    /// Several candidates matched equally well; their names, sorted.
    Ambiguous(Vec<String>),
}

/// Resolve `query` against `items` by name.
pub fn resolve_by_name<'a, T>(
    items: &'a [T],
    name_of: impl Fn(&T) -> &str,
    query: &str,
) -> MatchOutcome<&'a T> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return MatchOutcome::NotFound;
    }

    if let Some(exact) = items
        .iter()
        .find(|item| name_of(item).to_lowercase() == needle)
    {
        return MatchOutcome::Found(exact);
    }

    let matches: Vec<&T> = items
        .iter()
        .filter(|item| name_of(item).to_lowercase().contains(&needle))
        .collect();

    match matches.as_slice() {
        [] => MatchOutcome::NotFound,
        [single] => MatchOutcome::Found(single),
        _ => {
            let shortest = matches
                .iter()
                .map(|item| name_of(item).len())
                .min()
                .unwrap_or(0);
            let mut best: Vec<&T> = matches
                .into_iter()
                .filter(|item| name_of(item).len() == shortest)
                .collect();
            if best.len() == 1 {
                MatchOutcome::Found(best.remove(0))
            } else {
                let mut names: Vec<String> =
                    best.iter().map(|item| name_of(item).to_string()).collect();
                names.sort();
                MatchOutcome::Ambiguous(names)
            }
        }
    }
}
