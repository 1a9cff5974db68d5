//! Argument list and command path helpers.

/// Returns a copy of `args` with the element at `index` removed.
///
/// Elements before `index` keep their position and elements after it shift
/// left by one. The input is never modified, so callers holding on to it see
/// the same list after descent. An out-of-range index yields an unchanged copy.
pub fn remove_at(args: &[String], index: usize) -> Vec<String> {
    let mut result = Vec::with_capacity(args.len().saturating_sub(1));
    result.extend(
        args.iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, arg)| arg.clone()),
    );
    result
}

/// Converts a command path vector to a dot-separated string.
///
/// For example, `["target", "create"]` becomes `"target.create"`.
pub fn path_to_string(path: &[String]) -> String {
    path.join(".")
}
