//! Lexical path normalization.

/// Returns the canonical form of `path` used for equality comparisons.
///
/// - Collapses repeated `/` and drops `.` segments
/// - Resolves `name/..` pairs; leading `..` is kept for relative paths and
///   dropped at the root (`/..` is `/`)
/// - Strips a single trailing separator (`/` itself stays `/`)
/// - An empty result becomes `.`
///
/// No filesystem access: symlinks are not resolved.
pub fn sanitize_path(path: &str) -> String {
    let cleaned = clean(path);
    match cleaned.strip_suffix('/') {
        Some(rest) if !rest.is_empty() => rest.to_string(),
        _ => cleaned,
    }
}

fn clean(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut out: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match out.last() {
                Some(&last) if last != ".." => {
                    out.pop();
                }
                _ if rooted => {}
                _ => out.push(".."),
            },
            s => out.push(s),
        }
    }

    let joined = out.join("/");
    if rooted {
        format!("/{joined}")
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}
