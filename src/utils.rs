//! Common utility functions shared across the codebase.
//!
//! Asset identifiers are root-relative paths with `/` separators
//! (e.g. `app/index.html`). The helpers here resolve references found in
//! documents and scripts against those identifiers and derive new ones.

/// Returns true for references that point outside the project
/// (`http:`, `https:`, protocol-relative `//`, `data:` and similar).
pub fn is_remote(href: &str) -> bool {
    href.starts_with("//") || href.contains("://") || href.starts_with("data:")
}

/// Resolve `href` as written inside the asset `base` to an asset identifier.
///
/// Returns `None` for remote references, empty references and references
/// that escape the project root.
///
/// # Examples
///
/// ```
/// use localeclone::utils::resolve_reference;
///
/// assert_eq!(resolve_reference("app/index.html", "js/main.js"), Some("app/js/main.js".to_string()));
/// assert_eq!(resolve_reference("app/index.html", "../lib.js"), Some("lib.js".to_string()));
/// assert_eq!(resolve_reference("app/index.html", "/lib.js"), Some("lib.js".to_string()));
/// assert_eq!(resolve_reference("index.html", "https://cdn.example/x.js"), None);
/// ```
pub fn resolve_reference(base: &str, href: &str) -> Option<String> {
    let href = href.split(['?', '#']).next().unwrap_or_default().trim();
    if href.is_empty() || is_remote(href) {
        return None;
    }

    let mut segments: Vec<&str> = Vec::new();
    let relative = match href.strip_prefix('/') {
        Some(rooted) => rooted,
        None => {
            segments.extend(parent_segments(base));
            href
        }
    };

    for part in relative.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            other => segments.push(other),
        }
    }

    if segments.is_empty() {
        None
    } else {
        Some(segments.join("/"))
    }
}

/// Compute the reference to write inside `from` so that it points at `to`.
///
/// ```
/// use localeclone::utils::relative_reference;
///
/// assert_eq!(relative_reference("app/index.html", "app/main.da.js"), "main.da.js");
/// assert_eq!(relative_reference("app/pages/a.html", "app/main.js"), "../main.js");
/// assert_eq!(relative_reference("index.html", "js/main.js"), "js/main.js");
/// ```
pub fn relative_reference(from: &str, to: &str) -> String {
    let from_dir: Vec<&str> = parent_segments(from).collect();
    let to_segments: Vec<&str> = to.split('/').collect();

    let common = from_dir
        .iter()
        .zip(&to_segments)
        .take_while(|(a, b)| a == b)
        .count()
        // The last target segment is the file name and never part of the shared prefix.
        .min(to_segments.len().saturating_sub(1));

    let mut parts: Vec<&str> = Vec::new();
    parts.extend(std::iter::repeat_n("..", from_dir.len() - common));
    parts.extend(&to_segments[common..]);
    parts.join("/")
}

/// Insert `.{tag}` before the trailing extension of the identifier's file
/// name, or append it when the file name has no extension.
///
/// ```
/// use localeclone::utils::insert_before_extension;
///
/// assert_eq!(insert_before_extension("app/index.html", "en_US"), "app/index.en_US.html");
/// assert_eq!(insert_before_extension("app/index", "da"), "app/index.da");
/// ```
pub fn insert_before_extension(identifier: &str, tag: &str) -> String {
    let (dir, name) = split_file_name(identifier);
    let name = match name.rfind('.') {
        Some(dot) if dot > 0 => format!("{}.{}{}", &name[..dot], tag, &name[dot..]),
        _ => format!("{}.{}", name, tag),
    };
    join_file_name(dir, &name)
}

/// Insert `-{n}` before the trailing extension: `main.da.js` -> `main.da-2.js`.
pub fn insert_counter(identifier: &str, n: usize) -> String {
    let (dir, name) = split_file_name(identifier);
    let name = match name.rfind('.') {
        Some(dot) if dot > 0 => format!("{}-{}{}", &name[..dot], n, &name[dot..]),
        _ => format!("{}-{}", name, n),
    };
    join_file_name(dir, &name)
}

fn parent_segments(identifier: &str) -> impl Iterator<Item = &str> {
    let dir = identifier.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("");
    dir.split('/').filter(|s| !s.is_empty())
}

fn split_file_name(identifier: &str) -> (Option<&str>, &str) {
    match identifier.rsplit_once('/') {
        Some((dir, name)) => (Some(dir), name),
        None => (None, identifier),
    }
}

fn join_file_name(dir: Option<&str>, name: &str) -> String {
    match dir {
        Some(dir) => format!("{}/{}", dir, name),
        None => name.to_string(),
    }
}
