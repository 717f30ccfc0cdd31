/// Derives the URL slug for a robot name.
///
/// Lowercases the name and collapses every run of non-alphanumeric characters into a
/// single hyphen, trimming hyphens from both ends: `"Atlas (Gen 2)"` → `"atlas-gen-2"`.
///
/// # Arguments
/// - `name` - Robot name
///
/// # Returns
/// - `String` - The slug, empty if the name has no alphanumeric characters
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Whether a path parameter should first be tried as a numeric robot ID.
pub fn looks_like_id(value: &str) -> bool {
    !value.is_empty() && value.len() <= 10 && value.chars().all(|c| c.is_ascii_digit())
}
