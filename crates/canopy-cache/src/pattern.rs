//! Glob matching for attribute name filters.

/// Match `name` against a glob `pattern`.
///
/// `*` matches any run of characters (including none), `?` matches exactly
/// one. Everything else matches literally.
pub(crate) fn matches(pattern: &str, name: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let name: Vec<char> = name.chars().collect();

    let mut p = 0;
    let mut n = 0;
    // Last `*` seen and the name position it has consumed up to, for
    // backtracking when a literal run fails further along.
    let mut star: Option<usize> = None;
    let mut mark = 0;

    while n < name.len() {
        if p < pattern.len() && (pattern[p] == '?' || pattern[p] == name[n]) {
            p += 1;
            n += 1;
        } else if p < pattern.len() && pattern[p] == '*' {
            star = Some(p);
            mark = n;
            p += 1;
        } else if let Some(s) = star {
            p = s + 1;
            mark += 1;
            n = mark;
        } else {
            return false;
        }
    }
    while p < pattern.len() && pattern[p] == '*' {
        p += 1;
    }
    p == pattern.len()
}
