//! String helpers for formatting messages before they reach a controller
//!
//! The controller itself never trims or reformats what it is given.

/// Strip trailing line endings.
///
/// With a separator, removes every trailing copy of it. Without one, removes
/// a trailing run of `\r\n` if the string ends with `\r\n`, otherwise a
/// trailing run of `\n`. Mixed runs are not collapsed.
pub fn chomp<'a>(s: &'a str, separator: Option<&str>) -> &'a str {
    let scrub = |sep: &str| {
        let mut end = s;
        while !sep.is_empty() && end.ends_with(sep) {
            end = &end[..end.len() - sep.len()];
        }
        end
    };

    match separator {
        Some(sep) => scrub(sep),
        None if s.ends_with("\r\n") => scrub("\r\n"),
        None if s.ends_with('\n') => scrub("\n"),
        None => s,
    }
}

/// Trim spaces, tabs, CR and LF from both ends; `None` if nothing is left.
///
/// ```
/// use termctl::text::chuzzle;
/// assert_eq!(chuzzle("  \n"), None);
/// assert_eq!(chuzzle(" value\r\n").unwrap_or("default"), "value");
/// ```
pub fn chuzzle(s: &str) -> Option<&str> {
    let trimmed = s.trim_matches(|c| matches!(c, ' ' | '\t' | '\r' | '\n'));
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Split around the first `delimiter`; the tail is `None` if it is absent
pub fn split_around<'a>(s: &'a str, delimiter: &str) -> (&'a str, Option<&'a str>) {
    match s.split_once(delimiter) {
        Some((head, tail)) => (head, Some(tail)),
        None => (s, None),
    }
}

/// Drop `suffix` from the end of `s` if present
pub fn drop_suffix<'a>(s: &'a str, suffix: &str) -> &'a str {
    s.strip_suffix(suffix).unwrap_or(s)
}

/// Indent every non-empty line by `count` spaces.
///
/// Empty lines are dropped, as splitting on `\n` discards them.
pub fn multiline_indent(s: &str, count: usize) -> String {
    let pad = " ".repeat(count);
    s.split('\n')
        .filter(|line| !line.is_empty())
        .map(|line| format!("{pad}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Levenshtein distance between `a` and `b`, counted in UTF-16 code units
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<u16> = a.encode_utf16().collect();
    let b: Vec<u16> = b.encode_utf16().collect();

    // Single rolling row of the classic DP table
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for i in 1..=a.len() {
        let mut diagonal = row[0];
        row[0] = i;
        for j in 1..=b.len() {
            let above = row[j];
            row[j] = if a[i - 1] == b[j - 1] {
                diagonal
            } else {
                1 + diagonal.min(above).min(row[j - 1])
            };
            diagonal = above;
        }
    }
    row[b.len()]
}

/// Closest option to `input`, if any is close enough.
///
/// An option qualifies when its distance is at most a third of its length
/// (rounded up). Ties go to the earlier option.
pub fn best_match<'a, S: AsRef<str>>(input: &str, options: &'a [S]) -> Option<&'a str> {
    options
        .iter()
        .map(|opt| (opt.as_ref(), edit_distance(input, opt.as_ref())))
        .filter(|(opt, dist)| *dist <= (opt.chars().count() + 2) / 3)
        .min_by_key(|(_, dist)| *dist)
        .map(|(opt, _)| opt)
}
