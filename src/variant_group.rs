//! Variant group expansion for directive bodies
//!
//! A variant group applies one prefix to several utilities at once:
//!
//! - `hover:(bg-red text-white)` expands to `hover:bg-red hover:text-white`
//! - `text-(sm red)` expands to `text-sm text-red`
//! - `~` inside a group stands for the bare prefix: `dark:(~ a)` → `dark dark:a`
//! - a leading `!` stays in front: `hover:(!a)` → `!hover:a`
//!
//! Groups may nest. Parentheses that are not preceded by a `:` or `-`
//! separated prefix (for example arbitrary values like `bg-[url(a.png)]`) and
//! unbalanced parentheses are left untouched.
//!
//! # Example
//!
//! ```
//! use compile_class::variant_group::expand_variant_groups;
//!
//! assert_eq!(
//!     expand_variant_groups("p-1 hover:(bg-red text-white)"),
//!     "p-1 hover:bg-red hover:text-white"
//! );
//! ```

/// Maximum group nesting that is expanded.
const MAX_DEPTH: usize = 5;

/// Characters that may separate a group prefix from its parenthesis.
const SEPARATORS: [char; 2] = [':', '-'];

/// Expand every variant group in `input`.
pub fn expand_variant_groups(input: &str) -> String {
    expand_with_depth(input, MAX_DEPTH)
}

fn expand_with_depth(input: &str, depth: usize) -> String {
    if depth == 0 || !input.contains('(') {
        return input.to_string();
    }

    let mut out = String::with_capacity(input.len());
    // `copied` marks how much of `input` is already in `out`
    let mut copied = 0;
    let mut search = 0;

    while let Some(rel) = input[search..].find('(') {
        let open = search + rel;
        search = open + 1;

        let Some(close) = find_closing_paren(input, open) else {
            continue;
        };

        let prefix_start = find_prefix_start(input, copied, open);
        let Some((prefix, separator)) = split_separator(&input[prefix_start..open]) else {
            continue;
        };

        let inner = expand_with_depth(&input[open + 1..close], depth - 1);
        out.push_str(&input[copied..prefix_start]);
        out.push_str(&expand_group(prefix, separator, &inner));
        copied = close + 1;
        search = close + 1;
    }

    out.push_str(&input[copied..]);
    out
}

/// Find the `)` matching the `(` at byte offset `open`, honoring nesting.
fn find_closing_paren(s: &str, open: usize) -> Option<usize> {
    let mut depth = 1;
    for (i, c) in s[open + 1..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + 1 + i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Walk back from `open` to the start of the token that owns the group.
fn find_prefix_start(s: &str, floor: usize, open: usize) -> usize {
    s[floor..open]
        .char_indices()
        .rev()
        .find(|&(_, c)| c.is_whitespace() || c == '(' || c == ')')
        .map(|(i, c)| floor + i + c.len_utf8())
        .unwrap_or(floor)
}

/// Split `hover:` into (`hover`, `:`). Requires a non-empty prefix.
fn split_separator(raw: &str) -> Option<(&str, char)> {
    let separator = raw.chars().last()?;
    if !SEPARATORS.contains(&separator) {
        return None;
    }
    let prefix = &raw[..raw.len() - separator.len_utf8()];
    if prefix.is_empty() {
        return None;
    }
    Some((prefix, separator))
}

fn expand_group(prefix: &str, separator: char, inner: &str) -> String {
    inner
        .split_whitespace()
        .map(|item| {
            if item == "~" {
                prefix.to_string()
            } else if let Some(rest) = item.strip_prefix('!') {
                format!("!{}{}{}", prefix, separator, rest)
            } else {
                format!("{}{}{}", prefix, separator, item)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
