//! Best-effort extraction of screen names from a free-text goal.
//!
//! `"Onboarding for a fitness app — user signs up, picks goals, connects
//! wearable"` becomes `["Signs Up", "Picks Goals", "Connects Wearable"]`.
//! Nothing else in the crate depends on the quality of this guess.

/// Shortest fragment kept, in characters.
const MIN_FRAGMENT_CHARS: usize = 4;
/// Longest fragment kept, in characters.
const MAX_FRAGMENT_CHARS: usize = 59;

const SUBJECT_PREFIXES: [&str; 4] = ["user", "they", "the user", "users"];
const MODAL_PREFIXES: [&str; 3] = ["can", "will", "should"];

/// Suggested screen names for `goal`, or an empty list when fewer than two
/// steps can be found.
#[must_use]
pub fn parse_screens_from_goal(goal: &str) -> Vec<String> {
    screen_goal_fragments(goal)
        .into_iter()
        .map(|(name, _)| name)
        .collect()
}

/// Suggested screen names paired with the goal fragment each came from.
#[must_use]
pub fn screen_goal_fragments(goal: &str) -> Vec<(String, String)> {
    let cleaned = strip_through(strip_through(goal, '—'), ':');
    let parts: Vec<&str> = split_steps(cleaned)
        .into_iter()
        .map(str::trim)
        .filter(|p| (MIN_FRAGMENT_CHARS..=MAX_FRAGMENT_CHARS).contains(&p.chars().count()))
        .collect();

    if parts.len() < 2 {
        return Vec::new();
    }

    parts
        .into_iter()
        .map(|part| (screen_name(part), part.to_string()))
        .collect()
}

/// Drop everything up to and including the first `marker` and the
/// whitespace after it. Text without the marker is returned unchanged.
fn strip_through(text: &str, marker: char) -> &str {
    match text.find(marker) {
        Some(idx) => text[idx + marker.len_utf8()..].trim_start(),
        None => text,
    }
}

/// Split on `,` (optionally followed by `then`), `;`, `. `, ` then `, and
/// ` and then `.
fn split_steps(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut pos = 0;

    while pos < text.len() {
        match delimiter_len(&text[pos..]) {
            Some(len) => {
                parts.push(&text[start..pos]);
                pos += len;
                start = pos;
            }
            None => {
                pos += text[pos..].chars().next().map_or(1, char::len_utf8);
            }
        }
    }
    parts.push(&text[start..]);
    parts
}

/// Byte length of the delimiter starting at the head of `rest`, if any.
fn delimiter_len(rest: &str) -> Option<usize> {
    if let Some(after) = rest.strip_prefix(',') {
        let ws = leading_ws(after);
        let tail = &after[ws..];
        let then = word_then_ws(tail, "then").unwrap_or(0);
        return Some(1 + ws + then);
    }
    if let Some(after) = rest.strip_prefix(';') {
        return Some(1 + leading_ws(after));
    }
    if let Some(after) = rest.strip_prefix('.') {
        let ws = leading_ws(after);
        return (ws > 0).then_some(1 + ws);
    }

    let ws = leading_ws(rest);
    if ws == 0 {
        return None;
    }
    let tail = &rest[ws..];
    if let Some(len) = word_then_ws(tail, "then") {
        return Some(ws + len);
    }
    let and = word_then_ws(tail, "and")?;
    let then = word_then_ws(&tail[and..], "then")?;
    Some(ws + and + then)
}

/// Length of `word` plus at least one trailing whitespace char at the head
/// of `text`.
fn word_then_ws(text: &str, word: &str) -> Option<usize> {
    let after = text.strip_prefix(word)?;
    let ws = leading_ws(after);
    (ws > 0).then_some(word.len() + ws)
}

fn leading_ws(text: &str) -> usize {
    text.len() - text.trim_start().len()
}

/// Strip a leading subject and modal verb, then title-case.
fn screen_name(part: &str) -> String {
    let part = strip_prefix_word(part, &SUBJECT_PREFIXES);
    let part = strip_prefix_word(part, &MODAL_PREFIXES);
    part.split(' ')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn strip_prefix_word<'a>(text: &'a str, words: &[&str]) -> &'a str {
    for word in words {
        let Some(head) = text.get(..word.len()) else {
            continue;
        };
        if !head.eq_ignore_ascii_case(word) {
            continue;
        }
        let after = &text[word.len()..];
        if leading_ws(after) > 0 {
            return after.trim_start();
        }
    }
    text
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
