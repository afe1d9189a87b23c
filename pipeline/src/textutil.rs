use lazy_regex::{regex_find, regex_replace_all};

/// Cleans leading, trailing, and redundant whitespace from a string, in-place.
pub fn clean_text(s: &mut String) {
    let trimmed = s.trim();
    // Skip the copy/realloc if nothing to do.
    if trimmed.len() != s.len() || regex_find!(r"\s{2,}", &trimmed).is_some() {
        let new = regex_replace_all!(r"\s{2,}", trimmed, " ");
        *s = new.to_string();
    }
}

/// Removes every character in `chars` from `s`, in-place.
pub fn strip_chars(s: &mut String, chars: &str) {
    if chars.is_empty() {
        return;
    }
    s.retain(|c| !chars.contains(c));
}

/// Case-insensitive substring test, used for all label and marker matching.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
