/// Naive sentence splitter: newlines become spaces and `.` is the only
/// delimiter. Each fragment is trimmed and gets its period back; empty
/// fragments are dropped.
pub(super) fn split_sentences(text: &str) -> Vec<String> {
    text.replace('\n', " ")
        .split('.')
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .map(|fragment| format!("{}.", fragment))
        .collect()
}
