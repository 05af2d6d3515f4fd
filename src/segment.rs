/// One non-blank line of the script, displayed and advanced as a single step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unit {
    pub text: String,
}

impl Unit {
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// Split a script into its ordered display units.
///
/// Lines are separated on `\n` (a trailing `\r` is dropped so CRLF input
/// segments the same way). Lines that are empty or whitespace-only are
/// discarded; the rest keep their original text and order.
pub fn segment(script: &str) -> Vec<Unit> {
    script
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty())
        .map(|line| Unit {
            text: line.to_string(),
        })
        .collect()
}
