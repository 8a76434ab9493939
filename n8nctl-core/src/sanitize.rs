//! Workflow name -> portable file stem.

/// Characters rejected by at least one mainstream filesystem.
const RESERVED_GLYPHS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Device names Windows refuses as file stems, regardless of extension.
const RESERVED_DEVICES: &[&str] = &["CON", "PRN", "AUX", "NUL"];

/// Convert a workflow name into a file stem that is valid on every host.
///
/// Whitespace, control characters, path separators, reserved glyphs and
/// pictographs are replaced with `_`; trailing dots and spaces are trimmed;
/// reserved device names get a `_` prefix. A name with nothing usable left
/// becomes `"_"`. The function is idempotent.
pub fn sanitize_filename(name: &str) -> String {
    let mapped: String = name
        .chars()
        .map(|c| {
            if c.is_whitespace() || c.is_control() || c >= '\u{1F000}' || RESERVED_GLYPHS.contains(&c)
            {
                '_'
            } else {
                c
            }
        })
        .collect();

    let trimmed = mapped.trim_end_matches(['.', ' ']);
    if trimmed.is_empty() {
        return "_".to_string();
    }

    if is_reserved_device_name(trimmed) {
        return format!("_{trimmed}");
    }

    trimmed.to_string()
}

fn is_reserved_device_name(name: &str) -> bool {
    let base = name.split('.').next().unwrap_or(name).to_ascii_uppercase();
    if RESERVED_DEVICES.contains(&base.as_str()) {
        return true;
    }

    let bytes = base.as_bytes();
    bytes.len() == 4
        && (base.starts_with("COM") || base.starts_with("LPT"))
        && (b'1'..=b'9').contains(&bytes[3])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("My Workflow", "My_Workflow")]
    #[case("a/b\\c", "a_b_c")]
    #[case("what?<*>|:\"", "what_______")]
    #[case("tabs\tand\nnewlines", "tabs_and_newlines")]
    #[case("trailing...", "trailing")]
    #[case("rocket \u{1F680}", "rocket__")]
    #[case("CON", "_CON")]
    #[case("com3.backup", "_com3.backup")]
    #[case("LPT0", "LPT0")]
    #[case("Console", "Console")]
    #[case("...", "_")]
    #[case("", "_")]
    #[case("Ünïcødé ok", "Ünïcødé_ok")]
    fn sanitizes(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(sanitize_filename(input), expected);
    }

    #[rstest]
    #[case("My Workflow")]
    #[case("CON")]
    #[case("aux.")]
    #[case(" . ")]
    #[case("x\u{0}y")]
    #[case("nul.txt")]
    fn is_idempotent(#[case] input: &str) {
        let once = sanitize_filename(input);
        assert_eq!(sanitize_filename(&once), once);
    }
}
