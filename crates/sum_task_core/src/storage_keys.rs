pub const INPUT_PREFIX: &str = "input";
pub const OUTPUT_PREFIX: &str = "output";

/// Returns the second `/`-separated segment of `input_key`.
///
/// Keys without a separator, or with an empty second segment, have no output
/// name and yield `None`.
pub fn output_segment(input_key: &str) -> Option<&str> {
    match input_key.split('/').nth(1) {
        Some(segment) if !segment.is_empty() => Some(segment),
        _ => None,
    }
}

pub fn output_object_key(input_key: &str) -> Option<String> {
    output_segment(input_key).map(|segment| format!("{OUTPUT_PREFIX}/{segment}"))
}

pub fn input_object_key(timestamp: &str) -> String {
    format!("{INPUT_PREFIX}/{timestamp}.json")
}
