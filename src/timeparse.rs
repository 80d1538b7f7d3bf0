/// Converts a raw time cell into decimal hours. Accepts `6h 8m`, `2:30`,
/// `1,5`, and plain decimals; anything unparseable contributes 0 rather than
/// failing, so a sparse or messy export still aggregates.
pub fn parse_time_to_hours(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    let lower = trimmed.to_lowercase();
    if lower.contains('h') || lower.contains('m') {
        let hours = digits_before(&lower, 'h');
        let minutes = digits_before(&lower, 'm');
        return hours as f64 + minutes as f64 / 60.0;
    }

    if let Some((left, right)) = trimmed.split_once(':') {
        let hours: u32 = left.trim().parse().unwrap_or(0);
        let minutes: u32 = right.trim().parse().unwrap_or(0);
        return hours as f64 + minutes as f64 / 60.0;
    }

    trimmed.replace(',', ".").parse().unwrap_or(0.0)
}

/// The run of digits immediately preceding the first `marker`, or 0 when the
/// marker is absent or not directly preceded by a digit.
fn digits_before(text: &str, marker: char) -> u32 {
    let Some(pos) = text.find(marker) else {
        return 0;
    };
    let run: Vec<char> = text[..pos]
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    run.iter().rev().collect::<String>().parse().unwrap_or(0)
}
