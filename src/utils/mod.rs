/// Validate team name format
pub fn validate_team_name(name: &str) -> bool {
    !name.trim().is_empty() && name.len() <= 100
}

/// Render a 0-100 percentage for terminal output
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Render decimal odds
pub fn format_odds(odds: f64) -> String {
    format!("{:.2}", odds)
}

/// Render a 1-5 confidence grade as a star scale
pub fn confidence_stars(confidence: u8) -> String {
    let filled = confidence.min(5) as usize;
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_team_name() {
        assert!(validate_team_name("Liverpool"));
        assert!(!validate_team_name(""));
        assert!(!validate_team_name("   "));
        assert!(!validate_team_name(&"x".repeat(101)));
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(52.0), "52.0%");
        assert_eq!(format_percent(7.25), "7.2%");
    }

    #[test]
    fn test_confidence_stars() {
        assert_eq!(confidence_stars(4), "★★★★☆");
        assert_eq!(confidence_stars(0), "☆☆☆☆☆");
        // out-of-range grades are capped rather than panicking
        assert_eq!(confidence_stars(9), "★★★★★");
    }
}
