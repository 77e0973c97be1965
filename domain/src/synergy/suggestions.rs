//! Suggested-answer extraction from finalized text.
//!
//! Finalization prompts instruct providers to emit a `SUGGESTED_ANSWERS:`
//! label followed by `- ` bullet lines whenever they ask the user a
//! question. This parsing contract is consumed by the presentation layer and
//! must stay stable.

/// Extract the optional `SUGGESTED_ANSWERS:` block from finalized text.
///
/// The label line is matched case-insensitively; the consecutive lines after
/// it that begin with `- ` (after trimming) become one suggestion each, with
/// the marker and surrounding whitespace stripped, order preserved. Absence
/// of the label yields an empty list.
pub fn extract_suggested_answers(text: &str) -> Vec<String> {
    let mut lines = text.lines();

    // Find the label line; suggestions may follow the label on the same line
    // only in the degenerate "label then bullets" layout, so we only look at
    // the lines after it.
    let found = lines.find(|line| {
        line.trim()
            .to_lowercase()
            .starts_with("suggested_answers:")
    });
    if found.is_none() {
        return Vec::new();
    }

    let mut answers = Vec::new();
    for line in lines {
        let trimmed = line.trim();
        if let Some(rest) = trimmed.strip_prefix("- ") {
            answers.push(rest.trim().to_string());
        } else {
            break;
        }
    }
    answers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_bullets_in_order() {
        let text = "Pick one:\nSUGGESTED_ANSWERS:\n- Option A\n- Option B\n";
        assert_eq!(extract_suggested_answers(text), vec!["Option A", "Option B"]);
    }

    #[test]
    fn test_no_label_yields_empty() {
        assert!(extract_suggested_answers("Just a final answer.").is_empty());
    }

    #[test]
    fn test_label_is_case_insensitive() {
        let text = "suggested_answers:\n- yes\n- no";
        assert_eq!(extract_suggested_answers(text), vec!["yes", "no"]);
    }

    #[test]
    fn test_stops_at_first_non_bullet_line() {
        let text = "SUGGESTED_ANSWERS:\n- first\n- second\nAnd some prose\n- orphan";
        assert_eq!(extract_suggested_answers(text), vec!["first", "second"]);
    }

    #[test]
    fn test_bullets_are_trimmed() {
        let text = "SUGGESTED_ANSWERS:\n  -   padded answer  \n";
        assert_eq!(extract_suggested_answers(text), vec!["padded answer"]);
    }

    #[test]
    fn test_label_with_no_bullets() {
        let text = "SUGGESTED_ANSWERS:\nnothing bulleted here";
        assert!(extract_suggested_answers(text).is_empty());
    }
}
