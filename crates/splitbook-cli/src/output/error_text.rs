use splitbook_client::ClientError;

const HEADER: &str = "Something went wrong, but it's easy to fix.";
const FALLBACK_STEP: &str = "Retry the command.";

pub fn render_error(error: &ClientError) -> String {
    let mut lines = vec![
        HEADER.to_string(),
        String::new(),
        format!("  Error:    {}", error.code),
        format!("  Details:  {}", error.message),
        String::new(),
        "What to do next:".to_string(),
    ];
    lines.extend(numbered_steps(&error.recovery_steps));
    lines.join("\n")
}

fn numbered_steps(steps: &[String]) -> Vec<String> {
    if steps.is_empty() {
        return vec![format!("  1. {FALLBACK_STEP}")];
    }

    steps
        .iter()
        .enumerate()
        .map(|(index, step)| format!("  {}. {step}", index + 1))
        .collect()
}

#[cfg(test)]
mod tests {
    use splitbook_client::ClientError;

    use super::{numbered_steps, render_error};

    #[test]
    fn renders_standard_error_layout() {
        let error = ClientError::invalid_argument_with_recovery(
            "bad input",
            vec!["run splitbook --help".to_string()],
        );

        let rendered = render_error(&error);
        assert!(rendered.starts_with("Something went wrong, but it's easy to fix."));
        assert!(rendered.contains("  Error:    invalid_argument"));
        assert!(rendered.contains("  Details:  bad input"));
        assert!(rendered.contains("What to do next:"));
        assert!(rendered.contains("  1. run splitbook --help"));
    }

    #[test]
    fn renders_generic_step_when_no_recovery_steps_exist() {
        let error = ClientError::new("ledger_locked", "database is busy", Vec::new());
        let rendered = render_error(&error);
        assert!(rendered.contains("  1. Retry the command."));
    }

    #[test]
    fn steps_are_numbered_in_order() {
        let steps = vec!["first".to_string(), "second".to_string()];
        assert_eq!(numbered_steps(&steps), vec![
            "  1. first".to_string(),
            "  2. second".to_string()
        ]);
    }
}
