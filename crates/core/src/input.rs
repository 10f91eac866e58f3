use timesweep_protocol::TimesweepInput;

use crate::error::TimesweepError;

/// Parse a JSON input document.
pub fn parse_input(data: &[u8]) -> Result<TimesweepInput, TimesweepError> {
    let input: TimesweepInput = serde_json::from_slice(data)?;
    input.config.validate()?;
    tracing::debug!(
        edges = input.tree_edges.len(),
        records = input.clonal_prev.len(),
        perturbations = input.perturbations.len(),
        "parsed input document"
    );
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_config() {
        let doc = br#"{"tree_edges": [], "clonal_prev": [], "config": {"threshold": 2}}"#;
        assert!(matches!(parse_input(doc), Err(TimesweepError::Config(_))));
    }

    #[test]
    fn rejects_bad_json() {
        assert!(matches!(parse_input(b"{"), Err(TimesweepError::Json(_))));
    }

    #[test]
    fn accepts_defaults() {
        let doc = br#"{"tree_edges": [{"source": "A", "target": "B"}], "clonal_prev": []}"#;
        let input = parse_input(doc).unwrap();
        assert_eq!(input.tree_edges.len(), 1);
    }
}
