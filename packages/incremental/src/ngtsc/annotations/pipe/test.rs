// Pipe Symbol Tests

use super::*;

#[test]
fn should_detect_pipe_name_change() {
    assert!(PipeSymbol::new("date").is_public_api_affected(&PipeSymbol::new("formatDate")));
}

#[test]
fn should_be_unaffected_with_same_name() {
    assert!(!PipeSymbol::new("date").is_public_api_affected(&PipeSymbol::new("date")));
}
