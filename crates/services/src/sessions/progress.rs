/// Aggregated view of an open lesson session, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub step: u8,
    pub quiz_index: usize,
    pub total_questions: usize,
    pub answered: usize,
    pub result_revealed: bool,
}
