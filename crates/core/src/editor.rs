use crate::{
    interpreter,
    types::{Breakdown, BreakdownField, ParsedResult, PresentationMode},
};

/// Parsed model output plus the fields a user may edit afterwards.
///
/// Edits never touch the raw response; `final_prompt` is what gets copied
/// and saved to history.
#[derive(Debug, Clone)]
pub struct ResultView {
    raw: String,
    parsed: ParsedResult,
    mode: PresentationMode,
    breakdown: Option<Breakdown>,
    final_prompt: String,
}

impl ResultView {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let parsed = interpreter::parse(&raw);
        Self {
            mode: parsed.presentation_mode(),
            breakdown: parsed.breakdown.clone(),
            final_prompt: parsed.final_prompt.clone(),
            parsed,
            raw,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn parsed(&self) -> &ParsedResult {
        &self.parsed
    }

    pub fn mode(&self) -> PresentationMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: PresentationMode) {
        self.mode = mode;
    }

    pub fn breakdown(&self) -> Option<&Breakdown> {
        self.breakdown.as_ref()
    }

    /// Returns false when there is no breakdown to edit.
    pub fn set_field(&mut self, field: BreakdownField, value: impl Into<String>) -> bool {
        match self.breakdown.as_mut() {
            Some(breakdown) => {
                breakdown.set(field, value.into());
                true
            }
            None => false,
        }
    }

    pub fn final_prompt(&self) -> &str {
        &self.final_prompt
    }

    pub fn set_final_prompt(&mut self, prompt: impl Into<String>) {
        self.final_prompt = prompt.into();
    }

    /// Rebuild the final prompt from the (possibly edited) breakdown.
    pub fn resync(&mut self) {
        if let Some(breakdown) = &self.breakdown {
            self.final_prompt = breakdown.compose();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUILDER_OUTPUT: &str = "Cat on a fence.\n```json\n{\"breakdown\": {\"subject\": \"A cat\", \"action\": \"sitting\", \"environment\": \"\", \"lighting\": \"soft light\", \"camera\": \"\"}}\n```";

    #[test]
    fn edits_do_not_change_prompt_until_resync() {
        let mut view = ResultView::new(BUILDER_OUTPUT);
        assert_eq!(view.mode(), PresentationMode::Builder);
        assert_eq!(view.final_prompt(), "Cat on a fence.");

        assert!(view.set_field(BreakdownField::Action, "jumping"));
        assert_eq!(view.final_prompt(), "Cat on a fence.");

        view.resync();
        assert_eq!(view.final_prompt(), "A cat, jumping, soft light");
        assert_eq!(view.parsed().breakdown.as_ref().unwrap().action, "sitting");
        assert_eq!(view.raw(), BUILDER_OUTPUT);
    }

    #[test]
    fn resync_without_breakdown_is_a_no_op() {
        let mut view = ResultView::new("plain words");
        assert!(!view.set_field(BreakdownField::Subject, "x"));
        view.set_final_prompt("hand edited");
        view.resync();
        assert_eq!(view.final_prompt(), "hand edited");
    }
}
