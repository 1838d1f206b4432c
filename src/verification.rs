use log::debug;

/// The human-verification widget that gates submissions.
///
/// A solved challenge yields one response token. Tokens are single use, so
/// callers reset the widget after every submission that sent one.
pub trait Verifier {
    /// Show a fresh, unsolved challenge.
    fn render(&mut self);

    fn token(&self) -> Option<String>;

    fn reset(&mut self);

    fn is_ready(&self) -> bool {
        self.token().is_some()
    }
}

/// In-process widget state, driven by the widget's callbacks.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ChallengeSlot {
    token: Option<String>,
    renders: u32,
}

impl ChallengeSlot {
    pub fn new() -> ChallengeSlot {
        ChallengeSlot::default()
    }

    /// Slot that already holds a solved token, e.g. one passed on the
    /// command line.
    pub fn solved(token: impl Into<String>) -> ChallengeSlot {
        let mut slot = ChallengeSlot::new();
        slot.solve(token);
        slot
    }

    pub fn solve(&mut self, token: impl Into<String>) {
        let token = token.into();
        self.token = if token.trim().is_empty() {
            None
        } else {
            Some(token)
        };
    }

    pub fn expire(&mut self) {
        debug!("challenge expired");
        self.token = None;
    }

    pub fn fail(&mut self) {
        debug!("challenge errored");
        self.token = None;
    }

    pub fn renders(&self) -> u32 {
        self.renders
    }
}

impl Verifier for ChallengeSlot {
    fn render(&mut self) {
        self.renders += 1;
        self.token = None;
    }

    fn token(&self) -> Option<String> {
        self.token.clone()
    }

    fn reset(&mut self) {
        self.render();
    }
}
