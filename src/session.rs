//! State of an interactive analysis session.
//!
//! The library has no loop of its own. A front end asks for a selection while
//! the session is [`SessionState::Prompting`] and feeds back the user's
//! restart answer as a [`ContinueOrStop`].

/// Whether another analysis round should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContinueOrStop {
    Continue,
    Stop,
}

impl ContinueOrStop {
    /// "yes" or "y" (any case) continues; anything else stops.
    pub fn from_answer(answer: &str) -> Self {
        match answer.trim().to_lowercase().as_str() {
            "yes" | "y" => ContinueOrStop::Continue,
            _ => ContinueOrStop::Stop,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Prompting,
    Terminated,
}

impl SessionState {
    pub fn advance(self, decision: ContinueOrStop) -> Self {
        match (self, decision) {
            (SessionState::Prompting, ContinueOrStop::Continue) => SessionState::Prompting,
            _ => SessionState::Terminated,
        }
    }

    pub fn is_terminated(self) -> bool {
        self == SessionState::Terminated
    }
}

/// Normalises `input` and returns it when it is one of `options`.
pub fn parse_choice<S: AsRef<str>>(input: &str, options: &[S]) -> Option<String> {
    let input = input.trim().to_lowercase();
    options
        .iter()
        .any(|o| o.as_ref() == input)
        .then_some(input)
}
