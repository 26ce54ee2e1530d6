//! Pause policies for cooperative scheduling.
//!
//! The parser asks its policy once per token whether to suspend. The policy
//! is the only scheduling decision point: the parser keeps no timers and
//! no budgets of its own. Any `FnMut() -> bool` closure is a policy, so a
//! host can pass its own "instructions used this tick" check directly.

/// Decides, once per token, whether the parser suspends now.
pub trait PausePolicy {
    fn should_pause(&mut self) -> bool;
}

impl<F> PausePolicy for F
where
    F: FnMut() -> bool,
{
    #[inline]
    fn should_pause(&mut self) -> bool {
        self()
    }
}

/// Never pauses; one `resume` call runs the whole parse.
#[derive(Debug, Clone, Copy, Default)]
pub struct Never;

impl PausePolicy for Never {
    #[inline]
    fn should_pause(&mut self) -> bool {
        false
    }
}

/// Pauses after every token.
#[derive(Debug, Clone, Copy, Default)]
pub struct EveryToken;

impl PausePolicy for EveryToken {
    #[inline]
    fn should_pause(&mut self) -> bool {
        true
    }
}

/// Pauses after every `budget` tokens.
#[derive(Debug, Clone, Copy)]
pub struct TokenBudget {
    budget: usize,
    spent: usize,
}

impl TokenBudget {
    /// A budget of zero behaves like a budget of one.
    pub fn new(budget: usize) -> Self {
        Self {
            budget: budget.max(1),
            spent: 0,
        }
    }

    #[inline]
    pub fn budget(&self) -> usize {
        self.budget
    }
}

impl PausePolicy for TokenBudget {
    fn should_pause(&mut self) -> bool {
        self.spent += 1;
        if self.spent >= self.budget {
            self.spent = 0;
            true
        } else {
            false
        }
    }
}
