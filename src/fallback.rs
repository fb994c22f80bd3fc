//! Ordered fallback providers.
//!
//! A [FallbackChain] is a list of named steps tried in order. Each step either
//! produces a value, asks for the next step to be tried, or fails outright:
//!
//! ```
//! use keepsake::fallback::{Attempt, FallbackChain};
//!
//! let photo: Option<&str> = None;
//! let (step, value) = FallbackChain::new()
//!     .then("photo", || Ok(photo.map_or(Attempt::Next, Attempt::Ready)))
//!     .then("mockup", || Ok(Attempt::Next))
//!     .resolve_or("solid", "white")
//!     .unwrap();
//! assert_eq!((step, value), ("solid", "white"));
//! ```

use crate::ComposeError;
use tracing::debug;

/// Outcome of a single fallback step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt<T> {
    Ready(T),
    /// Nothing to offer, try the next step
    Next,
}

impl<T> From<Option<T>> for Attempt<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Attempt::Next, Attempt::Ready)
    }
}

type Step<'a, T> = Box<dyn FnOnce() -> Result<Attempt<T>, ComposeError> + 'a>;

pub struct FallbackChain<'a, T> {
    steps: Vec<(&'static str, Step<'a, T>)>,
}

impl<'a, T> Default for FallbackChain<'a, T> {
    fn default() -> Self {
        FallbackChain { steps: Vec::new() }
    }
}

impl<'a, T> FallbackChain<'a, T> {
    pub fn new() -> Self {
        FallbackChain::default()
    }

    /// Append a step. Steps run lazily and in the order they were added.
    pub fn then<F>(mut self, name: &'static str, step: F) -> Self
    where
        F: FnOnce() -> Result<Attempt<T>, ComposeError> + 'a,
    {
        self.steps.push((name, Box::new(step)));
        self
    }

    /// Run steps until one is ready. Errors stop the chain immediately; they
    /// are not a reason to try the next step.
    ///
    /// Returns the name of the step that produced the value, or [None] when
    /// every step passed.
    pub fn resolve(self) -> Result<Option<(&'static str, T)>, ComposeError> {
        for (name, step) in self.steps {
            match step()? {
                Attempt::Ready(value) => {
                    debug!(step = name, "fallback chain resolved");
                    return Ok(Some((name, value)));
                }
                Attempt::Next => debug!(step = name, "fallback step passed"),
            }
        }
        Ok(None)
    }

    /// Like [FallbackChain::resolve], with a final step that always succeeds
    pub fn resolve_or(self, name: &'static str, value: T) -> Result<(&'static str, T), ComposeError> {
        Ok(self.resolve()?.unwrap_or((name, value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn first_ready_step_wins() {
        let chain = FallbackChain::new()
            .then("a", || Ok(Attempt::Next))
            .then("b", || Ok(Attempt::Ready(2)))
            .then("c", || Ok(Attempt::Ready(3)));
        assert_eq!(chain.resolve().unwrap(), Some(("b", 2)));
    }

    #[test]
    fn later_steps_are_not_run() {
        let ran = Cell::new(false);
        let result = FallbackChain::new()
            .then("a", || Ok(Attempt::Ready(1)))
            .then("b", || {
                ran.set(true);
                Ok(Attempt::Ready(2))
            })
            .resolve()
            .unwrap();
        assert_eq!(result, Some(("a", 1)));
        assert!(!ran.get());
    }

    #[test]
    fn errors_stop_the_chain() {
        let result = FallbackChain::<u8>::new()
            .then("a", || Err(ComposeError::MissingRequiredAsset("qr")))
            .then("b", || Ok(Attempt::Ready(2)))
            .resolve();
        assert!(matches!(result, Err(ComposeError::MissingRequiredAsset("qr"))));
    }

    #[test]
    fn exhausted_chain_uses_the_default() {
        let chain = FallbackChain::new().then("a", || Ok(Attempt::from(None)));
        assert_eq!(chain.resolve_or("solid", 7).unwrap(), ("solid", 7));
        assert_eq!(FallbackChain::<u8>::new().resolve().unwrap(), None);
    }
}
