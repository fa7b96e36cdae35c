//! Chainable container for values that may have failed to compute
//!
//! A [`Maybe<T>`] holds either a value of `T` or an [`Empty`] explaining why
//! there is no value. Functions are applied to the wrapped value inside a fault
//! boundary: a panic (or, for the `try_` operations, an `Err`) never escapes,
//! it becomes an `Empty` that travels down the chain as data. Once a container
//! is empty, every later application short-circuits and returns that same
//! `Empty` without calling its function.
//!
//! | operation | function receives | returns |
//! |---|---|---|
//! | `apply` | a clone of the value | `Result<V, Empty>` |
//! | `apply_spread` | the clone's tuple elements as arguments | `Result<V, Empty>` |
//! | `apply_ref` | `&T`, no clone | `Result<V, Empty>` |
//! | `try_apply` | a clone, function returns `Result` | `Result<V, Empty>` |
//! | `try_apply_ref` | `&T`, function returns `Result` | `Result<V, Empty>` |
//! | `transform*` | as the matching apply | `Maybe<V>` |
//! | `run*` | as the matching apply | the original `Maybe<T>` |
//!
//! # Example
//!
//! ```
//! use guarded_dsp::Maybe;
//!
//! let doubled = Maybe::new(5).transform(|x| x * 2).transform(|x| x + 1);
//! assert_eq!(doubled.get(), Ok(&11));
//!
//! let broken = Maybe::new(0).transform(|x: i32| 1 / x);
//! assert!(!broken.is_present());
//! assert!(broken.get().unwrap_err().reason().contains("divide by zero"));
//! ```

mod empty;
pub mod guard;
mod spread;

pub use empty::Empty;
pub use spread::Spread;

use crate::config::GuardConfig;
use guard::{guard, try_guard};
use std::fmt::{self, Display};
use std::io::{self, Write};

/// A value of `T`, or an [`Empty`] describing why the value is missing
#[derive(Debug, Clone, PartialEq)]
pub struct Maybe<T> {
    payload: Result<T, Empty>,
    config: GuardConfig,
}

impl<T> Maybe<T> {
    /// Wrap `value` with the default [`GuardConfig`]
    pub fn new(value: T) -> Self {
        Self::with_config(value, GuardConfig::default())
    }

    /// Wrap `value` with an explicit [`GuardConfig`]
    pub fn with_config(value: T, config: GuardConfig) -> Self {
        Self {
            payload: Ok(value),
            config,
        }
    }

    /// Fault-capture settings of this container
    pub fn config(&self) -> GuardConfig {
        self.config
    }

    /// The raw payload: the value, or the `Empty` that replaced it
    pub fn get(&self) -> Result<&T, &Empty> {
        self.payload.as_ref()
    }

    /// Consume the container, returning the owned payload
    pub fn into_inner(self) -> Result<T, Empty> {
        self.payload
    }

    /// True iff the payload is a value rather than an `Empty`
    pub fn is_present(&self) -> bool {
        self.payload.is_ok()
    }

    /// `Maybe[ value:<type> = <value> ]`
    pub fn to_diagnostic_string(&self) -> String
    where
        T: fmt::Debug,
    {
        self.to_string()
    }

    /// Apply `f` to a borrow of the value, without cloning it
    pub fn apply_ref<V, F>(&self, f: F) -> Result<V, Empty>
    where
        F: FnOnce(&T) -> V,
    {
        let value = self.payload.as_ref().map_err(Clone::clone)?;
        guard(self.config, || f(value))
    }

    /// Apply a fallible `f` to a borrow of the value, without cloning it
    pub fn try_apply_ref<V, E, F>(&self, f: F) -> Result<V, Empty>
    where
        E: Display,
        F: FnOnce(&T) -> Result<V, E>,
    {
        let value = self.payload.as_ref().map_err(Clone::clone)?;
        try_guard(self.config, || f(value))
    }

    /// [`apply_ref`](Self::apply_ref), wrapping the outcome in a new container
    pub fn transform_ref<V, F>(&self, f: F) -> Maybe<V>
    where
        F: FnOnce(&T) -> V,
    {
        self.rewrap(self.apply_ref(f))
    }

    /// [`try_apply_ref`](Self::try_apply_ref), wrapping the outcome in a new container
    pub fn try_transform_ref<V, E, F>(&self, f: F) -> Maybe<V>
    where
        E: Display,
        F: FnOnce(&T) -> Result<V, E>,
    {
        self.rewrap(self.try_apply_ref(f))
    }

    /// [`apply_ref`](Self::apply_ref) for its side effects only
    ///
    /// A failure is written to standard error; the container is returned as it was.
    pub fn run_ref<V, F>(self, f: F) -> Self
    where
        F: FnOnce(&T) -> V,
    {
        let outcome = self.apply_ref(f);
        self.report(outcome, &mut io::stderr());
        self
    }

    fn rewrap<V>(&self, outcome: Result<V, Empty>) -> Maybe<V> {
        Maybe {
            payload: outcome,
            config: self.config,
        }
    }

    fn report<V, W: Write>(&self, outcome: Result<V, Empty>, sink: &mut W) {
        if let Err(empty) = outcome {
            // Write errors are ignored.
            let _ = if self.config.colored {
                writeln!(sink, "{empty}")
            } else {
                writeln!(sink, "{empty:#}")
            };
        }
    }
}

impl<T: Clone> Maybe<T> {
    /// Apply `f` to an independent clone of the value
    ///
    /// Returns the raw result of `f`. If `f` panics, the panic is captured and
    /// returned as an `Empty` whose reason holds the panic message and where it
    /// happened. If this container is already empty, `f` is not called and the
    /// existing `Empty` is returned.
    ///
    /// Mutations `f` makes to its argument are never visible through `self`.
    pub fn apply<V, F>(&self, f: F) -> Result<V, Empty>
    where
        F: FnOnce(T) -> V,
    {
        let value = self.payload.as_ref().map_err(Clone::clone)?;
        guard(self.config, || f(value.clone()))
    }

    /// Apply `f` with the elements of a cloned tuple as separate arguments
    ///
    /// ```
    /// use guarded_dsp::Maybe;
    ///
    /// let pair = Maybe::new((3, 4));
    /// assert_eq!(pair.apply_spread(|a: i32, b: i32| a + b), Ok(7));
    /// ```
    pub fn apply_spread<F>(&self, f: F) -> Result<F::Output, Empty>
    where
        F: Spread<T>,
    {
        let value = self.payload.as_ref().map_err(Clone::clone)?;
        guard(self.config, || f.call_spread(value.clone()))
    }

    /// Apply a fallible `f` to a clone of the value
    ///
    /// An `Err` is captured the same way a panic is, with its `Display` text as
    /// the reason.
    pub fn try_apply<V, E, F>(&self, f: F) -> Result<V, Empty>
    where
        E: Display,
        F: FnOnce(T) -> Result<V, E>,
    {
        let value = self.payload.as_ref().map_err(Clone::clone)?;
        try_guard(self.config, || f(value.clone()))
    }

    /// [`apply`](Self::apply), wrapping the outcome in a new container
    pub fn transform<V, F>(&self, f: F) -> Maybe<V>
    where
        F: FnOnce(T) -> V,
    {
        self.rewrap(self.apply(f))
    }

    /// [`apply_spread`](Self::apply_spread), wrapping the outcome in a new container
    pub fn transform_spread<F>(&self, f: F) -> Maybe<F::Output>
    where
        F: Spread<T>,
    {
        self.rewrap(self.apply_spread(f))
    }

    /// [`try_apply`](Self::try_apply), wrapping the outcome in a new container
    pub fn try_transform<V, E, F>(&self, f: F) -> Maybe<V>
    where
        E: Display,
        F: FnOnce(T) -> Result<V, E>,
    {
        self.rewrap(self.try_apply(f))
    }

    /// [`apply`](Self::apply) for its side effects only
    ///
    /// The result of `f` is discarded. If `f` fails, or this container is
    /// already empty, the diagnostic is written to standard error. The container
    /// is always returned unchanged.
    pub fn run<V, F>(self, f: F) -> Self
    where
        F: FnOnce(T) -> V,
    {
        self.run_to(f, &mut io::stderr())
    }

    /// [`run`](Self::run), writing the diagnostic to `sink`
    pub fn run_to<V, F, W>(self, f: F, sink: &mut W) -> Self
    where
        F: FnOnce(T) -> V,
        W: Write,
    {
        let outcome = self.apply(f);
        self.report(outcome, sink);
        self
    }

    /// [`apply_spread`](Self::apply_spread) for its side effects only
    pub fn run_spread<F>(self, f: F) -> Self
    where
        F: Spread<T>,
    {
        let outcome = self.apply_spread(f);
        self.report(outcome, &mut io::stderr());
        self
    }
}

impl<T> From<Result<T, Empty>> for Maybe<T> {
    fn from(payload: Result<T, Empty>) -> Self {
        Self {
            payload,
            config: GuardConfig::default(),
        }
    }
}

impl<T: fmt::Debug> Display for Maybe<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            Ok(value) => write!(
                f,
                "Maybe[ value:{} = {:?} ]",
                std::any::type_name::<T>(),
                value
            ),
            Err(empty) => write!(f, "Maybe[ value:Empty = {empty:#} ]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BacktraceMode;
    use std::cell::Cell;

    fn no_trace() -> GuardConfig {
        GuardConfig {
            backtrace: BacktraceMode::Off,
            colored: false,
            ..GuardConfig::default()
        }
    }

    #[test]
    fn test_identity() {
        let maybe = Maybe::new(vec![0.5f32, -0.25]);
        assert!(maybe.is_present());
        assert_eq!(maybe.get(), Ok(&vec![0.5f32, -0.25]));
        assert_eq!(maybe.into_inner(), Ok(vec![0.5f32, -0.25]));
    }

    #[test]
    fn test_apply_returns_raw_result() {
        let maybe = Maybe::new(21);
        assert_eq!(maybe.apply(|x| x * 2), Ok(42));
        assert_eq!(maybe.apply_ref(|x| x.to_string()), Ok("21".to_string()));
    }

    #[test]
    fn test_apply_captures_panic() {
        let maybe = Maybe::with_config(0, no_trace());
        let empty = maybe.apply(|x: i32| 10 / x).unwrap_err();
        assert!(empty.reason().contains("attempt to divide by zero"));
        // The receiver is untouched.
        assert_eq!(maybe.get(), Ok(&0));
    }

    #[test]
    fn test_sticky_failure_skips_later_functions() {
        let calls = Cell::new(0);
        let failed = Maybe::with_config(1, no_trace()).transform(|_: i32| -> i32 {
            panic!("first failure")
        });
        let first = failed.get().unwrap_err().clone();

        let second = failed.apply(|x| {
            calls.set(calls.get() + 1);
            x
        });
        let third = failed.transform_ref(|x| {
            calls.set(calls.get() + 1);
            *x
        });

        assert_eq!(calls.get(), 0);
        assert_eq!(second, Err(first.clone()));
        assert_eq!(third.into_inner(), Err(first));
    }

    #[test]
    fn test_spread_versus_single_argument() {
        let pair = Maybe::new((3, 4));
        assert_eq!(pair.apply_spread(|a: i32, b: i32| a + b), Ok(7));
        // Without spreading, the function sees the tuple itself.
        assert_eq!(pair.apply(|t: (i32, i32)| t), Ok((3, 4)));
        assert_eq!(pair.transform_spread(|a: i32, b: i32| a * b).get(), Ok(&12));
    }

    #[test]
    fn test_apply_isolates_mutation() {
        let original = vec![1, 2];
        let maybe = Maybe::new(original.clone());
        let len = maybe.apply(|mut v: Vec<i32>| {
            v.push(1);
            v.len()
        });
        assert_eq!(len, Ok(3));
        assert_eq!(maybe.get(), Ok(&original));
    }

    #[test]
    fn test_run_keeps_value_and_reports_once() {
        let mut sink = Vec::new();
        let maybe = Maybe::with_config(5, no_trace()).run_to(|x: i32| x / (x - 5), &mut sink);
        assert_eq!(maybe.get(), Ok(&5));

        let written = String::from_utf8(sink).unwrap();
        assert_eq!(written.matches("Empty since: ").count(), 1);
        assert!(written.contains("attempt to divide by zero"));
    }

    #[test]
    fn test_run_discards_successful_result() {
        let mut sink = Vec::new();
        let maybe = Maybe::new(5).run_to(|x| x * 100, &mut sink);
        assert_eq!(maybe.get(), Ok(&5));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_run_on_empty_reports_existing_failure() {
        let mut sink = Vec::new();
        let failed: Maybe<i32> = Maybe::from(Err(Empty::because("decode failed")));
        let failed = failed.run_to(|x| x, &mut sink);
        assert!(!failed.is_present());
        assert_eq!(
            String::from_utf8(sink).unwrap(),
            "\x1b[1;4;91mEmpty since\x1b[0;0m: decode failed\n"
        );
    }

    #[test]
    fn test_chaining() {
        let result = Maybe::new(5).transform(|x| x * 2).transform(|x| x + 1);
        assert_eq!(result.get(), Ok(&11));
    }

    #[test]
    fn test_transform_carries_config() {
        let config = no_trace();
        let maybe = Maybe::with_config(2.0f32, config).transform(|x| x.sqrt());
        assert_eq!(maybe.config(), config);
    }

    #[test]
    fn test_empty_propagates_through_get() {
        let maybe = Maybe::with_config(0, no_trace()).transform(|x: i32| 1 / x);
        assert!(!maybe.is_present());
        assert!(maybe.get().is_err());
    }

    #[test]
    fn test_try_apply_captures_err() {
        let maybe = Maybe::with_config(-1.0f32, no_trace());
        let result = maybe.try_apply(|x| {
            if x < 0.0 {
                Err(format!("negative gain {x}"))
            } else {
                Ok(x)
            }
        });
        assert_eq!(result, Err(Empty::because("negative gain -1")));
        assert!(!maybe.try_transform(|_| Err::<f32, _>("nope")).is_present());
    }

    #[test]
    fn test_diagnostic_string() {
        let maybe = Maybe::new(3u8);
        assert_eq!(maybe.to_diagnostic_string(), "Maybe[ value:u8 = 3 ]");

        let empty: Maybe<u8> = Maybe::from(Err(Empty::because("silence")));
        assert_eq!(
            empty.to_diagnostic_string(),
            "Maybe[ value:Empty = Empty since: silence ]"
        );
    }
}
