//! Epsilon-based comparison of `f64` values.
//!
//! The process-wide default precision is read once from the
//! `LATTICES_PRECISION` environment variable (decimal digits, default 9).
//! [`NumericalContext::with`] overrides it for the current thread while a
//! closure runs.

use std::cell::Cell;
use std::fmt;
use std::sync::OnceLock;

use approx::AbsDiffEq;

const PRECISION_ENV: &str = "LATTICES_PRECISION";
const DEFAULT_PRECISION: u32 = 9;

thread_local! {
    static CURRENT: Cell<Option<NumericalContext>> = const { Cell::new(None) };
}

/// Tolerance used when comparing `f64` values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericalContext {
    epsilon: f64,
}

impl NumericalContext {
    /// Exact comparison.
    pub const ZERO_EPSILON: Self = Self { epsilon: 0.0 };

    /// Context with tolerance `|epsilon|`.
    pub fn new(epsilon: f64) -> Self {
        Self {
            epsilon: epsilon.abs(),
        }
    }

    /// Context with tolerance `10^-digits`.
    pub fn of_precision(digits: u32) -> Self {
        Self::new(10f64.powi(-(digits.min(i32::MAX as u32) as i32)))
    }

    #[inline]
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// The process-wide default, initialized from `LATTICES_PRECISION`.
    pub fn default_context() -> Self {
        static DEFAULT: OnceLock<NumericalContext> = OnceLock::new();
        *DEFAULT.get_or_init(|| Self::of_precision(env_precision()))
    }

    /// The context active on the current thread.
    pub fn get() -> Self {
        CURRENT
            .with(Cell::get)
            .unwrap_or_else(Self::default_context)
    }

    /// Replace the context of the current thread until [`reset`](Self::reset).
    pub fn set(context: Self) {
        CURRENT.with(|c| c.set(Some(context)));
    }

    /// Fall back to the process-wide default on the current thread.
    pub fn reset() {
        CURRENT.with(|c| c.set(None));
    }

    /// Run `f` with `context` active on the current thread.
    ///
    /// The previous context is restored when `f` returns or unwinds.
    pub fn with<R, F>(context: Self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let _restore = Restore {
            previous: CURRENT.with(|c| c.replace(Some(context))),
        };
        f()
    }

    pub fn equals(&self, a: f64, b: f64) -> bool {
        a == b || a.abs_diff_eq(&b, self.epsilon)
    }

    pub fn is_zero(&self, a: f64) -> bool {
        self.equals(a, 0.0)
    }

    pub fn is_not_zero(&self, a: f64) -> bool {
        !self.is_zero(a)
    }

    pub fn is_one(&self, a: f64) -> bool {
        self.equals(a, 1.0)
    }

    pub fn is_greater_zero(&self, a: f64) -> bool {
        a.abs() > self.epsilon && a > 0.0
    }

    pub fn is_smaller_zero(&self, a: f64) -> bool {
        a.abs() > self.epsilon && a < 0.0
    }
}

impl Default for NumericalContext {
    fn default() -> Self {
        Self::default_context()
    }
}

impl fmt::Display for NumericalContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NumericalContext[epsilon={:e}]", self.epsilon)
    }
}

struct Restore {
    previous: Option<NumericalContext>,
}

impl Drop for Restore {
    fn drop(&mut self) {
        CURRENT.with(|c| c.set(self.previous));
    }
}

fn env_precision() -> u32 {
    match std::env::var(PRECISION_ENV) {
        Ok(value) => value.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(
                variable = PRECISION_ENV,
                value = %value,
                default = DEFAULT_PRECISION,
                "invalid_precision"
            );
            DEFAULT_PRECISION
        }),
        Err(_) => DEFAULT_PRECISION,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    #[test]
    fn test_equals() {
        let ctx = NumericalContext::new(1e-6);
        assert!(ctx.equals(1.0, 1.0 + 1e-7));
        assert!(!ctx.equals(1.0, 1.0 + 1e-5));
        assert!(ctx.equals(f64::INFINITY, f64::INFINITY));
        assert!(!ctx.equals(f64::NAN, f64::NAN));
        assert!(ctx.is_zero(-1e-7));
        assert!(ctx.is_not_zero(1e-5));
        assert!(ctx.is_one(1.0 - 1e-7));
    }

    #[test]
    fn test_sign_checks() {
        let ctx = NumericalContext::new(1e-3);
        assert!(ctx.is_greater_zero(0.01));
        assert!(!ctx.is_greater_zero(0.0001));
        assert!(ctx.is_smaller_zero(-0.01));
        assert!(!ctx.is_smaller_zero(-0.0001));
        assert!(!ctx.is_smaller_zero(0.01));
    }

    #[test]
    fn test_negative_epsilon_is_absolute() {
        assert_eq!(NumericalContext::new(-0.5).epsilon(), 0.5);
        assert!((NumericalContext::of_precision(3).epsilon() - 1e-3).abs() < 1e-18);
    }

    #[test]
    fn test_with_restores_previous() {
        let outer = NumericalContext::new(0.1);
        let inner = NumericalContext::new(0.2);
        NumericalContext::with(outer, || {
            assert_eq!(NumericalContext::get(), outer);
            let eps = NumericalContext::with(inner, || NumericalContext::get().epsilon());
            assert_eq!(eps, 0.2);
            assert_eq!(NumericalContext::get(), outer);
        });
        assert_eq!(NumericalContext::get(), NumericalContext::default_context());
    }

    #[test]
    fn test_with_restores_on_unwind() {
        let result = catch_unwind(AssertUnwindSafe(|| {
            NumericalContext::with(NumericalContext::ZERO_EPSILON, || panic!("boom"))
        }));
        assert!(result.is_err());
        assert_eq!(NumericalContext::get(), NumericalContext::default_context());
    }

    #[test]
    fn test_set_and_reset() {
        NumericalContext::set(NumericalContext::new(0.25));
        assert_eq!(NumericalContext::get().epsilon(), 0.25);
        NumericalContext::reset();
        assert_eq!(NumericalContext::get(), NumericalContext::default());
    }

    #[test]
    fn test_override_is_thread_confined() {
        NumericalContext::with(NumericalContext::new(0.5), || {
            let other = std::thread::spawn(NumericalContext::get).join().unwrap();
            assert_eq!(other, NumericalContext::default_context());
        });
    }
}
