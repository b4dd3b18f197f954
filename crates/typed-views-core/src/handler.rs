//! Handler traits for typed endpoints.
//!
//! A typed handler never sees the raw request. It receives the resolved,
//! validated positional arguments as [`Args`].

use crate::value::Args;

/// A function-style typed handler.
///
/// Implemented for every `Fn(Args) -> R` closure.
///
/// # Example
///
/// ```rust
/// use typed_views_core::{Args, Handler};
///
/// fn echo(args: Args) -> usize {
///     args.len()
/// }
///
/// assert_eq!(Handler::call(&echo, Args::default()), 0);
/// ```
pub trait Handler<R>: Send + Sync {
    /// Calls the handler with resolved arguments.
    fn call(&self, args: Args) -> R;
}

impl<F, R> Handler<R> for F
where
    F: Fn(Args) -> R + Send + Sync,
{
    fn call(&self, args: Args) -> R {
        self(args)
    }
}

/// A method-style typed handler that also receives its receiver.
pub trait MethodHandler<S, R>: Send + Sync {
    /// Calls the handler with the receiver and resolved arguments.
    fn call(&self, receiver: &S, args: Args) -> R;
}

impl<F, S, R> MethodHandler<S, R> for F
where
    F: Fn(&S, Args) -> R + Send + Sync,
{
    fn call(&self, receiver: &S, args: Args) -> R {
        self(receiver, args)
    }
}
