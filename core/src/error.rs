use thiserror::Error;

/// Domain errors raised by the converter and the intake store.
///
/// Storage functions return `anyhow::Result`; these travel inside the
/// `anyhow::Error` and can be recovered with `downcast_ref::<HydrationError>()`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HydrationError {
    #[error("Invalid unit '{0}'. Must be 'ml' or 'oz'")]
    InvalidUnit(String),

    #[error("Invalid amount {0}. Must be a non-negative number")]
    InvalidAmount(f64),
}
