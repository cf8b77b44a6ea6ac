/// Stable hash of the mask inputs.
pub mod fingerprint;
/// Stripe layout and the memoizing generator.
pub mod generator;
