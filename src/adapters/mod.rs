/// Adapters layer - Infrastructure implementations
///
/// This layer contains concrete implementations of the outbound ports:
/// the on-disk cache store, external tool invocation, console progress
/// and report formatting.
pub mod outbound;
