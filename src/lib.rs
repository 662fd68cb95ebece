/// The environment contract shared by every environment
pub mod env;

/// Error types
pub mod error;

/// The classroom environments
pub mod gym;

/// Action sources and the episode driver
pub mod policy;

/// Declared action and observation spaces
pub mod spaces;

/// One-shot proximity interactions
pub mod trigger;

/// Terminal rendering
#[cfg(feature = "viz")]
pub mod viz;

mod util;
