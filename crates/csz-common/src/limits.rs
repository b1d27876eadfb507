//! Centralized limits and thresholds.
//!
//! Single source of truth for every hard-coded bound the front end enforces,
//! so adversarial inputs degrade predictably instead of crashing.

/// Maximum recursion depth for the parser before the recursion guard bails
/// out and collapses the remaining input into a single error token.
pub const MAX_RECURSION_DEPTH: u32 = 1_000;

/// Remaining native stack (bytes) below which the recursion guard refuses to
/// recurse further even if the depth limit has not been reached.
pub const STACK_RED_ZONE: usize = 128 * 1024;

/// Maximum pre-allocation for the node arena, to avoid capacity overflow on
/// huge generated files.
pub const MAX_NODE_PREALLOC: usize = 5_000_000;

/// Bounded lookahead depth the token cursor supports without checkpointing.
pub const MAX_PEEK_DEPTH: usize = 8;
