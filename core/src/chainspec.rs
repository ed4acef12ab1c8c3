//! Consensus-critical configuration supplied by the node's chainspec.

use serde::{Deserialize, Serialize};

/// Configuration values the execution core reads at every height-gated
/// branch point.
///
/// The two heights are activation points for behavior revisions that are
/// consensus-observable: replaying a historical block must use the behavior
/// that was live when the block was produced, so these values come from
/// configuration and are never hard-coded at the branch sites.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
// Disallow unknown fields to ensure config files contain valid keys.
#[serde(deny_unknown_fields)]
pub struct ChainConfig {
    /// The identifier of the chain this node validates.
    pub chain_id: u32,

    /// Height at which the revised binary-payload loader and the structured
    /// execution-result event format activate. At and below this height the
    /// legacy loaders and the legacy event format remain in force.
    pub optimize_height: u64,

    /// Height at which the revised execution balance pre-check and the
    /// gas-limit clamp activate.
    pub transaction_optimize_height: u64,
}
