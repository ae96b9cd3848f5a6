//! Proposal validation.
//!
//! Every check runs and every violation is reported; nothing is clamped.
//! A proposal that passes can be applied without further checks.

use super::proposal::{CreatePoolProposal, EditPoolParamsProposal};
use tracing::warn;
use vamm_domain::validation::check_reserves;
use vamm_domain::{
    AssetPair, Pool, PoolParams, ProposalField, Result, VammError, Violation, Violations,
};

/// Validates a create-pool proposal and builds the pool it describes.
///
/// # Errors
/// Returns `InvalidProposal` listing every violated constraint.
pub fn validate_create_pool(proposal: &CreatePoolProposal) -> Result<Pool> {
    let mut violations = Violations::new();
    check_title(&proposal.title, &mut violations);
    let pair = parse_pair(&proposal.pair, &mut violations);
    check_reserves(
        proposal.quote_asset_reserve,
        proposal.base_asset_reserve,
        &mut violations,
    );
    proposal.params().check(&mut violations);
    finish(&proposal.pair, violations)?;

    let pair = pair.ok_or_else(|| VammError::invariant("pair accepted without parsing"))?;
    Pool::new(
        pair,
        proposal.quote_asset_reserve,
        proposal.base_asset_reserve,
        proposal.params(),
    )
}

/// Validates a parameter-edit proposal.
///
/// # Errors
/// Returns `InvalidProposal` listing every violated constraint.
pub fn validate_edit_pool(proposal: &EditPoolParamsProposal) -> Result<(AssetPair, PoolParams)> {
    let mut violations = Violations::new();
    check_title(&proposal.title, &mut violations);
    let pair = parse_pair(&proposal.pair, &mut violations);
    proposal.params.check(&mut violations);
    finish(&proposal.pair, violations)?;

    let pair = pair.ok_or_else(|| VammError::invariant("pair accepted without parsing"))?;
    Ok((pair, proposal.params))
}

fn check_title(title: &str, violations: &mut Violations) {
    if title.trim().is_empty() {
        violations.push(Violation::new(ProposalField::Title, "must not be empty"));
    }
}

fn parse_pair(raw: &str, violations: &mut Violations) -> Option<AssetPair> {
    match raw.parse::<AssetPair>() {
        Ok(pair) => Some(pair),
        Err(err) => {
            violations.push(Violation::new(ProposalField::Pair, err.to_string()));
            None
        }
    }
}

fn finish(pair: &str, violations: Violations) -> Result<()> {
    if !violations.is_empty() {
        warn!(pair = %pair, violations = %violations, "Proposal rejected");
    }
    violations.into_result()
}
