//! Commission rate governance
//!
//! Proposals carry a single signed tally. Votes are accepted only while the
//! proposal is pending; nothing in the tally resolves a proposal, resolution
//! is an explicit status update.

use crate::error::{DomainError, DomainResult};
use crate::fare::validate_commission_rate;
use crate::ids::ProposalId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionProposal {
    pub proposal_id: ProposalId,
    pub proposer_id: String,
    pub new_rate: f64,
    pub status: ProposalStatus,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub creation_timestamp: DateTime<Utc>,
    pub vote_count: i64,
}

impl CommissionProposal {
    /// Open a pending proposal; the rate must lie in `[0.05, 0.25]`.
    pub fn open(proposer_id: impl Into<String>, new_rate: f64) -> DomainResult<Self> {
        let new_rate = validate_commission_rate(new_rate)?;
        Ok(Self {
            proposal_id: ProposalId::generate(),
            proposer_id: proposer_id.into(),
            new_rate,
            status: ProposalStatus::Pending,
            creation_timestamp: Utc::now(),
            vote_count: 0,
        })
    }

    pub fn vote(&mut self, action: VoteAction) -> DomainResult<()> {
        if self.status != ProposalStatus::Pending {
            return Err(DomainError::invalid_state(format!(
                "Can only vote on pending proposals (current status: {})",
                self.status
            )));
        }
        match action {
            VoteAction::Support => self.vote_count += 1,
            VoteAction::Oppose => self.vote_count -= 1,
        }
        Ok(())
    }

    pub fn apply_patch(&mut self, patch: ProposalPatch) -> DomainResult<()> {
        if self.status != ProposalStatus::Pending
            && (patch.new_rate.is_some() || patch.status.is_some())
        {
            return Err(DomainError::invalid_state(format!(
                "Proposal is already {}",
                self.status
            )));
        }
        let new_rate = patch.new_rate.map(validate_commission_rate).transpose()?;
        if let Some(rate) = new_rate {
            self.new_rate = rate;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ProposalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProposalStatus::Pending => "pending",
            ProposalStatus::Approved => "approved",
            ProposalStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProposalStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ProposalStatus::Pending),
            "approved" => Ok(ProposalStatus::Approved),
            "rejected" => Ok(ProposalStatus::Rejected),
            other => Err(DomainError::validation(format!(
                "invalid proposal status '{}'; expected one of: pending, approved, rejected",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteAction {
    Support,
    Oppose,
}

impl FromStr for VoteAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "support" => Ok(VoteAction::Support),
            "oppose" => Ok(VoteAction::Oppose),
            other => Err(DomainError::unknown_action(other, &["support", "oppose"])),
        }
    }
}

/// Fields a full update may overwrite
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProposalPatch {
    #[serde(default)]
    pub new_rate: Option<f64>,
    #[serde(default)]
    pub status: Option<ProposalStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn boundary_rates_are_accepted() {
        assert!(CommissionProposal::open("p", 0.05).is_ok());
        assert!(CommissionProposal::open("p", 0.25).is_ok());
    }

    #[test]
    fn new_proposal_is_pending_with_zero_votes() {
        let proposal = CommissionProposal::open("p", 0.12).unwrap();
        assert_eq!(proposal.status, ProposalStatus::Pending);
        assert_eq!(proposal.vote_count, 0);
    }

    #[test]
    fn oppose_drives_tally_negative() {
        let mut proposal = CommissionProposal::open("p", 0.12).unwrap();
        proposal.vote(VoteAction::Oppose).unwrap();
        assert_eq!(proposal.vote_count, -1);
        proposal.vote(VoteAction::Oppose).unwrap();
        proposal.vote(VoteAction::Support).unwrap();
        assert_eq!(proposal.vote_count, -1);
    }

    #[test]
    fn votes_rejected_once_resolved() {
        for status in [ProposalStatus::Approved, ProposalStatus::Rejected] {
            let mut proposal = CommissionProposal::open("p", 0.12).unwrap();
            proposal.status = status;
            let err = proposal.vote(VoteAction::Support).unwrap_err();
            assert!(matches!(err, DomainError::InvalidState(_)));
            assert_eq!(proposal.vote_count, 0);
        }
    }

    #[test]
    fn patch_resolves_pending_and_freezes_afterwards() {
        let mut proposal = CommissionProposal::open("p", 0.12).unwrap();
        proposal
            .apply_patch(ProposalPatch {
                new_rate: Some(0.10),
                status: Some(ProposalStatus::Approved),
            })
            .unwrap();
        assert_eq!(proposal.new_rate, 0.10);
        assert_eq!(proposal.status, ProposalStatus::Approved);

        let err = proposal
            .apply_patch(ProposalPatch {
                new_rate: None,
                status: Some(ProposalStatus::Pending),
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));
    }

    #[test]
    fn patch_with_bad_rate_changes_nothing() {
        let mut proposal = CommissionProposal::open("p", 0.12).unwrap();
        let err = proposal
            .apply_patch(ProposalPatch {
                new_rate: Some(0.5),
                status: Some(ProposalStatus::Approved),
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::OutOfRange { .. }));
        assert_eq!(proposal.status, ProposalStatus::Pending);
        assert_eq!(proposal.new_rate, 0.12);
    }

    proptest! {
        #[test]
        fn tally_equals_supports_minus_opposes(votes in proptest::collection::vec(any::<bool>(), 0..64)) {
            let mut proposal = CommissionProposal::open("p", 0.15).unwrap();
            for support in &votes {
                let action = if *support { VoteAction::Support } else { VoteAction::Oppose };
                proposal.vote(action).unwrap();
            }
            let supports = votes.iter().filter(|v| **v).count() as i64;
            let opposes = votes.len() as i64 - supports;
            prop_assert_eq!(proposal.vote_count, supports - opposes);
        }
    }
}
