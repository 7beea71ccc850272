//! Commission governance handlers

use crate::api::rest::extract::{enum_filter, required, ApiJson, ApiQuery};
use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};
use crate::storage::{ProposalFilter, ProposalStorage};
use axum::{extract::State, http::StatusCode, Json};
use rideshift_types::{CommissionProposal, ProposalId, ProposalPatch, ProposalStatus, VoteAction};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalQuery {
    pub status: Option<String>,
    pub proposer_id: Option<String>,
}

pub async fn list_proposals(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ProposalQuery>,
) -> ApiResult<Json<Vec<CommissionProposal>>> {
    let Some(status) = enum_filter(query.status.as_deref()) else {
        return Ok(Json(Vec::new()));
    };
    let filter = ProposalFilter {
        status,
        proposer_id: query.proposer_id.filter(|s| !s.is_empty()),
    };
    Ok(Json(state.storage.list_proposals(&filter).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProposalRequest {
    pub proposer_id: Option<String>,
    pub new_rate: Option<f64>,
}

/// Open a commission rate proposal
pub async fn create_proposal(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateProposalRequest>,
) -> ApiResult<(StatusCode, Json<CommissionProposal>)> {
    let proposer_id = required(request.proposer_id, "proposerId")?;
    let new_rate = request
        .new_rate
        .ok_or_else(|| ApiError::Validation("newRate is required".to_string()))?;

    let proposal = CommissionProposal::open(proposer_id, new_rate)?;
    let proposal = state.storage.insert_proposal(proposal).await?;

    tracing::info!(
        proposal_id = %proposal.proposal_id,
        proposer_id = %proposal.proposer_id,
        new_rate = proposal.new_rate,
        "Proposal opened"
    );

    Ok((StatusCode::CREATED, Json(proposal)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateProposalRequest {
    pub proposal_id: Option<String>,
    pub new_rate: Option<f64>,
    pub status: Option<ProposalStatus>,
}

/// Amend the rate or resolve a pending proposal
pub async fn update_proposal(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<UpdateProposalRequest>,
) -> ApiResult<Json<CommissionProposal>> {
    let proposal_id = ProposalId::new(required(request.proposal_id, "proposalId")?);
    let patch = ProposalPatch {
        new_rate: request.new_rate,
        status: request.status,
    };

    let proposal = state.storage.update_proposal(&proposal_id, patch).await?;

    tracing::info!(
        proposal_id = %proposal_id,
        status = %proposal.status,
        "Updated proposal"
    );

    Ok(Json(proposal))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub proposal_id: Option<String>,
    pub voter_id: Option<String>,
    pub action: Option<String>,
}

/// Cast a `support` or `oppose` vote
pub async fn vote_on_proposal(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<VoteRequest>,
) -> ApiResult<Json<CommissionProposal>> {
    let proposal_id = ProposalId::new(required(request.proposal_id, "proposalId")?);
    let voter_id = required(request.voter_id, "voterId")?;
    let action: VoteAction = required(request.action, "action")?.parse()?;

    let proposal = state.storage.cast_vote(&proposal_id, action).await?;

    tracing::info!(
        proposal_id = %proposal_id,
        voter_id = %voter_id,
        vote_count = proposal.vote_count,
        "Vote recorded"
    );

    Ok(Json(proposal))
}
