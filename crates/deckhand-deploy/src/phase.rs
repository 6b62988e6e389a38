//! Deploy phase state machine
//!
//! `idle → detecting → fetching → resolving (optional) → committing →
//! done | error`. Every transition goes through [`DeployPhase::transition_to`]
//! so an out-of-order jump is a programming error surfaced as
//! `DomainError::InvalidPhase`, not silently accepted.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;

use deckhand_core::domain::errors::DomainError;

/// Phases of a deploy attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployPhase {
    /// No attempt in progress
    Idle,
    /// Computing the candidate change set from the workspace snapshot
    Detecting,
    /// Probing remote version ids and running baseline reconciliation
    Fetching,
    /// Waiting on conflict decisions (only entered when conflicts remain)
    Resolving,
    /// Executing the sequential write batch
    Committing,
    /// Terminal: the attempt ran to completion (including "no changes"
    /// and "cancelled")
    Done,
    /// Terminal: the attempt failed before any write
    Error,
}

impl DeployPhase {
    /// Whether `target` is a legal next phase.
    pub fn can_transition_to(&self, target: DeployPhase) -> bool {
        use DeployPhase::*;
        matches!(
            (self, target),
            (Idle, Detecting)
                | (Detecting, Fetching)
                | (Detecting, Done)
                | (Detecting, Error)
                | (Fetching, Resolving)
                | (Fetching, Committing)
                | (Fetching, Done)
                | (Fetching, Error)
                | (Resolving, Committing)
                | (Resolving, Done)
                | (Resolving, Error)
                | (Committing, Done)
                | (Committing, Error)
        )
    }

    /// Moves to `target`, rejecting illegal jumps.
    pub fn transition_to(&mut self, target: DeployPhase) -> Result<(), DomainError> {
        if !self.can_transition_to(target) {
            return Err(DomainError::InvalidPhase {
                from: self.to_string(),
                to: target.to_string(),
            });
        }
        info!(from = %self, to = %target, "Deploy phase transition");
        *self = target;
        Ok(())
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, DeployPhase::Done | DeployPhase::Error)
    }
}

impl fmt::Display for DeployPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DeployPhase::Idle => "idle",
            DeployPhase::Detecting => "detecting",
            DeployPhase::Fetching => "fetching",
            DeployPhase::Resolving => "resolving",
            DeployPhase::Committing => "committing",
            DeployPhase::Done => "done",
            DeployPhase::Error => "error",
        };
        write!(f, "{}", s)
    }
}
