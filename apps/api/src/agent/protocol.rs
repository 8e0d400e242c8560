//! Turn protocol — an enforced state machine over the pipeline stages.
//!
//! The conversational controller (an LLM) proposes tool calls; it cannot
//! be trusted to sequence them. Every proposed invocation is authorized
//! here first: stages run in order, each at most within a bounded step
//! budget, and retrieval results can never reach the user unscored.

use std::collections::HashSet;

use thiserror::Error;
use uuid::Uuid;

use crate::agent::tools::ToolKind;
use crate::models::candidate::{CandidateRecord, ScoredCandidate, StructuredQuery};

/// Maximum tool invocations per turn. Exceeding it aborts the turn; a
/// mis-sequencing controller must not loop forever.
pub const STEP_BUDGET: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Idle,
    Extracting,
    Retrieving,
    Scoring,
    Done,
    Aborted,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("tool `{tool}` invoked out of order (missing {needs})")]
    OutOfOrder {
        tool: &'static str,
        needs: &'static str,
    },

    #[error("step budget of {budget} tool invocations exceeded")]
    StepBudgetExceeded { budget: u32 },

    #[error("turn finished with unscored retrieval results")]
    ScoringSkipped,

    #[error("turn is already terminal")]
    Terminal,
}

/// Tracks one turn's progress through the pipeline. Request-scoped;
/// nothing here outlives the turn.
#[derive(Debug)]
pub struct TurnProtocol {
    phase: TurnPhase,
    steps_used: u32,
    step_budget: u32,
    query: Option<StructuredQuery>,
    retrieved: Option<Vec<CandidateRecord>>,
    scored: Option<Vec<ScoredCandidate>>,
}

/// What a completed turn hands to the presentation adapter. `None` for
/// both when the turn never entered the pipeline (plain conversation).
#[derive(Debug)]
pub struct TurnOutcome {
    pub retrieved: Option<Vec<CandidateRecord>>,
    pub scored: Option<Vec<ScoredCandidate>>,
}

impl TurnProtocol {
    pub fn new() -> Self {
        Self::with_budget(STEP_BUDGET)
    }

    pub fn with_budget(step_budget: u32) -> Self {
        Self {
            phase: TurnPhase::Idle,
            steps_used: 0,
            step_budget,
            query: None,
            retrieved: None,
            scored: None,
        }
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Validates a proposed tool invocation and charges the step budget.
    ///
    /// Re-authorizing the current stage is legal: stages are pure over
    /// their inputs plus read-only collaborators, so a retry after a
    /// transient failure cannot corrupt state.
    pub fn authorize(&mut self, tool: ToolKind) -> Result<(), ProtocolError> {
        if matches!(self.phase, TurnPhase::Done | TurnPhase::Aborted) {
            return Err(ProtocolError::Terminal);
        }

        self.steps_used += 1;
        if self.steps_used > self.step_budget {
            self.phase = TurnPhase::Aborted;
            return Err(ProtocolError::StepBudgetExceeded {
                budget: self.step_budget,
            });
        }

        let allowed = match tool {
            ToolKind::ExtractQuery => {
                matches!(self.phase, TurnPhase::Idle | TurnPhase::Extracting)
            }
            ToolKind::FindCandidates => {
                self.query.is_some()
                    && matches!(self.phase, TurnPhase::Extracting | TurnPhase::Retrieving)
            }
            ToolKind::AddReasoning => {
                self.retrieved.is_some()
                    && matches!(self.phase, TurnPhase::Retrieving | TurnPhase::Scoring)
            }
        };

        if !allowed {
            self.phase = TurnPhase::Aborted;
            return Err(ProtocolError::OutOfOrder {
                tool: tool.name(),
                needs: match tool {
                    ToolKind::ExtractQuery => "an idle turn",
                    ToolKind::FindCandidates => "an extracted query",
                    ToolKind::AddReasoning => "retrieval results",
                },
            });
        }

        self.phase = match tool {
            ToolKind::ExtractQuery => TurnPhase::Extracting,
            ToolKind::FindCandidates => TurnPhase::Retrieving,
            ToolKind::AddReasoning => TurnPhase::Scoring,
        };
        Ok(())
    }

    pub fn record_query(&mut self, query: StructuredQuery) {
        self.query = Some(query);
    }

    pub fn record_retrieval(&mut self, candidates: Vec<CandidateRecord>) {
        self.retrieved = Some(candidates);
    }

    pub fn record_scored(&mut self, scored: Vec<ScoredCandidate>) {
        self.scored = Some(scored);
    }

    /// The identity set scoring input is checked against.
    pub fn retrieved_ids(&self) -> HashSet<Uuid> {
        self.retrieved
            .as_deref()
            .map(|records| records.iter().map(|r| r.user_id).collect())
            .unwrap_or_default()
    }

    /// Closes the turn. Retrieval results without a scoring pass are a
    /// protocol violation — the mandatory transition was skipped.
    pub fn finish(self) -> Result<TurnOutcome, ProtocolError> {
        match self.phase {
            TurnPhase::Done | TurnPhase::Aborted => Err(ProtocolError::Terminal),
            TurnPhase::Retrieving => Err(ProtocolError::ScoringSkipped),
            TurnPhase::Idle | TurnPhase::Extracting | TurnPhase::Scoring => Ok(TurnOutcome {
                retrieved: self.retrieved,
                scored: self.scored,
            }),
        }
    }

    /// Marks the turn failed. Partial results are discarded — they are
    /// never presented half-scored.
    pub fn abort(&mut self) {
        self.phase = TurnPhase::Aborted;
        self.query = None;
        self.retrieved = None;
        self.scored = None;
    }
}

impl Default for TurnProtocol {
    fn default() -> Self {
        Self::new()
    }
}
