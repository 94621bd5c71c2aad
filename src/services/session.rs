//! Single-session working state and AI call orchestration.
//!
//! One working match record is visible to every interface piece. The stats
//! and tactical-context calls are issued together and merged as one update
//! only after both succeed; the betting-analysis call is exclusive with
//! itself via a busy flag. Requests are never cancelled: a response landing
//! after the working record was replaced is detected by revision tag and
//! dropped.

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{MatchAnalysis, MatchData, StatsInference, TacticalContext};
use crate::services::{AiClient, FixtureClient};
use crate::utils::validate_team_name;

// ── Session ──────────────────────────────────────────────────────────────────

/// In-memory state for one form session. Nothing here survives the process.
#[derive(Debug, Default)]
pub struct Session {
    working: MatchData,
    weekly: Vec<MatchData>,
    analysis: Option<MatchAnalysis>,
    revision: u64,
    analyzing: bool,
}

impl Session {
    pub fn working(&self) -> &MatchData {
        &self.working
    }

    pub fn weekly(&self) -> &[MatchData] {
        &self.weekly
    }

    pub fn analysis(&self) -> Option<&MatchAnalysis> {
        self.analysis.as_ref()
    }

    pub fn set_weekly(&mut self, matches: Vec<MatchData>) {
        self.weekly = matches;
    }

    /// Wholesale replacement of the working record.
    pub fn replace(&mut self, data: MatchData) {
        self.working = data;
        self.revision += 1;
    }

    /// Replace the working record from the weekly list. Clears the previous
    /// analysis, which belonged to the old match.
    pub fn select(&mut self, id: &str) -> AppResult<MatchData> {
        let selected = self
            .weekly
            .iter()
            .find(|m| m.id.as_deref() == Some(id))
            .cloned()
            .ok_or_else(|| AppError::InvalidInput(format!("no weekly match with id '{}'", id)))?;

        self.working = selected.clone();
        self.analysis = None;
        self.revision += 1;
        Ok(selected)
    }

    /// Validate and snapshot what a stats fetch needs: both team names and
    /// the revision the eventual merge must still match.
    pub fn stats_fetch_snapshot(&self) -> AppResult<(String, String, u64)> {
        if !validate_team_name(&self.working.home_team.name)
            || !validate_team_name(&self.working.away_team.name)
        {
            return Err(AppError::InvalidInput(
                "enter both team names before fetching AI data".to_string(),
            ));
        }
        Ok((
            self.working.home_team.name.clone(),
            self.working.away_team.name.clone(),
            self.revision,
        ))
    }

    /// Atomically merge a completed stats + tactical-context pair into the
    /// working record. Both payloads land together or not at all; a revision
    /// mismatch means the user moved to another match mid-flight and the
    /// results are discarded.
    pub fn merge_fetched(
        &mut self,
        revision: u64,
        stats: &StatsInference,
        tactical: &TacticalContext,
    ) -> AppResult<MatchData> {
        if revision != self.revision {
            tracing::warn!(
                "Discarding stale AI data (issued at revision {}, now {})",
                revision,
                self.revision
            );
            return Err(AppError::Unknown(
                "the match changed while AI data was in flight; results discarded".to_string(),
            ));
        }

        self.working.home_team.apply_update(&stats.home_team);
        self.working.away_team.apply_update(&stats.away_team);
        self.working.home_formation = Some(tactical.home_formation.clone());
        self.working.away_formation = Some(tactical.away_formation.clone());
        self.working.h2h_history = Some(tactical.h2h_history.clone());
        self.working.context = tactical.context.clone();

        Ok(self.working.clone())
    }

    /// Claim the analysis busy flag and snapshot the record to analyze.
    /// A second submission while one is outstanding is rejected, not queued.
    pub fn begin_analysis(&mut self) -> AppResult<MatchData> {
        if self.analyzing {
            return Err(AppError::InvalidInput(
                "an analysis is already in progress".to_string(),
            ));
        }
        self.analyzing = true;
        Ok(self.working.clone())
    }

    /// Release the busy flag, storing the result if the call succeeded.
    pub fn finish_analysis(&mut self, result: Option<MatchAnalysis>) {
        self.analyzing = false;
        if result.is_some() {
            self.analysis = result;
        }
    }
}

// ── Orchestrator ─────────────────────────────────────────────────────────────

/// Owns the session plus the two external clients, and enforces the
/// sequencing rules around every network call.
pub struct Orchestrator {
    session: RwLock<Session>,
    ai: AiClient,
    fixtures: FixtureClient,
}

impl Orchestrator {
    pub fn new(ai: AiClient, fixtures: FixtureClient) -> Self {
        Self {
            session: RwLock::new(Session::default()),
            ai,
            fixtures,
        }
    }

    pub async fn current_match(&self) -> MatchData {
        self.session.read().await.working().clone()
    }

    pub async fn replace_match(&self, data: MatchData) -> MatchData {
        let mut session = self.session.write().await;
        session.replace(data);
        session.working().clone()
    }

    pub async fn select_match(&self, id: &str) -> AppResult<MatchData> {
        self.session.write().await.select(id)
    }

    pub async fn latest_analysis(&self) -> Option<MatchAnalysis> {
        self.session.read().await.analysis().cloned()
    }

    /// Weekly fixtures, fetched once and cached in the session for its
    /// lifetime.
    pub async fn weekly_matches(&self) -> AppResult<Vec<MatchData>> {
        {
            let session = self.session.read().await;
            if !session.weekly().is_empty() {
                return Ok(session.weekly().to_vec());
            }
        }

        let fetched = self.fixtures.fetch_weekly_matches().await?;
        let mut session = self.session.write().await;
        session.set_weekly(fetched.clone());
        Ok(fetched)
    }

    /// Issue the stats and tactical-context calls concurrently and merge the
    /// pair atomically. If either call fails the working record is left
    /// untouched.
    pub async fn fetch_stats(&self) -> AppResult<MatchData> {
        let (home_name, away_name, revision) =
            self.session.read().await.stats_fetch_snapshot()?;

        let request_id = Uuid::new_v4();
        tracing::info!(
            "AI pair fetch {} for {} vs {} (revision {})",
            request_id,
            home_name,
            away_name,
            revision
        );

        let (stats, tactical) = tokio::try_join!(
            self.ai.fetch_team_stats(&home_name, &away_name),
            self.ai.fetch_tactical_context(&home_name, &away_name),
        )?;

        let merged = self
            .session
            .write()
            .await
            .merge_fetched(revision, &stats, &tactical)?;
        tracing::info!("AI pair fetch {} merged", request_id);
        Ok(merged)
    }

    /// Generate the betting analysis for the current working record.
    pub async fn analyze(&self) -> AppResult<MatchAnalysis> {
        let snapshot = self.session.write().await.begin_analysis()?;

        let result = self.ai.generate_suggestions(&snapshot).await;

        let mut session = self.session.write().await;
        match result {
            Ok(analysis) => {
                session.finish_analysis(Some(analysis.clone()));
                Ok(analysis)
            }
            Err(e) => {
                session.finish_analysis(None);
                Err(e)
            }
        }
    }
}
