//! Client for the generative-AI provider that performs the actual match
//! analysis. Three operations: team statistics inference, tactical context
//! inference, and the full betting analysis. Each call either returns the
//! complete typed payload or fails; nothing is retried or partially applied.

use std::env;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::models::{AnalysisFocus, MatchAnalysis, MatchData, StatsInference, TacticalContext, TeamFeatures};

const GENERATE_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

// ── Provider response envelope ───────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: String,
}

// ── AiClient ─────────────────────────────────────────────────────────────────

pub struct AiClient {
    client: Client,
    api_key: Option<String>,
    model: String,
}

impl AiClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            api_key: env::var("AI_API_KEY").ok(),
            model: env::var("AI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
        }
    }

    pub fn has_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Infer the statistical profile of both teams from their names alone.
    pub async fn fetch_team_stats(&self, home_name: &str, away_name: &str) -> AppResult<StatsInference> {
        tracing::info!("Requesting stats inference for {} vs {}", home_name, away_name);
        let text = self.generate(build_stats_prompt(home_name, away_name)).await?;
        parse_stats_response(&text)
    }

    /// Infer formations, head-to-head history and narrative context.
    pub async fn fetch_tactical_context(&self, home_name: &str, away_name: &str) -> AppResult<TacticalContext> {
        tracing::info!("Requesting tactical context for {} vs {}", home_name, away_name);
        let text = self.generate(build_context_prompt(home_name, away_name)).await?;
        parse_context_response(&text)
    }

    /// The richest call: the full betting analysis for an assembled match.
    pub async fn generate_suggestions(&self, data: &MatchData) -> AppResult<MatchAnalysis> {
        tracing::info!(
            "Requesting betting analysis for {} vs {} ({} focus)",
            data.home_team.name,
            data.away_team.name,
            data.analysis_focus.label()
        );
        let text = self.generate(build_analysis_prompt(data)).await?;
        parse_analysis_response(&text)
    }

    async fn generate(&self, prompt: String) -> AppResult<String> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| AppError::AiService("AI_API_KEY not set".to_string()))?;

        let url = format!("{}/{}:generateContent", GENERATE_BASE_URL, self.model);
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "responseMimeType": "application/json" }
        });

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key.as_str())
            .json(&body)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::AiService(format!("provider returned {}: {}", status, body)));
        }

        let parsed: GenerateResponse = response.json().await?;
        extract_candidate_text(parsed)
    }
}

fn extract_candidate_text(response: GenerateResponse) -> AppResult<String> {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content.parts.into_iter().next())
        .map(|p| p.text)
        .ok_or_else(|| AppError::AiService("provider returned no candidates".to_string()))
}

// ── Response parsing ─────────────────────────────────────────────────────────
// A payload that does not match the agreed shape counts as a provider
// failure, not a local parse bug.

pub fn parse_stats_response(text: &str) -> AppResult<StatsInference> {
    serde_json::from_str(text)
        .map_err(|e| AppError::AiService(format!("stats payload did not match expected shape: {}", e)))
}

pub fn parse_context_response(text: &str) -> AppResult<TacticalContext> {
    serde_json::from_str(text)
        .map_err(|e| AppError::AiService(format!("context payload did not match expected shape: {}", e)))
}

pub fn parse_analysis_response(text: &str) -> AppResult<MatchAnalysis> {
    serde_json::from_str(text)
        .map_err(|e| AppError::AiService(format!("analysis payload did not match expected shape: {}", e)))
}

// ── Prompt builders ──────────────────────────────────────────────────────────

const FEATURE_KEYS: &str = "\"elo\", \"eloMomentum\", \"xgPer90\", \"xgOpenPlayPer90\", \
\"xgSetPiecesPer90\", \"xaPer90\", \"shotsPer90\", \"conversionRate\", \"xgaPer90\", \
\"foulsPerPossessionLost\", \"cardsPerGame\", \"possession\", \"highPressSuccessRate\"";

pub fn build_stats_prompt(home_name: &str, away_name: &str) -> String {
    format!(
        r#"You are a football data analyst. Estimate the current season statistics for the match {home} (home) vs {away} (away).

Respond with JSON only, in this exact shape:
{{
  "homeTeam": {{ {keys} }},
  "awayTeam": {{ {keys} }}
}}

All values are numbers. "conversionRate", "possession" and "highPressSuccessRate" are percentages on a 0-100 scale. Use your best estimate for any statistic you cannot source."#,
        home = home_name,
        away = away_name,
        keys = FEATURE_KEYS,
    )
}

pub fn build_context_prompt(home_name: &str, away_name: &str) -> String {
    format!(
        r#"You are a football tactics analyst. Summarize the tactical picture for the match {home} (home) vs {away} (away).

Respond with JSON only, in this exact shape:
{{
  "homeFormation": "e.g. 4-3-3",
  "awayFormation": "e.g. 4-4-2",
  "h2hHistory": "results of the last 5 meetings, one per line",
  "context": "injuries, suspensions, key players, stakes of the game"
}}"#,
        home = home_name,
        away = away_name,
    )
}

fn focus_instruction(focus: AnalysisFocus) -> &'static str {
    match focus {
        AnalysisFocus::Standard => "Provide a balanced, objective analysis.",
        AnalysisFocus::Defensive => {
            "Focus on defensive solidity, xGA and the likelihood of a low-scoring game."
        }
        AnalysisFocus::Offensive => {
            "Focus on xG, shot volume and the likelihood of a high-scoring game."
        }
        AnalysisFocus::Upset => {
            "Hunt for underestimated factors that could produce a surprise result."
        }
    }
}

fn team_block(features: &TeamFeatures) -> String {
    format!(
        "ELO {:.0} (momentum {:+.1}), xG/90 {:.2} (open play {:.2}, set pieces {:.2}), \
xA/90 {:.2}, shots/90 {:.1}, conversion {:.1}%, xGA/90 {:.2}, \
fouls per possession lost {:.2}, cards per game {:.2}, possession {:.1}%, \
high press success {:.1}%",
        features.elo,
        features.elo_momentum,
        features.xg_per90,
        features.xg_open_play_per90,
        features.xg_set_pieces_per90,
        features.xa_per90,
        features.shots_per90,
        features.conversion_rate,
        features.xga_per90,
        features.fouls_per_possession_lost,
        features.cards_per_game,
        features.possession,
        features.high_press_success_rate,
    )
}

pub fn build_analysis_prompt(data: &MatchData) -> String {
    format!(
        r#"You are an expert football betting analyst. Analyze the following match and produce betting suggestions.

Competition: {competition}, matchday {matchday}
Home: {home_name} ({home_formation})
  {home_stats}
Away: {away_name} ({away_formation})
  {away_stats}
Head-to-head (last 5): {h2h}
Additional context: {context}

{focus}

Respond with JSON only, in this exact shape:
{{
  "analysis": "narrative analysis of the match",
  "single_bets": [{{ "market": "...", "selection": "...", "odds": 1.85, "confidence": 4, "supporting_factors": ["..."], "main_risks": ["..."] }}],
  "multi_bet": {{ "title": "...", "combined_odds": 3.4, "legs": [{{ "market": "...", "selection": "...", "odds": 1.85 }}], "rationale": "..." }},
  "value_bets": [{{ "market": "...", "selection": "...", "ai_odds": 2.1, "rationale": "..." }}],
  "probability_distribution": {{
    "outcome": {{ "home_win": 45.0, "draw": 28.0, "away_win": 27.0 }},
    "correct_scores": [{{ "score": "2-1", "probability": 11.5 }}]
  }},
  "game_narratives": [{{ "title": "...", "description": "..." }}]
}}

"confidence" is an integer from 1 to 5. Probabilities are percentages summing to 100. Rank "correct_scores" from most to least likely."#,
        competition = data.competition,
        matchday = data.matchday,
        home_name = data.home_team.name,
        home_formation = data.home_formation.as_deref().unwrap_or("formation unknown"),
        home_stats = team_block(&data.home_team),
        away_name = data.away_team.name,
        away_formation = data.away_formation.as_deref().unwrap_or("formation unknown"),
        away_stats = team_block(&data.away_team),
        h2h = data.h2h_history.as_deref().unwrap_or("not available"),
        context = if data.context.is_empty() { "none" } else { &data.context },
        focus = focus_instruction(data.analysis_focus),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_prompt_names_both_sides_and_all_keys() {
        let prompt = build_stats_prompt("Liverpool", "Everton");
        assert!(prompt.contains("Liverpool (home)"));
        assert!(prompt.contains("Everton (away)"));
        assert!(prompt.contains("\"xgPer90\""));
        assert!(prompt.contains("\"highPressSuccessRate\""));
    }

    #[test]
    fn analysis_prompt_carries_focus_instruction() {
        let mut data = MatchData::default();
        data.home_team.name = "Inter".to_string();
        data.away_team.name = "Milan".to_string();

        data.analysis_focus = AnalysisFocus::Upset;
        let upset = build_analysis_prompt(&data);
        assert!(upset.contains("surprise result"));

        data.analysis_focus = AnalysisFocus::Defensive;
        let defensive = build_analysis_prompt(&data);
        assert!(defensive.contains("low-scoring"));
        assert_ne!(upset, defensive);
    }

    #[test]
    fn parses_stats_payload() {
        let text = r#"{
            "homeTeam": { "elo": 1810, "xgPer90": 2.1, "possession": 57.5 },
            "awayTeam": { "elo": 1640, "cardsPerGame": 2.4 }
        }"#;
        let stats = parse_stats_response(text).unwrap();
        assert_eq!(stats.home_team.elo, Some(1810.0));
        assert_eq!(stats.home_team.possession, Some(57.5));
        assert_eq!(stats.home_team.cards_per_game, None);
        assert_eq!(stats.away_team.cards_per_game, Some(2.4));
    }

    #[test]
    fn malformed_stats_payload_is_a_service_error() {
        let err = parse_stats_response("not json at all").unwrap_err();
        assert!(matches!(err, AppError::AiService(_)));
    }

    #[test]
    fn parses_full_analysis_payload() {
        let text = r#"{
            "analysis": "Home side dominant in open play.",
            "single_bets": [{
                "market": "Match result", "selection": "Home win", "odds": 1.72,
                "confidence": 4,
                "supporting_factors": ["xG gap", "home form"],
                "main_risks": ["rotation risk"]
            }],
            "multi_bet": {
                "title": "Home control combo", "combined_odds": 3.1,
                "legs": [{ "market": "Match result", "selection": "Home win", "odds": 1.72 }],
                "rationale": "Correlated signals."
            },
            "value_bets": [{
                "market": "Over 2.5 goals", "selection": "Over", "ai_odds": 1.95,
                "rationale": "Both defenses leak set pieces."
            }],
            "probability_distribution": {
                "outcome": { "home_win": 52.0, "draw": 26.0, "away_win": 22.0 },
                "correct_scores": [
                    { "score": "2-1", "probability": 12.5 },
                    { "score": "1-0", "probability": 10.0 }
                ]
            },
            "game_narratives": [{ "title": "Press vs build-up", "description": "..." }]
        }"#;

        let analysis = parse_analysis_response(text).unwrap();
        assert_eq!(analysis.single_bets.len(), 1);
        assert_eq!(analysis.single_bets[0].confidence, 4);
        assert_eq!(analysis.probability_distribution.outcome.home_win, 52.0);
        assert_eq!(analysis.probability_distribution.correct_scores[0].score, "2-1");
        assert_eq!(analysis.multi_bet.legs.len(), 1);
    }

    #[test]
    fn empty_candidate_list_is_a_service_error() {
        let response = GenerateResponse { candidates: vec![] };
        let err = extract_candidate_text(response).unwrap_err();
        assert!(matches!(err, AppError::AiService(_)));
    }
}
