use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-team statistical profile for one match. All rates default to zero;
/// an empty `name` marks a side the user has not filled in yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamFeatures {
    pub name: String,
    pub elo: f64,
    pub elo_momentum: f64, // signed trend over recent games
    pub xg_per90: f64,
    pub xg_open_play_per90: f64,
    pub xg_set_pieces_per90: f64,
    pub xa_per90: f64,
    pub shots_per90: f64,
    pub conversion_rate: f64,
    pub xga_per90: f64,
    pub fouls_per_possession_lost: f64,
    pub cards_per_game: f64,
    pub possession: f64,
    pub high_press_success_rate: f64,
}

impl Default for TeamFeatures {
    fn default() -> Self {
        Self {
            name: String::new(),
            elo: 0.0,
            elo_momentum: 0.0,
            xg_per90: 0.0,
            xg_open_play_per90: 0.0,
            xg_set_pieces_per90: 0.0,
            xa_per90: 0.0,
            shots_per90: 0.0,
            conversion_rate: 0.0,
            xga_per90: 0.0,
            fouls_per_possession_lost: 0.0,
            cards_per_game: 0.0,
            possession: 0.0,
            high_press_success_rate: 0.0,
        }
    }
}

/// Loosely-shaped stats payload from the AI provider. Only fields that are
/// present override the local record; `name` is deliberately absent — a
/// stats merge never rewrites team identity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamFeaturesUpdate {
    pub elo: Option<f64>,
    pub elo_momentum: Option<f64>,
    pub xg_per90: Option<f64>,
    pub xg_open_play_per90: Option<f64>,
    pub xg_set_pieces_per90: Option<f64>,
    pub xa_per90: Option<f64>,
    pub shots_per90: Option<f64>,
    pub conversion_rate: Option<f64>,
    pub xga_per90: Option<f64>,
    pub fouls_per_possession_lost: Option<f64>,
    pub cards_per_game: Option<f64>,
    pub possession: Option<f64>,
    pub high_press_success_rate: Option<f64>,
}

impl TeamFeatures {
    /// Field-by-field override merge of a partial update.
    pub fn apply_update(&mut self, update: &TeamFeaturesUpdate) {
        if let Some(v) = update.elo {
            self.elo = v;
        }
        if let Some(v) = update.elo_momentum {
            self.elo_momentum = v;
        }
        if let Some(v) = update.xg_per90 {
            self.xg_per90 = v;
        }
        if let Some(v) = update.xg_open_play_per90 {
            self.xg_open_play_per90 = v;
        }
        if let Some(v) = update.xg_set_pieces_per90 {
            self.xg_set_pieces_per90 = v;
        }
        if let Some(v) = update.xa_per90 {
            self.xa_per90 = v;
        }
        if let Some(v) = update.shots_per90 {
            self.shots_per90 = v;
        }
        if let Some(v) = update.conversion_rate {
            self.conversion_rate = v;
        }
        if let Some(v) = update.xga_per90 {
            self.xga_per90 = v;
        }
        if let Some(v) = update.fouls_per_possession_lost {
            self.fouls_per_possession_lost = v;
        }
        if let Some(v) = update.cards_per_game {
            self.cards_per_game = v;
        }
        if let Some(v) = update.possession {
            self.possession = v;
        }
        if let Some(v) = update.high_press_success_rate {
            self.high_press_success_rate = v;
        }
    }
}

/// Which angle the AI is asked to analyze the match from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisFocus {
    #[default]
    Standard,
    Defensive,
    Offensive,
    Upset,
}

impl AnalysisFocus {
    pub fn label(&self) -> &'static str {
        match self {
            AnalysisFocus::Standard => "standard",
            AnalysisFocus::Defensive => "defensive",
            AnalysisFocus::Offensive => "offensive",
            AnalysisFocus::Upset => "upset",
        }
    }
}

impl std::str::FromStr for AnalysisFocus {
    type Err = crate::error::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(AnalysisFocus::Standard),
            "defensive" => Ok(AnalysisFocus::Defensive),
            "offensive" => Ok(AnalysisFocus::Offensive),
            "upset" => Ok(AnalysisFocus::Upset),
            other => Err(crate::error::AppError::InvalidInput(format!(
                "unknown analysis focus '{}'",
                other
            ))),
        }
    }
}

/// One fixture as edited in the form. `id` is only present for matches
/// seeded from the weekly fixture list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchData {
    pub id: Option<String>,
    pub competition: String,
    pub matchday: u32,
    pub date: Option<String>,
    pub time: Option<String>,
    pub home_team: TeamFeatures,
    pub away_team: TeamFeatures,
    pub context: String,
    pub home_formation: Option<String>,
    pub away_formation: Option<String>,
    pub h2h_history: Option<String>,
    pub analysis_focus: AnalysisFocus,
}

impl Default for MatchData {
    fn default() -> Self {
        Self {
            id: None,
            competition: String::new(),
            matchday: 1,
            date: None,
            time: None,
            home_team: TeamFeatures::default(),
            away_team: TeamFeatures::default(),
            context: String::new(),
            home_formation: None,
            away_formation: None,
            h2h_history: None,
            analysis_focus: AnalysisFocus::Standard,
        }
    }
}

/// Stats inference for both sides, as returned by the AI provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatsInference {
    pub home_team: TeamFeaturesUpdate,
    pub away_team: TeamFeaturesUpdate,
}

/// Formations, head-to-head history and narrative context for one fixture.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TacticalContext {
    pub home_formation: String,
    pub away_formation: String,
    pub h2h_history: String,
    pub context: String,
}

// ── Analysis result types ────────────────────────────────────────────────────
// The provider owns the semantics of everything below; this service validates
// the shape at the serde boundary and passes the contents through untouched.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BetSuggestion {
    pub market: String,
    pub selection: String,
    pub odds: f64,
    pub confidence: u8, // 1..=5
    pub supporting_factors: Vec<String>,
    pub main_risks: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiBetLeg {
    pub market: String,
    pub selection: String,
    pub odds: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiBet {
    pub title: String,
    pub combined_odds: f64,
    pub legs: Vec<MultiBetLeg>,
    pub rationale: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueBet {
    pub market: String,
    pub selection: String,
    pub ai_odds: f64,
    pub rationale: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeProbabilities {
    pub home_win: f64,
    pub draw: f64,
    pub away_win: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreProbability {
    pub score: String,
    pub probability: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbabilityDistribution {
    pub outcome: OutcomeProbabilities,
    pub correct_scores: Vec<ScoreProbability>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameNarrative {
    pub title: String,
    pub description: String,
}

/// The full structured document returned by the betting-analysis call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchAnalysis {
    pub analysis: String,
    pub single_bets: Vec<BetSuggestion>,
    pub multi_bet: MultiBet,
    pub value_bets: Vec<ValueBet>,
    pub probability_distribution: ProbabilityDistribution,
    pub game_narratives: Vec<GameNarrative>,
}

// API Response types
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: Utc::now(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: Utc::now(),
        }
    }
}
