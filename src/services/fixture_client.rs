//! Read-only client for the weekly fixture list. Fixtures arrive with
//! identity and schedule fields only; team statistics are filled with zero
//! defaults so every record is form-ready.

use std::env;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::models::{MatchData, TeamFeatures};

const FIXTURES_URL: &str = "https://api.football-data.org/v4/matches";

// ── football-data.org structures ────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct FixtureList {
    #[serde(default)]
    matches: Vec<Fixture>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Fixture {
    id: u64,
    utc_date: String,
    matchday: Option<u32>,
    competition: CompetitionRef,
    home_team: TeamRef,
    away_team: TeamRef,
}

#[derive(Debug, Deserialize)]
struct CompetitionRef {
    name: String,
}

#[derive(Debug, Deserialize)]
struct TeamRef {
    name: String,
}

// ── FixtureClient ────────────────────────────────────────────────────────────

pub struct FixtureClient {
    client: Client,
    api_key: Option<String>,
}

impl FixtureClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            api_key: env::var("FIXTURES_API_KEY").ok(),
        }
    }

    pub fn has_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Fetch all fixtures kicking off in the next seven days.
    pub async fn fetch_weekly_matches(&self) -> AppResult<Vec<MatchData>> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| AppError::Unknown("FIXTURES_API_KEY not set".to_string()))?;

        let today = Utc::now().date_naive();
        let url = format!(
            "{}?dateFrom={}&dateTo={}",
            FIXTURES_URL,
            today.format("%Y-%m-%d"),
            (today + chrono::Duration::days(7)).format("%Y-%m-%d"),
        );

        tracing::info!("Fetching weekly fixtures…");

        let response = self
            .client
            .get(&url)
            .header("X-Auth-Token", api_key.as_str())
            .timeout(Duration::from_secs(20))
            .send()
            .await?
            .error_for_status()?;

        let raw = response.text().await?;
        let matches = parse_weekly_matches(&raw)?;
        tracing::info!("Fetched {} weekly fixtures", matches.len());
        Ok(matches)
    }
}

/// Parse the fixtures payload into form-ready match records.
pub fn parse_weekly_matches(raw: &str) -> AppResult<Vec<MatchData>> {
    let list: FixtureList = serde_json::from_str(raw)?;
    Ok(list.matches.into_iter().map(fixture_to_match).collect())
}

fn fixture_to_match(fixture: Fixture) -> MatchData {
    let (date, time) = match DateTime::parse_from_rfc3339(&fixture.utc_date) {
        Ok(d) => {
            let utc = d.with_timezone(&Utc);
            (
                Some(utc.format("%Y-%m-%d").to_string()),
                Some(utc.format("%H:%M").to_string()),
            )
        }
        Err(e) => {
            // keep the fixture; it lands in the dateless display bucket
            tracing::warn!("Bad kick-off date '{}': {}", fixture.utc_date, e);
            (None, None)
        }
    };

    MatchData {
        id: Some(fixture.id.to_string()),
        competition: fixture.competition.name,
        matchday: fixture.matchday.unwrap_or(1),
        date,
        time,
        home_team: TeamFeatures {
            name: fixture.home_team.name,
            ..TeamFeatures::default()
        },
        away_team: TeamFeatures {
            name: fixture.away_team.name,
            ..TeamFeatures::default()
        },
        ..MatchData::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEEKLY_FIXTURE: &str = r#"{
        "matches": [
            {
                "id": 4101,
                "utcDate": "2024-07-01T19:00:00Z",
                "matchday": 22,
                "competition": { "name": "Premier League" },
                "homeTeam": { "name": "Liverpool" },
                "awayTeam": { "name": "Everton" }
            },
            {
                "id": 4102,
                "utcDate": "postponed",
                "matchday": null,
                "competition": { "name": "Premier League" },
                "homeTeam": { "name": "Fulham" },
                "awayTeam": { "name": "Brentford" }
            }
        ]
    }"#;

    #[test]
    fn parses_weekly_fixture_payload() {
        let matches = parse_weekly_matches(WEEKLY_FIXTURE).unwrap();
        assert_eq!(matches.len(), 2);

        let first = &matches[0];
        assert_eq!(first.id.as_deref(), Some("4101"));
        assert_eq!(first.competition, "Premier League");
        assert_eq!(first.matchday, 22);
        assert_eq!(first.date.as_deref(), Some("2024-07-01"));
        assert_eq!(first.time.as_deref(), Some("19:00"));
        assert_eq!(first.home_team.name, "Liverpool");
        assert_eq!(first.away_team.name, "Everton");
    }

    #[test]
    fn seeded_fixtures_get_zero_default_statistics() {
        let matches = parse_weekly_matches(WEEKLY_FIXTURE).unwrap();
        assert_eq!(matches[0].home_team.elo, 0.0);
        assert_eq!(matches[0].away_team.xg_per90, 0.0);
        assert!(matches[0].context.is_empty());
    }

    #[test]
    fn bad_kick_off_date_keeps_the_fixture_without_schedule() {
        let matches = parse_weekly_matches(WEEKLY_FIXTURE).unwrap();
        let second = &matches[1];
        assert!(second.date.is_none());
        assert!(second.time.is_none());
        assert_eq!(second.matchday, 1);
    }

    #[test]
    fn malformed_payload_is_a_parse_error() {
        let err = parse_weekly_matches("<html>rate limited</html>").unwrap_err();
        assert!(matches!(err, AppError::Parse(_)));
    }
}
