use anyhow::Result;

use crate::models::{AnalysisFocus, MatchAnalysis, MatchData, TeamFeatures};
use crate::services::{comparison, group_by_date, AiClient, Comparison, FixtureClient, Orchestrator};
use crate::utils::{confidence_stars, format_odds, format_percent};

pub async fn show_matches() -> Result<()> {
    let fixtures = FixtureClient::new();
    if !fixtures.has_key() {
        println!("❌ FIXTURES_API_KEY not set. Add it to your environment or .env file.");
        return Ok(());
    }

    println!("📅 Fetching this week's fixtures...\n");

    let matches = fixtures.fetch_weekly_matches().await?;
    if matches.is_empty() {
        println!("📭 No fixtures found for the next week.");
        return Ok(());
    }

    for group in group_by_date(matches) {
        println!("📆 {}", group.header);
        for m in &group.matches {
            println!(
                "   {}  {} vs {}  ({}, matchday {})",
                m.time.as_deref().unwrap_or("--:--"),
                m.home_team.name,
                m.away_team.name,
                m.competition,
                m.matchday
            );
            if let Some(id) = &m.id {
                println!("        id: {}", id);
            }
        }
        println!();
    }

    println!("💡 Use 'betlens analyze --home <team> --away <team>' for a full AI analysis");

    Ok(())
}

pub async fn analyze_match(home: &str, away: &str, focus: AnalysisFocus) -> Result<()> {
    let ai = AiClient::new();
    if !ai.has_key() {
        println!("❌ AI_API_KEY not set. Add it to your environment or .env file.");
        return Ok(());
    }

    let orchestrator = Orchestrator::new(ai, FixtureClient::new());

    orchestrator
        .replace_match(MatchData {
            home_team: TeamFeatures {
                name: home.to_string(),
                ..TeamFeatures::default()
            },
            away_team: TeamFeatures {
                name: away.to_string(),
                ..TeamFeatures::default()
            },
            analysis_focus: focus,
            ..MatchData::default()
        })
        .await;

    println!("🤖 Filling match data with AI ({} vs {})...", home, away);
    let filled = orchestrator.fetch_stats().await?;

    print_comparison(&filled);

    println!("\n🔮 Generating betting analysis ({} focus)...", focus.label());
    let analysis = orchestrator.analyze().await?;

    print_analysis(&analysis);

    Ok(())
}

fn print_comparison(data: &MatchData) {
    println!(
        "\n📊 Comparison: {} (home) vs {} (away)\n",
        data.home_team.name, data.away_team.name
    );

    for row in comparison::heatmap(&data.home_team, &data.away_team) {
        let marker = match row.verdict {
            Comparison::HomeBetter => "◀",
            Comparison::AwayBetter => "▶",
            Comparison::Equal => "=",
        };
        println!(
            "   {:<28} {:>8.2}  {}  {:<8.2}",
            row.metric, row.home_value, marker, row.away_value
        );
    }

    println!("\n🕸  Radar shares (bigger share = statistically stronger side):");
    for axis in comparison::radar(&data.home_team, &data.away_team) {
        println!(
            "   {:<12} home {:.2} | away {:.2}",
            axis.axis, axis.home_share, axis.away_share
        );
    }
}

fn print_analysis(analysis: &MatchAnalysis) {
    println!("\n📝 {}\n", analysis.analysis);

    let outcome = &analysis.probability_distribution.outcome;
    println!(
        "📈 Outcome: Home {} | Draw {} | Away {}",
        format_percent(outcome.home_win),
        format_percent(outcome.draw),
        format_percent(outcome.away_win)
    );

    if !analysis.probability_distribution.correct_scores.is_empty() {
        println!("\n🎯 Most likely scorelines:");
        for score in analysis.probability_distribution.correct_scores.iter().take(5) {
            println!("   {}  {}", score.score, format_percent(score.probability));
        }
    }

    if !analysis.single_bets.is_empty() {
        println!("\n💰 Single bets:");
        for bet in &analysis.single_bets {
            println!(
                "   {} — {} @ {}  {}",
                bet.market,
                bet.selection,
                format_odds(bet.odds),
                confidence_stars(bet.confidence)
            );
            for factor in &bet.supporting_factors {
                println!("      + {}", factor);
            }
            for risk in &bet.main_risks {
                println!("      - {}", risk);
            }
        }
    }

    println!(
        "\n🧩 Multi bet: {} @ {}",
        analysis.multi_bet.title,
        format_odds(analysis.multi_bet.combined_odds)
    );
    for leg in &analysis.multi_bet.legs {
        println!(
            "   • {} — {} @ {}",
            leg.market,
            leg.selection,
            format_odds(leg.odds)
        );
    }
    println!("   {}", analysis.multi_bet.rationale);

    if !analysis.value_bets.is_empty() {
        println!("\n💎 Value bets:");
        for bet in &analysis.value_bets {
            println!(
                "   {} — {} (fair odds {})",
                bet.market,
                bet.selection,
                format_odds(bet.ai_odds)
            );
            println!("      {}", bet.rationale);
        }
    }

    if !analysis.game_narratives.is_empty() {
        println!("\n📖 Narratives:");
        for narrative in &analysis.game_narratives {
            println!("   {} — {}", narrative.title, narrative.description);
        }
    }

    println!("\n⚠️  AI-generated analysis. Bet responsibly.");
}
