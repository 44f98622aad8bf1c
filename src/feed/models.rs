use serde::{Deserialize, Serialize};

/// Lifecycle of a game as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Scheduled,
    InProgress,
    Final,
}

impl GameStatus {
    /// Map the provider's status names onto the three states we track.
    /// Unknown names are rejected so they cannot leak into matching.
    pub fn from_feed_name(name: &str) -> Option<Self> {
        match name {
            "STATUS_SCHEDULED" => Some(GameStatus::Scheduled),
            "STATUS_IN_PROGRESS" | "STATUS_HALFTIME" | "STATUS_END_PERIOD" => {
                Some(GameStatus::InProgress)
            }
            "STATUS_FINAL" => Some(GameStatus::Final),
            _ => None,
        }
    }
}

/// A validated game record from the external feed, in the provider's own
/// team naming. Scores are only meaningful once `status` is `Final`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub home_side: String,
    pub away_side: String,
    pub home_score: i32,
    pub away_score: i32,
    pub status: GameStatus,
}

impl GameResult {
    pub fn is_final(&self) -> bool {
        self.status == GameStatus::Final
    }

    /// Validate one raw scoreboard event into a typed record.
    ///
    /// Anything structurally off (missing competition, not exactly one home
    /// and one away competitor, unparseable score, unknown status) is
    /// rejected here at the boundary.
    pub fn from_event(event: RawEvent) -> Result<Self, String> {
        let status_name = event.status.kind.name;
        let status = GameStatus::from_feed_name(&status_name)
            .ok_or_else(|| format!("unknown status '{}'", status_name))?;

        let competition = event
            .competitions
            .into_iter()
            .next()
            .ok_or("event has no competitions")?;

        if competition.competitors.len() != 2 {
            return Err(format!(
                "expected 2 competitors, got {}",
                competition.competitors.len()
            ));
        }

        let mut home = None;
        let mut away = None;
        for competitor in competition.competitors {
            let name = competitor.team.display_name;
            if name.trim().is_empty() {
                return Err("competitor has an empty team name".to_string());
            }
            let score = match competitor.score {
                Some(raw) => raw
                    .parse::<i32>()
                    .map_err(|_| format!("unparseable score '{}' for {}", raw, name))?,
                None => 0,
            };
            match competitor.home_away.as_str() {
                "home" => home = Some((name, score)),
                "away" => away = Some((name, score)),
                other => return Err(format!("unknown homeAway marker '{}'", other)),
            }
        }

        let (home_side, home_score) = home.ok_or("no home competitor")?;
        let (away_side, away_score) = away.ok_or("no away competitor")?;

        Ok(GameResult {
            home_side,
            away_side,
            home_score,
            away_score,
            status,
        })
    }
}

// Raw wire schema, deserialized before validation.

#[derive(Debug, Deserialize)]
pub struct RawScoreboard {
    #[serde(default)]
    pub events: Vec<RawEvent>,
}

#[derive(Debug, Deserialize)]
pub struct RawEvent {
    #[serde(default)]
    pub competitions: Vec<RawCompetition>,
    pub status: RawStatus,
}

#[derive(Debug, Deserialize)]
pub struct RawStatus {
    #[serde(rename = "type")]
    pub kind: RawStatusType,
}

#[derive(Debug, Deserialize)]
pub struct RawStatusType {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct RawCompetition {
    #[serde(default)]
    pub competitors: Vec<RawCompetitor>,
}

#[derive(Debug, Deserialize)]
pub struct RawCompetitor {
    #[serde(rename = "homeAway")]
    pub home_away: String,
    pub score: Option<String>,
    pub team: RawTeam,
}

#[derive(Debug, Deserialize)]
pub struct RawTeam {
    #[serde(rename = "displayName")]
    pub display_name: String,
}
