use std::cmp::Ordering;
use std::io::Write;

use serde::Serialize;

use super::normalizer::normalize_name;
use super::scoring::{ScoreCard, TiebreakDistance};

/// A ranked row: players equal on total and tie-break share a rank.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub player_name: String,
    pub total: f64,
    pub tiebreak: TiebreakDistance,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Orders by total (desc), then tie-break distance (asc, unknown last), then name.
    pub fn rank<'a, I>(cards: I) -> Self
    where
        I: IntoIterator<Item = &'a ScoreCard>,
    {
        let mut cards: Vec<&ScoreCard> = cards.into_iter().collect();
        cards.sort_by(|a, b| {
            standing_cmp(a, b).then_with(|| {
                normalize_name(&a.player_name).cmp(&normalize_name(&b.player_name))
            })
        });

        let mut entries: Vec<LeaderboardEntry> = Vec::with_capacity(cards.len());
        for (position, card) in cards.iter().enumerate() {
            let rank = match position.checked_sub(1).map(|prev| cards[prev]) {
                Some(previous) if standing_cmp(previous, card) == Ordering::Equal => {
                    entries[position - 1].rank
                }
                _ => position + 1,
            };

            entries.push(LeaderboardEntry {
                rank,
                player_name: card.player_name.clone(),
                total: card.total,
                tiebreak: card.tiebreak,
            });
        }

        Self { entries }
    }

    pub fn leader(&self) -> Option<&LeaderboardEntry> {
        self.entries.first()
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(["rank", "player", "total", "tiebreak"])?;
        for entry in &self.entries {
            csv_writer.write_record([
                entry.rank.to_string(),
                entry.player_name.clone(),
                entry.total.to_string(),
                entry.tiebreak.to_string(),
            ])?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

fn standing_cmp(a: &ScoreCard, b: &ScoreCard) -> Ordering {
    b.total
        .total_cmp(&a.total)
        .then_with(|| a.tiebreak.rank_cmp(&b.tiebreak))
}
