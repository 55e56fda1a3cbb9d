use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faq {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub order: i64,
    pub thumbs_up: u64,
    pub thumbs_down: u64,
}

impl Faq {
    pub fn total_votes(&self) -> u64 {
        self.thumbs_up + self.thumbs_down
    }

    /// Share of helpful votes as a percentage with one decimal; 0 without votes.
    pub fn helpfulness_ratio(&self) -> f64 {
        let total = self.total_votes();
        if total == 0 {
            return 0.0;
        }
        (self.thumbs_up as f64 / total as f64 * 1000.0).round() / 10.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vote {
    Up,
    Down,
}

impl FromStr for Vote {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "up" | "yes" | "helpful" | "+" => Ok(Vote::Up),
            "down" | "no" | "unhelpful" | "-" => Ok(Vote::Down),
            other => Err(anyhow::anyhow!("unknown vote `{}` (expected up or down)", other)),
        }
    }
}

/// FAQ as shown to visitors, with derived vote figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqView {
    #[serde(flatten)]
    pub faq: Faq,
    pub total_votes: u64,
    pub helpfulness_ratio: f64,
}

impl From<Faq> for FaqView {
    fn from(faq: Faq) -> Self {
        Self { total_votes: faq.total_votes(), helpfulness_ratio: faq.helpfulness_ratio(), faq }
    }
}

/// Most helpful first; more votes wins a tie, then the editorial order.
pub fn rank_by_helpfulness(faqs: &mut [FaqView]) {
    faqs.sort_by(|a, b| {
        b.helpfulness_ratio
            .partial_cmp(&a.helpfulness_ratio)
            .unwrap_or(Ordering::Equal)
            .then(b.total_votes.cmp(&a.total_votes))
            .then(a.faq.order.cmp(&b.faq.order))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn faq(id: i64, order: i64, up: u64, down: u64) -> FaqView {
        Faq { id, question: format!("q{id}"), answer: String::new(), order, thumbs_up: up, thumbs_down: down }.into()
    }

    #[test]
    fn ratio_is_a_rounded_percentage() {
        assert_eq!(faq(1, 1, 87, 3).helpfulness_ratio, 96.7);
        assert_eq!(faq(1, 1, 1, 2).helpfulness_ratio, 33.3);
        assert_eq!(faq(1, 1, 5, 0).helpfulness_ratio, 100.0);
        assert_eq!(faq(1, 1, 0, 0).helpfulness_ratio, 0.0);
        assert_eq!(faq(1, 1, 0, 0).total_votes, 0);
    }

    #[test]
    fn ranking_prefers_ratio_then_volume_then_order() {
        let mut faqs = vec![faq(1, 1, 1, 1), faq(2, 2, 9, 1), faq(3, 3, 18, 2), faq(4, 4, 0, 0), faq(5, 0, 9, 1)];
        rank_by_helpfulness(&mut faqs);
        let ids: Vec<i64> = faqs.iter().map(|f| f.faq.id).collect();
        assert_eq!(ids, vec![3, 5, 2, 1, 4]);
    }

    #[test]
    fn vote_parsing() {
        assert_eq!("UP".parse::<Vote>().unwrap(), Vote::Up);
        assert_eq!("down".parse::<Vote>().unwrap(), Vote::Down);
        assert!("sideways".parse::<Vote>().is_err());
    }
}
