//! Readiness buckets for match results

use serde::{Deserialize, Serialize};

use crate::{config::CategoryConfig, matcher::MatchResult};

/// Readiness of a recipe, given its score
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Readiness {
    /// Everything needed is at home
    ReadyNow,
    /// Only a few things are missing
    AlmostReady,
    /// Some of the ingredients are at home
    Idea,
}

impl Readiness {
    /// Readiness for a score, [`None`] if nothing matched
    pub fn of(score: f64, config: &CategoryConfig) -> Option<Self> {
        if score >= config.ready_threshold {
            Some(Self::ReadyNow)
        } else if score >= config.almost_ready_threshold {
            Some(Self::AlmostReady)
        } else if score > 0.0 {
            Some(Self::Idea)
        } else {
            None
        }
    }
}

/// Match results split by [`Readiness`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Categorized {
    pub ready_now: Vec<MatchResult>,
    pub almost_ready: Vec<MatchResult>,
    /// At most [`CategoryConfig::ideas_cap`]
    pub ideas: Vec<MatchResult>,
}

impl Categorized {
    /// Iterate all the buckets in order with their readiness
    pub fn iter(&self) -> impl Iterator<Item = (Readiness, &MatchResult)> {
        let ready = self.ready_now.iter().map(|m| (Readiness::ReadyNow, m));
        let almost = self.almost_ready.iter().map(|m| (Readiness::AlmostReady, m));
        let ideas = self.ideas.iter().map(|m| (Readiness::Idea, m));
        ready.chain(almost).chain(ideas)
    }

    pub fn len(&self) -> usize {
        self.ready_now.len() + self.almost_ready.len() + self.ideas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Split results into buckets
///
/// Each bucket is sorted with the recipes that use expiring ingredients
/// first, then by descending score. The sort is stable, ties keep the input
/// order. Results with score 0 are left out and the ideas are cut to
/// `ideas_cap` after sorting.
#[tracing::instrument(level = "debug", skip_all, fields(results = results.len()))]
pub fn categorize(results: Vec<MatchResult>, config: &CategoryConfig) -> Categorized {
    let mut out = Categorized::default();
    for result in results {
        match Readiness::of(result.score, config) {
            Some(Readiness::ReadyNow) => out.ready_now.push(result),
            Some(Readiness::AlmostReady) => out.almost_ready.push(result),
            Some(Readiness::Idea) => out.ideas.push(result),
            None => {}
        }
    }

    sort_bucket(&mut out.ready_now);
    sort_bucket(&mut out.almost_ready);
    sort_bucket(&mut out.ideas);
    out.ideas.truncate(config.ideas_cap);
    out
}

fn sort_bucket(bucket: &mut [MatchResult]) {
    bucket.sort_by(|a, b| {
        b.uses_expiring_ingredient
            .cmp(&a.uses_expiring_ingredient)
            .then_with(|| b.score.total_cmp(&a.score))
    });
}
