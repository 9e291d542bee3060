//! Synthesis of the fields the directory does not supply.
//!
//! The directory has no notion of department or performance rating, so every
//! record is enriched client-side. Strategies are pluggable: the default draws
//! uniformly at random, [`SeededEnrichment`] makes runs reproducible, and any
//! `Fn(&RemoteUser, RatingRange) -> Enrichment` closure can be injected.

use std::sync::{Mutex, PoisonError};

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    model::{Department, Rating},
    source::RemoteUser,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Enrichment {
    pub department: Department,
    pub performance: Rating,
}

/// Inclusive range performance ratings are drawn from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RatingRange {
    low: Rating,
    high: Rating,
}

impl RatingRange {
    /// Roster fetches rate across the whole scale.
    pub const ROSTER: RatingRange = RatingRange {
        low: Rating::clamped(1),
        high: Rating::clamped(5),
    };
    /// Single-record lookups only produce ratings of 3 and up.
    pub const DETAIL: RatingRange = RatingRange {
        low: Rating::clamped(3),
        high: Rating::clamped(5),
    };

    pub fn low(self) -> Rating {
        self.low
    }

    pub fn high(self) -> Rating {
        self.high
    }

    pub fn contains(self, rating: Rating) -> bool {
        (self.low..=self.high).contains(&rating)
    }

    pub fn sample<R: Rng + ?Sized>(self, rng: &mut R) -> Rating {
        Rating::clamped(i64::from(rng.gen_range(self.low.get()..=self.high.get())))
    }
}

pub trait EnrichmentStrategy: Send + Sync {
    fn enrich(&self, user: &RemoteUser, ratings: RatingRange) -> Enrichment;
}

impl<F> EnrichmentStrategy for F
where
    F: Fn(&RemoteUser, RatingRange) -> Enrichment + Send + Sync,
{
    fn enrich(&self, user: &RemoteUser, ratings: RatingRange) -> Enrichment {
        self(user, ratings)
    }
}

pub fn random_enrichment<R: Rng + ?Sized>(rng: &mut R, ratings: RatingRange) -> Enrichment {
    let department = Department::ALL[rng.gen_range(0..Department::ALL.len())];
    Enrichment {
        department,
        performance: ratings.sample(rng),
    }
}

/// Uniform draws from the thread-local generator.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomEnrichment;

impl EnrichmentStrategy for RandomEnrichment {
    fn enrich(&self, _user: &RemoteUser, ratings: RatingRange) -> Enrichment {
        random_enrichment(&mut rand::thread_rng(), ratings)
    }
}

/// Uniform draws from a seeded generator; identical seeds replay identical rosters.
#[derive(Debug)]
pub struct SeededEnrichment {
    rng: Mutex<StdRng>,
}

impl SeededEnrichment {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl EnrichmentStrategy for SeededEnrichment {
    fn enrich(&self, _user: &RemoteUser, ratings: RatingRange) -> Enrichment {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        random_enrichment(&mut *rng, ratings)
    }
}

/// Same department and rating for everyone, clamped into the requested range.
#[derive(Clone, Copy, Debug)]
pub struct FixedEnrichment(pub Enrichment);

impl EnrichmentStrategy for FixedEnrichment {
    fn enrich(&self, _user: &RemoteUser, ratings: RatingRange) -> Enrichment {
        let performance = self.0.performance.clamp(ratings.low(), ratings.high());
        Enrichment {
            department: self.0.department,
            performance,
        }
    }
}
