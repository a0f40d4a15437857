//! Expertise-overlap recommendations seeded by a set of favorite entities.
//!
//! Scores are always recomputed from the full reference set; nothing is
//! patched incrementally when favorites change.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::network::{RawId, clean_terms};

mod favorites;
mod matching;

pub use favorites::Favorites;
pub use matching::{terms_match, tokenize, tokens_match};

use self::matching::token_sets_match;

pub const DEFAULT_LIMIT: usize = 10;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawEntity")]
pub struct Entity {
    pub id: String,
    pub name: Option<String>,
    /// Free-text expertise labels, blank ones removed.
    pub expertise: Vec<String>,
}

impl Entity {
    pub fn new(id: impl Into<String>, expertise: &[&str]) -> Self {
        Self {
            id: id.into(),
            name: None,
            expertise: clean_terms(expertise.iter().map(|term| term.to_string()).collect()),
        }
    }
}

/// Directory records carry an `expertise` list, the legacy `expertise_1..3`
/// columns, or both (the list is then derived from the columns).
#[derive(Deserialize)]
struct RawEntity {
    #[serde(alias = "person_id")]
    id: RawId,
    #[serde(default, alias = "person_name")]
    name: Option<String>,
    #[serde(default, alias = "expertises")]
    expertise: Option<Vec<String>>,
    #[serde(default)]
    expertise_1: Option<String>,
    #[serde(default)]
    expertise_2: Option<String>,
    #[serde(default)]
    expertise_3: Option<String>,
}

impl From<RawEntity> for Entity {
    fn from(raw: RawEntity) -> Self {
        let terms = raw.expertise.unwrap_or_else(|| {
            [raw.expertise_1, raw.expertise_2, raw.expertise_3]
                .into_iter()
                .flatten()
                .collect()
        });

        let mut seen = HashSet::new();
        let expertise = clean_terms(terms)
            .into_iter()
            .filter(|term| seen.insert(term.clone()))
            .collect();

        Self {
            id: raw.id.into_string(),
            name: raw.name,
            expertise,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScoredCandidate {
    pub entity: Entity,
    pub score: u32,
}

/// Decodes a directory listing: either a bare array of entities or a
/// `{ "data": [...] }` envelope.
pub fn parse_directory(raw: &str) -> Result<Vec<Entity>> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Directory {
        Bare(Vec<Entity>),
        Envelope { data: Vec<Entity> },
    }

    let directory: Directory = serde_json::from_str(raw)
        .map_err(|error| Error::DataUnavailable(format!("invalid directory JSON: {error}")))?;
    Ok(match directory {
        Directory::Bare(entities) | Directory::Envelope { data: entities } => entities,
    })
}

fn score_candidate(favorite_tokens: &[Vec<String>], candidate: &Entity) -> u32 {
    let candidate_tokens = candidate
        .expertise
        .iter()
        .map(|term| tokenize(term))
        .collect::<Vec<_>>();

    let mut score = 0;
    for favorite in favorite_tokens {
        for candidate in &candidate_tokens {
            if token_sets_match(favorite, candidate) {
                score += 1;
            }
        }
    }
    score
}

/// Ranks `pool` by expertise overlap with `reference`, highest first.
pub fn recommend(reference: &[Entity], pool: &[Entity], limit: usize) -> Vec<ScoredCandidate> {
    let excluded = reference
        .iter()
        .map(|entity| entity.id.as_str())
        .collect::<HashSet<_>>();
    rank(reference, pool, &excluded, limit)
}

fn rank(
    reference: &[Entity],
    pool: &[Entity],
    excluded: &HashSet<&str>,
    limit: usize,
) -> Vec<ScoredCandidate> {
    let favorite_tokens = reference
        .iter()
        .flat_map(|entity| entity.expertise.iter())
        .filter(|term| !term.trim().is_empty())
        .map(|term| tokenize(term))
        .collect::<Vec<_>>();

    if favorite_tokens.is_empty() {
        return Vec::new();
    }

    let mut scored = pool
        .iter()
        .filter(|entity| !excluded.contains(entity.id.as_str()))
        .filter_map(|entity| {
            let score = score_candidate(&favorite_tokens, entity);
            (score > 0).then(|| ScoredCandidate {
                entity: entity.clone(),
                score,
            })
        })
        .collect::<Vec<_>>();

    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(limit);
    scored
}

/// Favorites resolved against the directory, in favorites order.
pub fn resolve_reference(favorites: &Favorites, directory: &[Entity]) -> Vec<Entity> {
    let by_id = directory
        .iter()
        .map(|entity| (entity.id.as_str(), entity))
        .collect::<HashMap<_, _>>();

    favorites
        .ids()
        .iter()
        .filter_map(|id| {
            let entity = by_id.get(id.as_str()).copied();
            if entity.is_none() {
                debug!(%id, "favorite not found in directory");
            }
            entity.cloned()
        })
        .collect()
}

/// Recommendations for a favorites list. Every favorite id is excluded from
/// the results, even one the directory no longer knows.
pub fn recommend_for(
    favorites: &Favorites,
    directory: &[Entity],
    limit: usize,
) -> Vec<ScoredCandidate> {
    let reference = resolve_reference(favorites, directory);
    let excluded = favorites
        .ids()
        .iter()
        .map(String::as_str)
        .collect::<HashSet<_>>();
    rank(&reference, directory, &excluded, limit)
}
