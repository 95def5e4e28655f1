//! Hobby similarity scoring and the background relation worker.
//!
//! New catalog entries are scored against the rest of the catalog off the
//! request path: the catalog enqueues the new hobby id after its transaction
//! commits and the worker upserts the resulting `hobby_relations` rows.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::db::{Db, Store};
use crate::error::Result;
use crate::models::{Hobby, HobbyRelation};

const UPSERT_CHUNK: usize = 500;

/// Scores how similar two canonical hobby names are, in `[0, 1]`
pub trait SimilarityModel: Send + Sync {
    fn score(&self, a: &str, b: &str) -> f64;
}

/// Character-bigram Dice coefficient combined with word overlap.
///
/// The higher of the two measures wins, so "playing football" and
/// "playing basketball" relate through shared bigrams while "chess" and
/// "speed chess" relate through the shared word.
#[derive(Debug, Default, Clone, Copy)]
pub struct LexicalSimilarity;

impl LexicalSimilarity {
    fn bigrams(name: &str) -> HashMap<(char, char), usize> {
        let words: Vec<&str> = name.split_whitespace().collect();
        let chars: Vec<char> = words.join(" ").chars().collect();
        let mut counts = HashMap::new();
        for pair in chars.windows(2) {
            *counts.entry((pair[0], pair[1])).or_insert(0) += 1;
        }
        counts
    }

    fn dice(a: &str, b: &str) -> f64 {
        let left = Self::bigrams(a);
        let right = Self::bigrams(b);
        let total: usize = left.values().sum::<usize>() + right.values().sum::<usize>();
        if total == 0 {
            return 0.0;
        }
        let shared: usize = left
            .iter()
            .map(|(gram, n)| (*n).min(right.get(gram).copied().unwrap_or(0)))
            .sum();
        (2 * shared) as f64 / total as f64
    }

    fn word_overlap(a: &str, b: &str) -> f64 {
        let left: HashSet<&str> = a.split_whitespace().collect();
        let right: HashSet<&str> = b.split_whitespace().collect();
        let union = left.union(&right).count();
        if union == 0 {
            return 0.0;
        }
        left.intersection(&right).count() as f64 / union as f64
    }
}

impl SimilarityModel for LexicalSimilarity {
    fn score(&self, a: &str, b: &str) -> f64 {
        if a == b {
            return 1.0;
        }
        Self::dice(a, b).max(Self::word_overlap(a, b)).clamp(0.0, 1.0)
    }
}

/// Relations between `hobby` and every other entry of `catalog`
fn relations_for(
    model: &dyn SimilarityModel,
    hobby: &Hobby,
    catalog: &[Hobby],
) -> Vec<HobbyRelation> {
    catalog
        .iter()
        .filter_map(|other| {
            HobbyRelation::new(hobby.id, other.id, model.score(&hobby.name, &other.name))
        })
        .collect()
}

/// Score a single hobby against the whole catalog and store the relations.
///
/// Returns the number of relations written; an unknown hobby writes nothing.
pub async fn score_new_hobby(
    store: &dyn Store,
    model: Arc<dyn SimilarityModel>,
    hobby_id: i64,
) -> Result<usize> {
    let Some(hobby) = store.find_hobby(hobby_id).await? else {
        tracing::warn!("Similarity requested for unknown hobby {}", hobby_id);
        return Ok(0);
    };

    let catalog = store.all_hobbies().await?;
    let scored = hobby.clone();
    let relations =
        tokio::task::spawn_blocking(move || relations_for(model.as_ref(), &scored, &catalog))
            .await?;
    for chunk in relations.chunks(UPSERT_CHUNK) {
        store.upsert_relations(chunk).await?;
    }

    tracing::debug!(
        "Scored hobby '{}' against {} catalog entries",
        hobby.name,
        relations.len()
    );
    Ok(relations.len())
}

/// Batch job: recompute every pairwise relation in the catalog
pub async fn rebuild_relations(
    store: &dyn Store,
    model: Arc<dyn SimilarityModel>,
) -> Result<usize> {
    let catalog = store.all_hobbies().await?;
    tracing::info!("Rebuilding relations for {} hobbies", catalog.len());

    let relations = tokio::task::spawn_blocking(move || {
        let mut relations = Vec::new();
        for (i, hobby) in catalog.iter().enumerate() {
            relations.extend(relations_for(model.as_ref(), hobby, &catalog[i + 1..]));
        }
        relations
    })
    .await?;

    for chunk in relations.chunks(UPSERT_CHUNK) {
        store.upsert_relations(chunk).await?;
    }

    tracing::info!("Stored {} hobby relations", relations.len());
    Ok(relations.len())
}

/// Handle used by the catalog to hand newly created hobbies to the worker
#[derive(Clone, Debug)]
pub struct RelationQueue {
    sender: Option<mpsc::Sender<i64>>,
}

impl RelationQueue {
    /// A queue that drops everything (similarity disabled)
    pub fn disabled() -> Self {
        Self { sender: None }
    }

    /// Enqueue a hobby for scoring. Never blocks; a full or closed queue
    /// drops the id and the batch rebuild catches up later.
    pub fn enqueue(&self, hobby_id: i64) {
        let Some(sender) = &self.sender else {
            return;
        };

        match sender.try_send(hobby_id) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!("Similarity queue full, dropping hobby {}", hobby_id);
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::warn!("Similarity worker stopped, dropping hobby {}", hobby_id);
            }
        }
    }
}

/// Spawn the relation worker. It runs until every queue handle is dropped.
pub fn spawn_relation_worker(
    store: Db,
    model: Arc<dyn SimilarityModel>,
    capacity: usize,
) -> (RelationQueue, JoinHandle<()>) {
    let (sender, mut receiver) = mpsc::channel::<i64>(capacity.max(1));

    let handle = tokio::spawn(async move {
        tracing::info!("Similarity worker started");
        while let Some(hobby_id) = receiver.recv().await {
            if let Err(e) = score_new_hobby(store.as_ref(), model.clone(), hobby_id).await {
                tracing::error!("Failed to score hobby {}: {}", hobby_id, e);
            }
        }
        tracing::info!("Similarity worker stopped");
    });

    (
        RelationQueue {
            sender: Some(sender),
        },
        handle,
    )
}
