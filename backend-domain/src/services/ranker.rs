// Event type suggestion ranking
//
// Ratings of the people who may attend are averaged per event type, the event
// types of the last events are set aside, and the best rated ones are kept.
// Equal averages are ordered at random so the same favourites do not always
// win the tie.

use std::collections::{HashMap, HashSet};

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::entities::{EventType, Preference};
use crate::value_objects::EventTypeId;

/// Size of a suggestion batch.
pub const SUGGESTION_COUNT: usize = 3;
/// Number of past events whose event type cannot be suggested again.
pub const EVENT_TYPE_HISTORY: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventTypeRating {
    pub id: EventTypeId,
    pub name: String,
    pub total: i64,
    pub count: u32,
    /// `None` when nobody rated the event type.
    pub average: Option<f64>,
}

impl EventTypeRating {
    fn event_type(&self) -> EventType {
        EventType {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingGroup {
    pub average: f64,
    pub event_types: Vec<EventType>,
}

/// Every intermediate result of a ranking run, kept for the audit log.
#[derive(Debug, Clone, Serialize)]
pub struct RankingOutcome {
    pub ratings: Vec<EventTypeRating>,
    pub candidates: Vec<EventTypeRating>,
    pub history_ignored: bool,
    pub groups: Vec<RatingGroup>,
    pub suggestions: Vec<EventType>,
}

pub fn aggregate_ratings(
    event_types: &[EventType],
    preferences: &[Preference],
) -> Vec<EventTypeRating> {
    let mut totals: HashMap<&EventTypeId, (i64, u32)> = HashMap::new();
    for preference in preferences {
        let entry = totals.entry(&preference.event_type).or_default();
        entry.0 += i64::from(preference.rating);
        entry.1 += 1;
    }

    event_types
        .iter()
        .map(|event_type| {
            let (total, count) = totals.get(&event_type.id).copied().unwrap_or_default();
            EventTypeRating {
                id: event_type.id.clone(),
                name: event_type.name.clone(),
                total,
                count,
                average: (count > 0).then(|| total as f64 / f64::from(count)),
            }
        })
        .collect()
}

/// Keeps the rated event types that are not in `recent`.
///
/// When the history would remove every rated event type it is ignored and the
/// second value of the tuple is `true`.
pub fn exclude_recent(
    ratings: &[EventTypeRating],
    recent: &HashSet<EventTypeId>,
) -> (Vec<EventTypeRating>, bool) {
    let rated: Vec<EventTypeRating> = ratings
        .iter()
        .filter(|rating| rating.average.is_some())
        .cloned()
        .collect();
    let kept: Vec<EventTypeRating> = rated
        .iter()
        .filter(|rating| !recent.contains(&rating.id))
        .cloned()
        .collect();
    if kept.is_empty() && !rated.is_empty() {
        (rated, true)
    } else {
        (kept, false)
    }
}

/// Groups candidates by exact average, ascending, each group shuffled.
pub fn group_by_average<R: Rng + ?Sized>(
    candidates: &[EventTypeRating],
    rng: &mut R,
) -> Vec<RatingGroup> {
    let mut rated: Vec<(f64, EventType)> = candidates
        .iter()
        .filter_map(|rating| rating.average.map(|average| (average, rating.event_type())))
        .collect();
    rated.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut groups: Vec<RatingGroup> = Vec::new();
    for (average, event_type) in rated {
        match groups.last_mut() {
            Some(group) if group.average == average => group.event_types.push(event_type),
            _ => groups.push(RatingGroup {
                average,
                event_types: vec![event_type],
            }),
        }
    }
    for group in &mut groups {
        group.event_types.shuffle(rng);
    }
    groups
}

/// The `limit` last entries of the concatenated groups, i.e. the best rated.
pub fn take_best(groups: &[RatingGroup], limit: usize) -> Vec<EventType> {
    let ordered: Vec<EventType> = groups
        .iter()
        .flat_map(|group| group.event_types.iter().cloned())
        .collect();
    let start = ordered.len().saturating_sub(limit);
    ordered[start..].to_vec()
}

pub fn rank_event_types<R: Rng + ?Sized>(
    event_types: &[EventType],
    preferences: &[Preference],
    recent: &HashSet<EventTypeId>,
    limit: usize,
    rng: &mut R,
) -> RankingOutcome {
    let ratings = aggregate_ratings(event_types, preferences);
    let (candidates, history_ignored) = exclude_recent(&ratings, recent);
    let groups = group_by_average(&candidates, rng);
    let suggestions = take_best(&groups, limit);
    RankingOutcome {
        ratings,
        candidates,
        history_ignored,
        groups,
        suggestions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::UserId;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn event_type(id: &str) -> EventType {
        EventType {
            id: EventTypeId::from(id),
            name: format!("{id} night"),
        }
    }

    fn rating(user: &str, event_type: &str, rating: i32) -> Preference {
        Preference {
            user: UserId::from(user),
            event_type: EventTypeId::from(event_type),
            rating,
        }
    }

    fn ids(event_types: &[EventType]) -> HashSet<EventTypeId> {
        event_types.iter().map(|item| item.id.clone()).collect()
    }

    #[test]
    fn averages_ignore_unrated_event_types() {
        let catalog = vec![event_type("x"), event_type("y")];
        let ratings = aggregate_ratings(&catalog, &[rating("a", "x", 3), rating("b", "x", 4)]);
        assert_eq!(ratings[0].average, Some(3.5));
        assert_eq!(ratings[0].count, 2);
        assert_eq!(ratings[1].average, None);
        assert_eq!(ratings[1].count, 0);
    }

    #[test]
    fn tied_favourites_beat_excluded_event_type() {
        let catalog = vec![event_type("x"), event_type("y"), event_type("z")];
        let preferences = vec![
            rating("a", "x", 4),
            rating("b", "x", 4),
            rating("a", "y", 4),
            rating("a", "z", 2),
            rating("b", "z", 2),
            rating("c", "z", 2),
        ];
        let recent: HashSet<EventTypeId> = [EventTypeId::from("z")].into_iter().collect();
        let mut seen_orders = HashSet::new();
        for seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let outcome =
                rank_event_types(&catalog, &preferences, &recent, SUGGESTION_COUNT, &mut rng);
            assert_eq!(outcome.suggestions.len(), 2);
            assert_eq!(
                ids(&outcome.suggestions),
                [EventTypeId::from("x"), EventTypeId::from("y")].into_iter().collect()
            );
            seen_orders.insert(outcome.suggestions[0].id.clone());
        }
        assert_eq!(seen_orders.len(), 2, "ties should be broken both ways");
    }

    #[test]
    fn unrated_event_type_never_suggested() {
        let catalog = vec![event_type("x"), event_type("unrated"), event_type("y")];
        let preferences = vec![rating("a", "x", 1), rating("a", "y", 1)];
        for seed in 0..16 {
            let mut rng = StdRng::seed_from_u64(seed);
            let outcome =
                rank_event_types(&catalog, &preferences, &HashSet::new(), 3, &mut rng);
            assert!(outcome
                .suggestions
                .iter()
                .all(|item| item.id != EventTypeId::from("unrated")));
            assert_eq!(outcome.suggestions.len(), 2);
        }
    }

    #[test]
    fn keeps_the_best_rated_in_ascending_order() {
        let catalog: Vec<EventType> = ["a", "b", "c", "d", "e"].into_iter().map(event_type).collect();
        let preferences = vec![
            rating("u", "a", 1),
            rating("u", "b", 5),
            rating("u", "c", 3),
            rating("u", "d", 4),
            rating("u", "e", 2),
        ];
        let mut rng = StdRng::seed_from_u64(7);
        let outcome = rank_event_types(&catalog, &preferences, &HashSet::new(), 3, &mut rng);
        let names: Vec<&str> = outcome.suggestions.iter().map(|item| item.id.0.as_str()).collect();
        assert_eq!(names, vec!["c", "d", "b"]);
        let averages: Vec<f64> = outcome.groups.iter().map(|group| group.average).collect();
        assert_eq!(averages, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn history_is_always_excluded_when_something_remains() {
        let catalog: Vec<EventType> = ["a", "b", "c", "d", "e", "f"].into_iter().map(event_type).collect();
        let preferences: Vec<Preference> = catalog
            .iter()
            .enumerate()
            .map(|(idx, item)| rating("u", &item.id.0, idx as i32))
            .collect();
        for k in 0..catalog.len() {
            let recent: HashSet<EventTypeId> =
                catalog.iter().rev().take(k).map(|item| item.id.clone()).collect();
            let mut rng = StdRng::seed_from_u64(k as u64);
            let outcome = rank_event_types(&catalog, &preferences, &recent, 3, &mut rng);
            assert!(!outcome.history_ignored);
            assert_eq!(outcome.suggestions.len(), 3.min(catalog.len() - k));
            assert!(outcome.suggestions.iter().all(|item| !recent.contains(&item.id)));
        }
    }

    #[test]
    fn history_is_ignored_when_it_removes_everything() {
        let catalog = vec![event_type("x"), event_type("y")];
        let preferences = vec![rating("a", "x", 2), rating("a", "y", 5)];
        let recent = ids(&catalog);
        let mut rng = StdRng::seed_from_u64(1);
        let outcome = rank_event_types(&catalog, &preferences, &recent, 3, &mut rng);
        assert!(outcome.history_ignored);
        assert_eq!(outcome.suggestions.len(), 2);
    }

    #[test]
    fn nothing_rated_yields_nothing() {
        let catalog = vec![event_type("x")];
        let mut rng = StdRng::seed_from_u64(1);
        let outcome = rank_event_types(&catalog, &[], &HashSet::new(), 3, &mut rng);
        assert!(outcome.candidates.is_empty());
        assert!(outcome.suggestions.is_empty());
        assert!(!outcome.history_ignored);
    }
}
