// Prezo rotation

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::value_objects::UserId;

/// Number of past event dates whose prezo is skipped when possible.
pub const PREZO_HISTORY: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RotationOutcome {
    pub eligible: Vec<UserId>,
    /// The recent prezos covered everybody, so the whole pool was used.
    pub fallback: bool,
    pub chosen: Option<UserId>,
}

/// Picks uniformly among `present` minus `recent`, or among `present` when
/// that leaves nobody. Only returns `None` for an empty pool.
pub fn select_prezo<R: Rng + ?Sized>(
    present: &[UserId],
    recent: &[UserId],
    rng: &mut R,
) -> RotationOutcome {
    let mut seen = HashSet::new();
    let pool: Vec<UserId> = present
        .iter()
        .filter(|user| seen.insert(*user))
        .cloned()
        .collect();
    let recent: HashSet<&UserId> = recent.iter().collect();
    let eligible: Vec<UserId> = pool
        .iter()
        .filter(|user| !recent.contains(user))
        .cloned()
        .collect();

    let fallback = eligible.is_empty() && !pool.is_empty();
    let chosen = if fallback {
        pool.choose(rng).cloned()
    } else {
        eligible.choose(rng).cloned()
    };

    RotationOutcome {
        eligible,
        fallback,
        chosen,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn users(names: &[&str]) -> Vec<UserId> {
        names.iter().map(|name| UserId::from(*name)).collect()
    }

    #[test]
    fn single_remaining_candidate_is_chosen() {
        let present = users(&["a", "b", "c"]);
        let recent = users(&["a", "b"]);
        for seed in 0..16 {
            let mut rng = StdRng::seed_from_u64(seed);
            let outcome = select_prezo(&present, &recent, &mut rng);
            assert_eq!(outcome.chosen, Some(UserId::from("c")));
            assert!(!outcome.fallback);
        }
    }

    #[test]
    fn falls_back_to_everybody_present() {
        let present = users(&["a", "b"]);
        let recent = users(&["b", "a", "z"]);
        let mut picked = HashSet::new();
        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            let outcome = select_prezo(&present, &recent, &mut rng);
            assert!(outcome.fallback);
            assert!(outcome.eligible.is_empty());
            let chosen = outcome.chosen.expect("someone is present");
            assert!(present.contains(&chosen));
            picked.insert(chosen);
        }
        assert_eq!(picked.len(), 2);
    }

    #[test]
    fn never_picks_outside_the_pool() {
        let present = users(&["a", "b", "c", "d"]);
        let recent = users(&["x", "c"]);
        for seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let chosen = select_prezo(&present, &recent, &mut rng)
                .chosen
                .expect("pool is not empty");
            assert!(present.contains(&chosen));
            assert_ne!(chosen, UserId::from("c"));
        }
    }

    #[test]
    fn empty_pool_picks_nobody() {
        let mut rng = StdRng::seed_from_u64(3);
        let outcome = select_prezo(&[], &users(&["a"]), &mut rng);
        assert_eq!(outcome.chosen, None);
        assert!(!outcome.fallback);
    }

    #[test]
    fn duplicate_presences_count_once() {
        let present = users(&["a", "a", "b"]);
        let mut rng = StdRng::seed_from_u64(5);
        let outcome = select_prezo(&present, &[], &mut rng);
        assert_eq!(outcome.eligible, users(&["a", "b"]));
    }
}
