use crate::{Alphabet, Error, Identifier, MembershipFilter, RandSource, Result, generate};

/// Everything a fill needs besides the shared filter and random source.
#[derive(Clone, Debug)]
pub(crate) struct FillPlan {
    pub(crate) alphabet: Alphabet,
    pub(crate) length: usize,
    pub(crate) capacity: usize,
    /// Give up after this many rejected candidates in a row. `None` keeps
    /// trying forever.
    pub(crate) max_consecutive_rejections: Option<u64>,
}

/// A completed batch plus what it cost to produce.
#[derive(Debug)]
pub(crate) struct FillOutcome {
    pub(crate) ids: Vec<Identifier>,
    /// Candidates discarded because the filter had (possibly) seen them.
    pub(crate) rejected: u64,
    /// Candidates lost to random source failures.
    pub(crate) generation_errors: u64,
}

/// Accumulates `plan.capacity` fresh identifiers for bucket `bucket`.
///
/// Each candidate is accepted through [`MembershipFilter::insert_if_absent`],
/// so it is recorded in the filter the moment it is taken and no concurrent
/// fill can take it too. Generation failures and filter hits are retried in
/// place.
///
/// # Errors
///
/// Returns [`Error::KeyspaceExhausted`] once
/// `plan.max_consecutive_rejections` candidates in a row were rejected.
/// Identifiers accepted before that point stay recorded in the filter and are
/// never handed out.
pub(crate) fn fill_batch<R>(
    bucket: usize,
    plan: &FillPlan,
    filter: &MembershipFilter,
    rng: &R,
) -> Result<FillOutcome>
where
    R: RandSource + ?Sized,
{
    let mut ids = Vec::with_capacity(plan.capacity);
    let mut rejected = 0_u64;
    let mut generation_errors = 0_u64;
    let mut streak = 0_u64;

    while ids.len() < plan.capacity {
        let candidate = match generate(&plan.alphabet, plan.length, rng) {
            Ok(candidate) => candidate,
            Err(_e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(bucket, "candidate generation failed, retrying: {_e}");
                generation_errors += 1;
                continue;
            }
        };

        if filter.insert_if_absent(&candidate) {
            ids.push(candidate);
            streak = 0;
            continue;
        }

        rejected += 1;
        streak += 1;
        if let Some(limit) = plan.max_consecutive_rejections {
            if streak >= limit {
                return Err(Error::KeyspaceExhausted {
                    bucket,
                    attempts: streak,
                });
            }
        }
    }

    Ok(FillOutcome {
        ids,
        rejected,
        generation_errors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ThreadRandom;
    use crate::test_support::{BrokenThen, Scripted};
    use std::collections::HashSet;

    fn plan(length: usize, capacity: usize) -> FillPlan {
        FillPlan {
            alphabet: Alphabet::default(),
            length,
            capacity,
            max_consecutive_rejections: Some(1_000),
        }
    }

    #[test]
    fn fills_to_capacity_with_distinct_ids() {
        let filter = MembershipFilter::new(10_000, 0.001);
        let outcome = fill_batch(0, &plan(4, 500), &filter, &ThreadRandom).unwrap();

        assert_eq!(outcome.ids.len(), 500);
        let unique: HashSet<_> = outcome.ids.iter().collect();
        assert_eq!(unique.len(), 500);
        for id in &outcome.ids {
            assert_eq!(id.len(), 4);
            assert!(filter.exists(id));
        }
    }

    #[test]
    fn discards_previously_issued_candidates() {
        let filter = MembershipFilter::new(1_000, 0.001);
        filter.add("abcd");
        filter.add("efgh");

        let rng = Scripted::new(["abcd", "efgh", "abcd", "wxyz", "Q_9-"]);
        let outcome = fill_batch(0, &plan(4, 2), &filter, &rng).unwrap();

        assert_eq!(outcome.ids, vec![Identifier::from("wxyz"), Identifier::from("Q_9-")]);
        assert_eq!(outcome.rejected, 3);
    }

    #[test]
    fn never_repeats_within_a_batch() {
        let filter = MembershipFilter::new(1_000, 0.001);
        let rng = Scripted::new(["aaaa", "aaaa", "bbbb"]);
        let outcome = fill_batch(3, &plan(4, 2), &filter, &rng).unwrap();
        assert_eq!(outcome.ids, vec![Identifier::from("aaaa"), Identifier::from("bbbb")]);
        assert_eq!(outcome.rejected, 1);
    }

    #[test]
    fn retries_generation_failures() {
        let filter = MembershipFilter::new(1_000, 0.001);
        let rng = BrokenThen::new(3);
        let outcome = fill_batch(0, &plan(6, 4), &filter, &rng).unwrap();
        assert_eq!(outcome.ids.len(), 4);
        assert_eq!(outcome.generation_errors, 3);
    }

    #[test]
    fn gives_up_on_a_saturated_keyspace() {
        // Two symbols, length two: only four identifiers exist.
        let plan = FillPlan {
            alphabet: Alphabet::new("ab").unwrap(),
            length: 2,
            capacity: 8,
            max_consecutive_rejections: Some(200),
        };
        let filter = MembershipFilter::new(1_000, 0.0001);

        let err = fill_batch(5, &plan, &filter, &ThreadRandom).unwrap_err();
        assert_eq!(
            err,
            Error::KeyspaceExhausted {
                bucket: 5,
                attempts: 200
            }
        );
    }
}
