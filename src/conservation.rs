//! Per-pocket averages of per-residue scores.
//!
//! Each pocket's residues are looked up in the structure's residue index and
//! the matching entries of a score array are averaged. Results are strings
//! formatted to three decimals, or [`NOT_AVAILABLE`] when there is nothing to
//! average.

use rustc_hash::FxHashMap;

use crate::options::MissingResidue;
use crate::prediction::PocketDescriptor;

/// Placeholder for an average that cannot be computed.
pub const NOT_AVAILABLE: &str = "N/A";

/// Average `scores` over each pocket's residues.
///
/// `indices` is the structure's residue-identifier list and `scores` the
/// parallel per-residue array. Without score data every pocket reports
/// [`NOT_AVAILABLE`]. Residues absent from `indices` (or past the end of
/// `scores`) are handled according to `policy`.
#[must_use]
pub fn compute_averages(
    pockets: &[PocketDescriptor],
    indices: &[String],
    scores: Option<&[f64]>,
    policy: MissingResidue,
) -> Vec<String> {
    let Some(scores) = scores.filter(|s| !s.is_empty()) else {
        return vec![NOT_AVAILABLE.to_owned(); pockets.len()];
    };

    let index_map: FxHashMap<&str, usize> = indices
        .iter()
        .enumerate()
        .map(|(i, id)| (id.as_str(), i))
        .collect();

    pockets
        .iter()
        .map(|pocket| {
            pocket_average(pocket, &index_map, scores, policy).map_or_else(
                || NOT_AVAILABLE.to_owned(),
                |avg| format!("{avg:.3}"),
            )
        })
        .collect()
}

fn pocket_average(
    pocket: &PocketDescriptor,
    index_map: &FxHashMap<&str, usize>,
    scores: &[f64],
    policy: MissingResidue,
) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0_usize;
    for residue in &pocket.residues {
        let score = index_map
            .get(residue.as_str())
            .and_then(|&i| scores.get(i));
        match (score, policy) {
            (Some(score), _) => {
                sum += score;
                count += 1;
            }
            (None, MissingResidue::Skip) => {
                log::warn!(
                    "{}: residue {residue} has no score, skipped",
                    pocket.name
                );
            }
            (None, MissingResidue::FailPocket) => {
                log::warn!(
                    "{}: residue {residue} has no score, average unavailable",
                    pocket.name
                );
                return None;
            }
        }
    }
    (count > 0).then(|| sum / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pocket(name: &str, residues: &[&str]) -> PocketDescriptor {
        PocketDescriptor {
            name: name.to_owned(),
            rank: 1,
            score: 0.0,
            probability: 0.0,
            center: [0.0; 3],
            residues: residues.iter().map(|&r| r.to_owned()).collect(),
            surface: vec![],
        }
    }

    fn indices() -> Vec<String> {
        ["A_1", "A_2", "A_3"].iter().map(|&s| s.to_owned()).collect()
    }

    #[test]
    fn averages_mapped_residues() {
        let pockets = [pocket("p1", &["A_1", "A_3"])];
        let avg = compute_averages(
            &pockets,
            &indices(),
            Some(&[1.0, 2.0, 3.0][..]),
            MissingResidue::Skip,
        );
        assert_eq!(avg, vec!["2.000"]);
    }

    #[test]
    fn no_scores_means_not_available_everywhere() {
        let pockets = [pocket("p1", &["A_1"]), pocket("p2", &["A_2"])];
        for scores in [None, Some(&[][..])] {
            let avg = compute_averages(
                &pockets,
                &indices(),
                scores,
                MissingResidue::Skip,
            );
            assert_eq!(avg, vec![NOT_AVAILABLE, NOT_AVAILABLE]);
        }
    }

    #[test]
    fn rounds_to_three_decimals() {
        let pockets = [pocket("p1", &["A_1", "A_2", "A_3"])];
        let avg = compute_averages(
            &pockets,
            &indices(),
            Some(&[0.1, 0.2, 0.4][..]),
            MissingResidue::Skip,
        );
        assert_eq!(avg, vec!["0.233"]);
    }

    #[test]
    fn skip_policy_ignores_unknown_residues() {
        let pockets = [pocket("p1", &["A_1", "B_9", "A_2"])];
        let avg = compute_averages(
            &pockets,
            &indices(),
            Some(&[1.0, 2.0, 3.0][..]),
            MissingResidue::Skip,
        );
        assert_eq!(avg, vec!["1.500"]);
    }

    #[test]
    fn fail_policy_drops_the_pocket_only() {
        let pockets = [pocket("p1", &["A_1", "B_9"]), pocket("p2", &["A_3"])];
        let avg = compute_averages(
            &pockets,
            &indices(),
            Some(&[1.0, 2.0, 3.0][..]),
            MissingResidue::FailPocket,
        );
        assert_eq!(avg, vec![NOT_AVAILABLE, "3.000"]);
    }

    #[test]
    fn empty_pocket_is_not_available() {
        let pockets = [pocket("p1", &[])];
        let avg = compute_averages(
            &pockets,
            &indices(),
            Some(&[1.0][..]),
            MissingResidue::Skip,
        );
        assert_eq!(avg, vec![NOT_AVAILABLE]);
    }

    #[test]
    fn short_score_array_counts_as_missing() {
        let pockets = [pocket("p1", &["A_1", "A_3"])];
        let avg = compute_averages(
            &pockets,
            &indices(),
            Some(&[4.0][..]),
            MissingResidue::Skip,
        );
        assert_eq!(avg, vec!["4.000"]);
    }
}
