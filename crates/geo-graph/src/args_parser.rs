//! Typed, ordered argument specification matched against an unordered
//! candidate list (spec §4.C). A `ArgsParser` is plain data — a `Vec` of
//! spec entries — mirroring how `pattern-core`'s `GraphQuery` is built from
//! plain closures rather than a trait object: nothing here needs dynamic
//! dispatch.

use geo_imp::value::ObjectImp;
use geo_imp::ImpType;

/// One slot in the ordered argument specification.
#[derive(Debug, Clone, Copy)]
pub struct ArgSpecEntry {
    pub required_type: &'static ImpType,
    pub use_text: &'static str,
    pub select_text: &'static str,
    pub on_or_through: bool,
    /// Non-`None` only on the final entry: a variadic tail accepting
    /// between `min` and `max` additional Imps of `required_type` (e.g.
    /// a polygon's vertices, or a cubic's up-to-9 defining points).
    pub repeat: Option<(usize, usize)>,
    /// Whether re-selecting an Imp already bound to this slot is
    /// tolerated (spec §4.C: "some constructions allow, e.g. a degenerate
    /// bisector").
    pub duplicate_ok: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckResult {
    Invalid,
    Valid,
    Complete,
}

/// The outcome of matching a candidate list against the spec: which
/// spec-entry index (if any) each candidate was bound to, in candidate
/// order, plus the overall verdict.
#[derive(Debug, Clone)]
pub struct MatchResult {
    pub assignment: Vec<Option<usize>>,
    pub status: CheckResult,
}

#[derive(Debug, Clone)]
pub struct ArgsParser {
    pub entries: Vec<ArgSpecEntry>,
}

impl ArgsParser {
    pub fn new(entries: Vec<ArgSpecEntry>) -> Self {
        ArgsParser { entries }
    }

    fn type_depth(t: &'static ImpType) -> usize {
        let mut depth = 0;
        let mut cur = t.parent();
        while let Some(p) = cur {
            depth += 1;
            cur = p.parent();
        }
        depth
    }

    /// Greedy assignment: each candidate, in order, goes to the
    /// still-available slot whose required type it inherits from and
    /// which is most specific (deepest in the lattice) among those
    /// eligible — spec §4.C's tie-break rule.
    pub fn matching_args(&self, imps: &[ObjectImp]) -> MatchResult {
        let mut counts = vec![0usize; self.entries.len()];
        let mut assignment = Vec::with_capacity(imps.len());
        let mut any_unassignable = false;

        for imp in imps {
            let ty = imp.imp_type();
            let best = self
                .entries
                .iter()
                .enumerate()
                .filter(|(i, e)| {
                    let cap = e.repeat.map(|(_, max)| max).unwrap_or(1);
                    counts[*i] < cap && ty.inherits(e.required_type)
                })
                .max_by_key(|(_, e)| Self::type_depth(e.required_type));

            match best {
                Some((i, _)) => {
                    counts[i] += 1;
                    assignment.push(Some(i));
                }
                None => {
                    any_unassignable = true;
                    assignment.push(None);
                }
            }
        }

        let all_slots_satisfied = self.entries.iter().enumerate().all(|(i, e)| {
            let min = e.repeat.map(|(min, _)| min).unwrap_or(1);
            counts[i] >= min
        });

        let status = if any_unassignable {
            CheckResult::Invalid
        } else if all_slots_satisfied {
            CheckResult::Complete
        } else {
            CheckResult::Valid
        };

        MatchResult { assignment, status }
    }

    pub fn check(&self, imps: &[ObjectImp]) -> CheckResult {
        self.matching_args(imps).status
    }

    /// Permutes an accepted argument list into the spec's declared order.
    /// Candidates that tie for the same slot (repeat tails) keep their
    /// relative input order.
    pub fn sort(&self, imps: &[ObjectImp]) -> Vec<ObjectImp> {
        let m = self.matching_args(imps);
        let mut buckets: Vec<Vec<ObjectImp>> = vec![Vec::new(); self.entries.len()];
        for (imp, slot) in imps.iter().zip(m.assignment.iter()) {
            if let Some(i) = slot {
                buckets[*i].push(imp.clone());
            }
        }
        buckets.into_iter().flatten().collect()
    }

    /// Whether re-picking `args[index]` as an additional candidate is
    /// permitted, per the slot it currently occupies.
    pub fn is_already_selected_ok(&self, args: &[ObjectImp], index: usize) -> bool {
        let m = self.matching_args(args);
        match m.assignment.get(index).copied().flatten() {
            Some(slot) => self.entries[slot].duplicate_ok,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_imp::value::{DoubleImp, PointImp};
    use geo_imp::{imp_type, Coordinate};

    fn two_point_parser() -> ArgsParser {
        ArgsParser::new(vec![
            ArgSpecEntry {
                required_type: &imp_type::POINT,
                use_text: "point A",
                select_text: "Select point A",
                on_or_through: false,
                repeat: None,
                duplicate_ok: false,
            },
            ArgSpecEntry {
                required_type: &imp_type::POINT,
                use_text: "point B",
                select_text: "Select point B",
                on_or_through: false,
                repeat: None,
                duplicate_ok: false,
            },
        ])
    }

    #[test]
    fn empty_input_is_valid_not_complete() {
        let parser = two_point_parser();
        assert_eq!(parser.check(&[]), CheckResult::Valid);
    }

    #[test]
    fn two_points_complete_the_parser() {
        let parser = two_point_parser();
        let args = vec![
            ObjectImp::Point(PointImp::new(Coordinate::new(0.0, 0.0))),
            ObjectImp::Point(PointImp::new(Coordinate::new(1.0, 1.0))),
        ];
        assert_eq!(parser.check(&args), CheckResult::Complete);
    }

    #[test]
    fn wrong_type_is_invalid() {
        let parser = two_point_parser();
        let args = vec![ObjectImp::Double(DoubleImp(1.0))];
        assert_eq!(parser.check(&args), CheckResult::Invalid);
    }

    #[test]
    fn sort_is_idempotent() {
        let parser = two_point_parser();
        let args = vec![
            ObjectImp::Point(PointImp::new(Coordinate::new(1.0, 1.0))),
            ObjectImp::Point(PointImp::new(Coordinate::new(0.0, 0.0))),
        ];
        let once = parser.sort(&args);
        let twice = parser.sort(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn repeat_tail_accepts_a_variable_count() {
        let parser = ArgsParser::new(vec![ArgSpecEntry {
            required_type: &imp_type::POINT,
            use_text: "vertices",
            select_text: "Select vertices",
            on_or_through: false,
            repeat: Some((3, 9)),
            duplicate_ok: false,
        }]);
        let two = vec![
            ObjectImp::Point(PointImp::new(Coordinate::new(0.0, 0.0))),
            ObjectImp::Point(PointImp::new(Coordinate::new(1.0, 0.0))),
        ];
        assert_eq!(parser.check(&two), CheckResult::Valid);
        let three = {
            let mut v = two.clone();
            v.push(ObjectImp::Point(PointImp::new(Coordinate::new(0.0, 1.0))));
            v
        };
        assert_eq!(parser.check(&three), CheckResult::Complete);
    }
}
