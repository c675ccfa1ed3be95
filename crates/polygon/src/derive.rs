//! Derivation rules: views computed from the source model.
//!
//! Everything here is a pure function of the parsed package. CATS refers to
//! tests by rank ranges, so the central rule is [`compact_range`], which
//! turns the ranks of a test group into `first-last[-stride]` notation.

use crate::diagnostics::Diagnostics;
use crate::error::{PolygonError, RangeError};
use crate::model::{Executable, ProblemName, Test, TestSet};
use indexmap::IndexMap;
use std::collections::HashSet;

/// Executables used as the generator of at least one generated test.
///
/// Order follows `executables`. Generated tests naming an unknown
/// generator are reported.
pub fn generators<'a>(
    executables: &'a [Executable],
    tests: &[Test],
    diagnostics: &mut Diagnostics,
) -> Vec<&'a Executable> {
    let used: HashSet<&str> = tests
        .iter()
        .filter(|t| t.is_generated())
        .filter_map(Test::generator)
        .collect();

    let found: Vec<&Executable> = executables
        .iter()
        .filter(|exec| used.contains(exec.stem().as_str()))
        .collect();

    let mut missing: Vec<&str> = used
        .iter()
        .copied()
        .filter(|name| !found.iter().any(|exec| exec.stem() == *name))
        .collect();
    missing.sort_unstable();
    for name in missing {
        diagnostics.warn(format!("generator '{}' is not among the package executables", name));
    }

    found
}

/// Compact a group's ranks into CATS range notation
pub fn compact_range(group: &str, ranks: &[usize]) -> Result<String, RangeError> {
    let mut sorted = ranks.to_vec();
    sorted.sort_unstable();

    if sorted.len() < 2 {
        return Ok(sorted.first().map(usize::to_string).unwrap_or_default());
    }

    let first = sorted[0];
    let last = sorted[sorted.len() - 1];
    let delta = sorted[1] - first;
    let uniform = delta >= 1 && sorted.windows(2).all(|pair| pair[1] - pair[0] == delta);
    if !uniform {
        return Err(RangeError::Inconsistent { group: group.to_string(), ranks: sorted });
    }

    if delta == 1 {
        Ok(format!("{}-{}", first, last))
    } else {
        Ok(format!("{}-{}-{}", first, last, delta))
    }
}

/// Ranks of every group, keyed in group declaration order
pub fn group_ranks(test_set: &TestSet) -> Result<IndexMap<String, Vec<usize>>, PolygonError> {
    let mut ranks: IndexMap<String, Vec<usize>> = test_set
        .groups
        .iter()
        .map(|g| (g.name.clone(), Vec::new()))
        .collect();

    for (rank, test) in test_set.ranked_tests() {
        let Some(group) = test.group.as_deref() else { continue };
        match ranks.get_mut(group) {
            Some(members) => members.push(rank),
            None => {
                return Err(PolygonError::UnknownGroup { rank, group: group.to_string() });
            }
        }
    }

    Ok(ranks)
}

/// Compacted range string of every group
pub fn group_ranges(test_set: &TestSet) -> Result<IndexMap<String, String>, PolygonError> {
    group_ranks(test_set)?
        .into_iter()
        .map(|(name, ranks)| {
            let range = compact_range(&name, &ranks)?;
            Ok((name, range))
        })
        .collect()
}

/// CATS rank for `count` items starting at 1
pub fn cats_rank(count: usize) -> String {
    if count <= 1 {
        "1".to_string()
    } else {
        format!("1-{}", count)
    }
}

/// Two-letter CATS language code of a Polygon language name
pub fn language_code(language: &str) -> String {
    language.chars().take(2).collect()
}

/// Comma-joined language codes of all problem names
pub fn languages(names: &[ProblemName]) -> String {
    names
        .iter()
        .map(|n| language_code(&n.language))
        .collect::<Vec<_>>()
        .join(",")
}

/// Time limit in seconds, integral when possible
pub fn time_limit_seconds(milliseconds: u64) -> String {
    let seconds = milliseconds / 1000;
    let fraction = milliseconds % 1000;
    if fraction == 0 {
        seconds.to_string()
    } else {
        let digits = format!("{:03}", fraction);
        format!("{}.{}", seconds, digits.trim_end_matches('0'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Group, MemoryLimit, SourceAsset};

    fn test_set(tests: Vec<Test>, groups: &[&str]) -> TestSet {
        TestSet {
            name: "tests".to_string(),
            time_limit: 1000,
            memory_limit: MemoryLimit(256 << 20),
            test_count: tests.len(),
            input_path_pattern: "tests/%02d".to_string(),
            output_path_pattern: None,
            answer_path_pattern: "tests/%02d.a".to_string(),
            tests,
            groups: groups.iter().map(|name| Group::new(*name)).collect(),
        }
    }

    #[test]
    fn test_compact_contiguous() {
        assert_eq!(compact_range("g", &[1, 2, 3]).unwrap(), "1-3");
        assert_eq!(compact_range("g", &[3, 1, 2]).unwrap(), "1-3");
    }

    #[test]
    fn test_compact_strided() {
        assert_eq!(compact_range("g", &[3, 5, 7, 9]).unwrap(), "3-9-2");
        assert_eq!(compact_range("g", &[1, 4]).unwrap(), "1-4-3");
    }

    #[test]
    fn test_compact_single_and_empty() {
        assert_eq!(compact_range("g", &[5]).unwrap(), "5");
        assert_eq!(compact_range("g", &[]).unwrap(), "");
    }

    #[test]
    fn test_compact_rejects_irregular_stride() {
        let err = compact_range("G3", &[4, 1, 2]).unwrap_err();
        assert_eq!(
            err,
            RangeError::Inconsistent { group: "G3".to_string(), ranks: vec![1, 2, 4] }
        );
        let message = err.to_string();
        assert!(message.contains("G3"));
        assert!(message.contains("{1,2,4}"));
    }

    #[test]
    fn test_compact_rejects_duplicates() {
        assert!(compact_range("g", &[2, 2]).is_err());
    }

    #[test]
    fn test_group_ranges() {
        let tests = vec![
            Test::manual().in_group("G2"),
            Test::manual().in_group("G1"),
            Test::manual().in_group("G2"),
            Test::manual().in_group("G1"),
            Test::manual().in_group("G2"),
        ];
        let ranges = group_ranges(&test_set(tests, &["G1", "G2"])).unwrap();
        assert_eq!(ranges["G1"], "2-4-2");
        assert_eq!(ranges["G2"], "1-5-2");
        assert_eq!(ranges.keys().collect::<Vec<_>>(), vec!["G1", "G2"]);
    }

    #[test]
    fn test_group_ranges_inconsistent() {
        let tests = vec![
            Test::manual().in_group("G"),
            Test::manual(),
            Test::manual().in_group("G"),
            Test::manual().in_group("G"),
        ];
        let err = group_ranges(&test_set(tests, &["G"])).unwrap_err();
        assert!(err.to_string().contains("{1,3,4}"));
    }

    #[test]
    fn test_ungrouped_tests_are_skipped() {
        let tests = vec![Test::manual(), Test::manual().in_group("G")];
        let ranks = group_ranks(&test_set(tests, &["G", "empty"])).unwrap();
        assert_eq!(ranks["G"], vec![2]);
        assert!(ranks["empty"].is_empty());
    }

    #[test]
    fn test_unknown_group_is_fatal() {
        let tests = vec![Test::manual().in_group("ghost")];
        let err = group_ranks(&test_set(tests, &["G"])).unwrap_err();
        assert!(matches!(err, PolygonError::UnknownGroup { rank: 1, .. }));
    }

    #[test]
    fn test_generator_discovery() {
        let executables: Vec<Executable> = ["files/val.cpp", "files/gen.cpp", "files/rand.py"]
            .iter()
            .map(|p| Executable { source: SourceAsset::new(*p, None) })
            .collect();
        let tests = vec![
            Test::generated("rand 5"),
            Test::manual(),
            Test::generated("gen 1 2"),
            Test::generated("missing 3"),
        ];
        let mut diagnostics = Diagnostics::new();
        let found = generators(&executables, &tests, &mut diagnostics);
        let stems: Vec<_> = found.iter().map(|e| e.stem()).collect();
        assert_eq!(stems, vec!["gen", "rand"]);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics.warnings()[0].contains("missing"));
    }

    #[test]
    fn test_cats_rank() {
        assert_eq!(cats_rank(1), "1");
        assert_eq!(cats_rank(12), "1-12");
    }

    #[test]
    fn test_languages() {
        let names = vec![
            ProblemName { language: "russian".to_string(), value: "a".to_string() },
            ProblemName { language: "english".to_string(), value: "b".to_string() },
        ];
        assert_eq!(languages(&names), "ru,en");
    }

    #[test]
    fn test_time_limit_seconds() {
        assert_eq!(time_limit_seconds(1000), "1");
        assert_eq!(time_limit_seconds(2500), "2.5");
        assert_eq!(time_limit_seconds(500), "0.5");
        assert_eq!(time_limit_seconds(1250), "1.25");
    }
}
