//! Integration tests for the batching of envelopes

use claims::assert_ok;
use proptest::prelude::*;
use rstest::rstest;
use serde_json::{Value, json};

use crate::support::{request, run};

fn records(n: usize) -> Value {
    Value::Array((0..n).map(|i| json!({ "id": i })).collect())
}

#[rstest]
#[case(5, 2, vec![2, 2, 1])]
#[case(4, 2, vec![2, 2])]
#[case(1, 500, vec![1])]
#[case(0, 10, vec![])]
fn batch_sizes_per_file(#[case] n: usize, #[case] batch_size: i64, #[case] expected: Vec<usize>) {
    let files = [("1.s.t.json".to_string(), records(n))];
    let (result, batches) = run(files, request("load", batch_size));

    let summary = assert_ok!(result);
    assert_eq!(summary.loaded_records, n as u64);
    let sizes: Vec<usize> = batches.iter().map(Vec::len).collect();
    assert_eq!(sizes, expected);
}

#[test]
fn batches_never_span_files() {
    let files = [
        ("2.s.a.json".to_string(), records(3)),
        ("1.s.b.json".to_string(), records(3)),
    ];

    let (result, batches) = run(files, request("load", 2));

    assert_eq!(assert_ok!(result).loaded_records, 6);
    let sizes: Vec<usize> = batches.iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![2, 1, 2, 1]);
}

#[rstest]
fn out_of_range_batch_size_dispatches_nothing(
    #[values(i64::MIN, -5, 0, 501, 1_000)] batch_size: i64,
) {
    let files = [("1.s.t.json".to_string(), records(10))];
    let (result, batches) = run(files, request("load", batch_size));

    assert_eq!(assert_ok!(result).loaded_records, 0);
    assert!(batches.is_empty());
}

proptest! {
    #[test]
    fn loaded_records_matches_envelope_count(
        sizes in prop::collection::vec(0usize..30, 1..5),
        batch_size in 1i64..=500,
    ) {
        let files: Vec<(String, Value)> = sizes
            .iter()
            .enumerate()
            .map(|(i, &n)| (format!("{i}.s.t{i}.json"), records(n)))
            .collect();
        let total: usize = sizes.iter().sum();
        let expected_batches: usize = sizes.iter().map(|&n| n.div_ceil(batch_size as usize)).sum();

        let (result, batches) = run(files, request("load", batch_size));

        prop_assert_eq!(result.unwrap().loaded_records, total as u64);
        prop_assert_eq!(batches.len(), expected_batches);
        prop_assert!(batches.iter().all(|b| b.len() <= batch_size as usize && !b.is_empty()));
    }
}
