use super::*;

use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

use crate::node::Node;

/// Check structural invariants. Returns the depth of the deepest container,
/// or `None` if the root is still a bucket.
fn validate_tree<V>(t: &Trie<V>) -> Option<usize> {
    let mut stack: Vec<(&Node<V>, usize)> = vec![(&t.root, 0)];
    let mut entries = 0usize;
    let mut deepest_container = None;
    while let Some((node, depth)) = stack.pop() {
        match node {
            Node::Container(container) => {
                deepest_container = deepest_container.max(Some(depth));
                if container.value.is_some() {
                    entries += 1;
                }
                let mut children = 0usize;
                for (_, child) in container.children() {
                    children += 1;
                    stack.push((child, depth + 1));
                }
                assert_eq!(
                    children,
                    container.occupied(),
                    "occupied count must match live child slots"
                );
            }
            Node::Bucket(bucket) => {
                assert!(
                    bucket.len() <= t.burst_threshold,
                    "bucket of {} entries exceeds threshold {}",
                    bucket.len(),
                    t.burst_threshold
                );
                let suffixes: BTreeSet<&[u8]> = bucket.iter().map(|(s, _)| s).collect();
                assert_eq!(suffixes.len(), bucket.len(), "bucket suffixes must be unique");
                entries += bucket.len();
            }
        }
    }

    assert_eq!(entries, t.len, "reachable entry count must match Trie::len");
    deepest_container
}

/// Keys the trie would derive, computed without the trie's own helpers.
fn model_derived(mode: ChangeMode, input: &str) -> BTreeSet<String> {
    let cuts: Vec<usize> = input
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(input.len()))
        .collect();
    let mut out = BTreeSet::new();
    for (i, &start) in cuts.iter().enumerate() {
        for &end in &cuts[i + 1..] {
            let keep = match mode {
                ChangeMode::Prefix => start == 0,
                ChangeMode::Suffix => end == input.len(),
                ChangeMode::Substring => true,
            };
            if keep {
                out.insert(input[start..end].to_string());
            }
        }
    }
    out
}

#[derive(Clone, Debug)]
enum Op {
    Set(Vec<u8>, i64),
    Delete(Vec<u8>),
    Get(Vec<u8>),
    ChangeAll(ChangeMode, String),
}

fn text_strategy() -> impl Strategy<Value = String> + Clone {
    "[ab鸡]{0,6}"
}

fn key_strategy() -> impl Strategy<Value = Vec<u8>> + Clone {
    prop_oneof![
        3 => text_strategy().prop_map(String::into_bytes),
        1 => prop::collection::vec(any::<u8>(), 0..=8),
    ]
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    let key = key_strategy();
    let op = prop_oneof![
        45 => (key.clone(), any::<i64>()).prop_map(|(k, v)| Op::Set(k, v)),
        20 => key.clone().prop_map(Op::Delete),
        25 => key.clone().prop_map(Op::Get),
        10 => (any::<ChangeMode>(), text_strategy()).prop_map(|(m, s)| Op::ChangeAll(m, s)),
    ];
    prop::collection::vec(op, 0..=1000)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence(ops in ops_strategy(), threshold in 1usize..=8) {
        let mut t: Trie<i64> = Trie::builder().burst_threshold(threshold).build().unwrap();
        let mut m: BTreeMap<Vec<u8>, i64> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Set(key, value) => {
                    prop_assert_eq!(t.set(&key, value), m.insert(key, value));
                }
                Op::Delete(key) => {
                    prop_assert_eq!(t.delete(&key), m.remove(&key));
                }
                Op::Get(key) => {
                    prop_assert_eq!(t.get(&key).copied(), m.get(&key).copied());
                    prop_assert_eq!(t.has_key(&key), m.contains_key(&key));
                }
                Op::ChangeAll(mode, input) => {
                    t.change_all(mode, &input, |v| v.copied().unwrap_or(0).wrapping_add(1));
                    for key in model_derived(mode, &input) {
                        let slot = m.entry(key.into_bytes()).or_insert(0);
                        *slot = slot.wrapping_add(1);
                    }
                }
            }

            prop_assert_eq!(t.len(), m.len());
        }

        validate_tree(&t);
        let got: Vec<(Vec<u8>, i64)> = t.iter_sorted().map(|(k, v)| (k, *v)).collect();
        let expected: Vec<(Vec<u8>, i64)> = m.iter().map(|(k, v)| (k.clone(), *v)).collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_prefix_search_and_longest_match(
        keys in prop::collection::vec(key_strategy(), 0..=300),
        probes in prop::collection::vec(key_strategy(), 1..=20),
        threshold in 1usize..=8,
    ) {
        let mut t: Trie<i64> = Trie::builder().burst_threshold(threshold).build().unwrap();
        let mut m: BTreeMap<Vec<u8>, i64> = BTreeMap::new();
        for (i, k) in keys.into_iter().enumerate() {
            t.set(&k, i as i64);
            m.insert(k, i as i64);
        }
        validate_tree(&t);

        for probe in probes {
            let got: Vec<(Vec<u8>, i64)> = t
                .search_with_prefix(&probe, SearchOptions::new().sorted(true))
                .into_iter()
                .map(|(k, v)| (k, *v))
                .collect();
            let expected: Vec<(Vec<u8>, i64)> = m
                .range(probe.clone()..)
                .take_while(|(k, _)| k.starts_with(&probe))
                .map(|(k, v)| (k.clone(), *v))
                .collect();
            prop_assert_eq!(&got, &expected);

            let unsorted = t.search_with_prefix(&probe, SearchOptions::new());
            prop_assert_eq!(unsorted.len(), expected.len());

            let got = t.longest_match(&probe).map(|(k, v)| (k.to_vec(), *v));
            let expected = (0..=probe.len())
                .rev()
                .find_map(|n| m.get(&probe[..n]).map(|v| (probe[..n].to_vec(), *v)));
            prop_assert_eq!(got, expected);
        }
    }
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(Vec<T>)) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

fn small_keys() -> Vec<Vec<u8>> {
    vec![
        b"".to_vec(),
        b"a".to_vec(),
        b"b".to_vec(),
        b"aa".to_vec(),
        b"ab".to_vec(),
        b"aab".to_vec(),
    ]
}

#[test]
fn exhaustive_insert_order_small_set() {
    for threshold in [1, 2, 3] {
        for_each_permutation(&small_keys(), |perm| {
            let mut t: Trie<i64> = Trie::builder().burst_threshold(threshold).build().unwrap();
            let mut m: BTreeMap<Vec<u8>, i64> = BTreeMap::new();

            for (i, k) in perm.into_iter().enumerate() {
                let v = i as i64;
                assert_eq!(t.set(&k, v), m.insert(k, v));
            }

            validate_tree(&t);
            let got: Vec<(Vec<u8>, i64)> = t.iter_sorted().map(|(k, v)| (k, *v)).collect();
            let expected: Vec<(Vec<u8>, i64)> = m.iter().map(|(k, v)| (k.clone(), *v)).collect();
            assert_eq!(got, expected);
        });
    }
}

#[test]
fn exhaustive_delete_order_small_set() {
    let keys = small_keys();

    // Insert in a fixed order, then delete in all permutations.
    let mut base_trie: Trie<i64> = Trie::builder().burst_threshold(2).build().unwrap();
    let mut base_map: BTreeMap<Vec<u8>, i64> = BTreeMap::new();
    for (i, k) in keys.iter().enumerate() {
        let v = i as i64;
        assert_eq!(base_trie.set(k, v), base_map.insert(k.clone(), v));
    }

    for_each_permutation(&keys, |perm| {
        let mut t = base_trie.clone();
        let mut m = base_map.clone();

        for k in perm {
            assert_eq!(t.delete(&k), m.remove(&k));
            assert_eq!(t.len(), m.len());
            validate_tree(&t);
            for (rest, v) in &m {
                assert_eq!(t.get(rest), Some(v));
            }
        }
        assert!(t.is_empty());
        assert_eq!(t.iter().count(), 0);
    });
}

fn long_prefix_keys(prefix_len: usize, n: usize) -> Vec<Vec<u8>> {
    (0..n)
        .map(|i| {
            let mut key = vec![b'p'; prefix_len];
            key.extend_from_slice(i.to_string().as_bytes());
            key
        })
        .collect()
}

#[test]
fn long_shared_prefix_matches_model() {
    let prefix_len = 1_000;
    let keys = long_prefix_keys(prefix_len, DEFAULT_BURST_THRESHOLD + 44);

    let mut t: Trie<i64> = Trie::new();
    let mut m: BTreeMap<Vec<u8>, i64> = BTreeMap::new();
    for (i, k) in keys.iter().enumerate() {
        assert_eq!(t.set(k, i as i64), m.insert(k.clone(), i as i64));
    }

    // One container per prefix byte, then one branching on the first digit.
    assert_eq!(validate_tree(&t), Some(prefix_len));
    assert_eq!(t.stats().containers, prefix_len + 1);

    for k in &keys {
        assert_eq!(t.get(k), m.get(k));
    }
    assert_eq!(t.get(&keys[0][..prefix_len]), None);

    for probe in [&keys[0][..prefix_len], &keys[0][..prefix_len / 2], &keys[1][..prefix_len + 1]] {
        let got: Vec<(Vec<u8>, i64)> = t
            .search_with_prefix(probe, SearchOptions::new().sorted(true))
            .into_iter()
            .map(|(k, v)| (k, *v))
            .collect();
        let expected: Vec<(Vec<u8>, i64)> = m
            .range(probe.to_vec()..)
            .take_while(|(k, _)| k.starts_with(probe))
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        assert_eq!(got, expected);
    }

    let mut probe = keys[7].clone();
    probe.extend_from_slice(b"tail");
    assert_eq!(t.longest_match(&probe), Some((&keys[7][..], &7)));
}

#[test]
fn very_long_shared_prefix_clone_clear_drop() {
    let prefix_len = 20_000;
    let keys = long_prefix_keys(prefix_len, 300);

    let mut t: Trie<i64> = Trie::new();
    for (i, k) in keys.iter().enumerate() {
        t.set(k, i as i64);
    }
    assert_eq!(validate_tree(&t), Some(prefix_len));
    assert_eq!(
        t.search_with_prefix(&keys[0][..prefix_len], SearchOptions::new()).len(),
        keys.len()
    );

    let copy = t.clone();
    assert_eq!(validate_tree(&copy), Some(prefix_len));
    assert_eq!(copy.len(), keys.len());
    assert_eq!(copy.get(&keys[299]), Some(&299));

    t.clear();
    assert!(t.is_empty());
    assert_eq!(t.get(&keys[0]), None);
    drop(t);

    assert_eq!(copy.get(&keys[0]), Some(&0));
    drop(copy);
}
