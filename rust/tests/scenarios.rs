use bytetree::{BTreeIndex, Item, Node};
use paste::paste;

fn collect_keys(tree: &BTreeIndex) -> Vec<Vec<u8>> {
    tree.slice().into_iter().map(|(k, _)| k.to_vec()).collect()
}

fn assert_strictly_ascending(tree: &BTreeIndex) {
    let keys = collect_keys(tree);
    for pair in keys.windows(2) {
        assert!(pair[0] < pair[1], "{:?} is not below {:?}", pair[0], pair[1]);
    }
}

fn root(tree: &BTreeIndex) -> &Node {
    tree.node(tree.root_id()).expect("root is allocated")
}

#[test]
fn test_five_letters_split_root() {
    let mut tree = BTreeIndex::new();
    for (i, key) in ["a", "b", "c", "d", "e"].iter().enumerate() {
        tree.insert(*key, vec![i as u8]);
        assert_eq!(tree.is_leaf_root(), i < 4);
    }

    let root = root(&tree);
    assert!(!root.is_leaf());
    assert_eq!(root.children().len(), 2);
    for &child in root.children() {
        let child = tree.node(child).expect("child is allocated");
        assert!(child.is_leaf());
        assert_eq!(child.parent(), tree.root_id());
    }
    assert_eq!(tree.leaf_sizes(), vec![2, 3]);
    assert_eq!(
        collect_keys(&tree),
        vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec(), b"d".to_vec(), b"e".to_vec()]
    );
}

#[test]
fn test_ten_keys_delete_five() {
    let mut tree = BTreeIndex::new();
    for i in 1u32..=10 {
        tree.insert(i.to_be_bytes(), i.to_be_bytes());
    }

    let leaf = tree.descend(&5u32.to_be_bytes()).leaf;
    let before = tree.node(leaf).expect("leaf is allocated").len();
    tree.delete(&5u32.to_be_bytes());

    if let Some(node) = tree.node(leaf) {
        assert_eq!(node.len(), before - 1);
    }
    assert_eq!(tree.len(), 9);
    for i in (1u32..=10).filter(|&i| i != 5) {
        assert!(tree.descend(&i.to_be_bytes()).exists, "key {} not reachable", i);
    }
    assert!(tree.check_invariants());
}

#[test]
fn test_upsert_keeps_single_item() {
    let mut tree = BTreeIndex::new();
    for i in 0u8..20 {
        tree.insert(vec![i], b"v1".as_slice());
    }
    let count = tree.len();

    tree.insert(vec![7u8], b"v2".as_slice());
    assert_eq!(tree.len(), count);

    let matching: Vec<_> = tree
        .slice()
        .into_iter()
        .filter(|(k, _)| *k == [7u8].as_slice())
        .collect();
    assert_eq!(matching, vec![(&[7u8][..], &b"v2"[..])]);
}

#[test]
fn test_delete_twice_matches_delete_once() {
    let mut once = BTreeIndex::new();
    let mut twice = BTreeIndex::new();
    for i in 0u8..30 {
        once.insert(vec![i], vec![i]);
        twice.insert(vec![i], vec![i]);
    }

    once.delete(&[12]);
    twice.delete(&[12]);
    twice.delete(&[12]);

    assert_eq!(once.slice(), twice.slice());
    assert_eq!(once.leaf_sizes(), twice.leaf_sizes());
    assert_eq!(once.format_tree(), twice.format_tree());
}

#[test]
fn test_empty_key_and_values_are_accepted() {
    let mut tree = BTreeIndex::new();
    tree.insert(Vec::<u8>::new(), Vec::<u8>::new());
    tree.insert(vec![0u8], vec![1u8]);
    assert_eq!(tree.len(), 2);
    assert_eq!(collect_keys(&tree)[0], Vec::<u8>::new());

    tree.delete(&[]);
    assert_eq!(tree.len(), 1);
    assert!(tree.check_invariants());
}

#[test]
fn test_item_accessors() {
    let item = Item::new("key", "value");
    assert_eq!(item.key(), b"key");
    assert_eq!(item.value(), b"value");
}

// Round trips through several insertion and deletion orders. Every order
// must end with an empty root leaf.
macro_rules! round_trip_test {
    ($name:ident, $count:expr, $insert_order:expr, $delete_order:expr) => {
        paste! {
            #[test]
            fn [<test_round_trip_ $name>]() {
                let mut tree = BTreeIndex::new();
                let insert_order: Vec<u32> = $insert_order;
                let delete_order: Vec<u32> = $delete_order;

                for &i in &insert_order {
                    tree.insert(i.to_be_bytes(), i.to_le_bytes());
                    assert!(tree.check_invariants(), "broken after inserting {}", i);
                }
                assert_eq!(tree.len(), $count);
                assert_strictly_ascending(&tree);

                for &i in &delete_order {
                    tree.delete(&i.to_be_bytes());
                    assert!(tree.check_invariants(), "broken after deleting {}", i);
                }
                assert!(tree.is_empty());
                assert!(tree.is_leaf_root());
                assert_eq!(tree.allocated_node_count(), 1);
            }
        }
    };
}

round_trip_test!(ascending, 300, (0..300).collect(), (0..300).collect());
round_trip_test!(descending, 300, (0..300).rev().collect(), (0..300).rev().collect());
round_trip_test!(
    ascending_then_descending,
    300,
    (0..300).collect(),
    (0..300).rev().collect()
);
round_trip_test!(
    interleaved,
    256,
    (0..256).map(|i: u32| (i * 37) % 256).collect(),
    (0..256).map(|i: u32| (i * 91) % 256).collect()
);
round_trip_test!(
    outside_in,
    200,
    (0..100).flat_map(|i: u32| [i, 199 - i]).collect(),
    (0..100).flat_map(|i: u32| [99 - i, 100 + i]).collect()
);
