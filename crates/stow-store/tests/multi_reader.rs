use std::sync::Arc;

use proptest::prelude::*;
use stow_crypto::ContentHasher;
use stow_store::{read_all, Context, MemoryStore, MultiStore, Store, StoreError};
use stow_types::{media_type, Descriptor};

const CONTENT_A: &[u8] = b"Hello World!";
const CONTENT_B: &[u8] = b"So long and thanks for all the fish!";

fn descriptor(content: &[u8]) -> Descriptor {
    Descriptor::new(
        media_type::IMAGE_CONFIG,
        ContentHasher::SHA256.digest(content),
        content.len() as u64,
    )
}

fn lookup(store: &dyn Store, desc: &Descriptor) -> Vec<u8> {
    let reader = match store.open(&Context::background(), desc) {
        Ok(reader) => reader,
        Err(e) => panic!("failed to get a reader for {}: {e}", desc.digest),
    };
    assert_eq!(reader.size(), desc.size);
    read_all(reader.as_ref()).unwrap()
}

/// Two memory stores holding disjoint content.
fn disjoint_stores() -> (Arc<MemoryStore>, Arc<MemoryStore>) {
    let mem1 = Arc::new(MemoryStore::new().with_label("mem1"));
    let mem2 = Arc::new(MemoryStore::new().with_label("mem2"));
    mem1.insert("a", media_type::IMAGE_CONFIG, CONTENT_A);
    mem2.insert("b", media_type::IMAGE_CONFIG, CONTENT_B);
    (mem1, mem2)
}

#[test]
fn resolves_each_descriptor_from_its_store() {
    let (mem1, mem2) = disjoint_stores();
    let mut multi = MultiStore::new();
    multi.register([mem1 as Arc<dyn Store>, mem2 as Arc<dyn Store>]);

    let desc_a = descriptor(CONTENT_A);
    let desc_b = descriptor(CONTENT_B);

    let output_a = lookup(&multi, &desc_a);
    assert_eq!(output_a, CONTENT_A);
    assert_eq!(output_a.len() as u64, desc_a.size);

    let output_b = lookup(&multi, &desc_b);
    assert_eq!(output_b, CONTENT_B);
    assert_eq!(output_b.len() as u64, desc_b.size);
}

#[test]
fn inserted_descriptors_match_computed_ones() {
    let store = MemoryStore::new();
    let inserted = store.insert("a", media_type::IMAGE_CONFIG, CONTENT_A);
    let computed = descriptor(CONTENT_A);
    assert!(inserted.same_content(&computed));
    assert_eq!(inserted.size, computed.size);
}

#[test]
fn registration_order_does_not_change_results_for_disjoint_stores() {
    let (mem1, mem2) = disjoint_stores();
    let mut multi = MultiStore::new();
    multi.register([mem2 as Arc<dyn Store>, mem1 as Arc<dyn Store>]);

    assert_eq!(lookup(&multi, &descriptor(CONTENT_A)), CONTENT_A);
    assert_eq!(lookup(&multi, &descriptor(CONTENT_B)), CONTENT_B);
}

#[test]
fn register_appends_after_existing_stores() {
    let (mem1, mem2) = disjoint_stores();
    let mut multi = MultiStore::new();
    multi.register([mem1 as Arc<dyn Store>]);
    multi.register([mem2 as Arc<dyn Store>]);
    multi.register(Vec::<Arc<dyn Store>>::new());
    assert_eq!(multi.store_names(), vec!["mem1", "mem2"]);
}

#[test]
fn total_miss_is_aggregate_not_found() {
    let (mem1, mem2) = disjoint_stores();
    let mut multi = MultiStore::new();
    multi.register([mem1 as Arc<dyn Store>, mem2 as Arc<dyn Store>]);

    let desc_x = descriptor(b"content nobody has");
    let err = multi.open(&Context::background(), &desc_x).err().unwrap();
    assert!(err.is_not_found());
    let StoreError::Aggregate(agg) = err else {
        panic!("expected aggregate error");
    };
    assert_eq!(agg.digest(), &desc_x.digest);
    let stores: Vec<_> = agg.failures().iter().map(|f| f.store.as_str()).collect();
    assert_eq!(stores, ["mem1", "mem2"]);
    assert!(agg
        .failures()
        .iter()
        .all(|f| matches!(f.error, StoreError::NotFound(_))));
}

#[test]
fn empty_composer_fails_every_lookup() {
    let multi = MultiStore::new();
    for content in [CONTENT_A, CONTENT_B] {
        let err = multi.open(&Context::background(), &descriptor(content)).err().unwrap();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("not found in any of 0 store(s)"));
    }
}

#[test]
fn composers_nest() {
    let (mem1, mem2) = disjoint_stores();
    let mut inner = MultiStore::new();
    inner.add_store(mem2);
    let mut outer = MultiStore::new();
    outer.add_store(mem1).add_store(Arc::new(inner));

    assert_eq!(lookup(&outer, &descriptor(CONTENT_B)), CONTENT_B);
    let err = outer
        .open(&Context::background(), &descriptor(b"absent"))
        .err()
        .unwrap();
    assert!(err.is_not_found());
}

proptest! {
    #[test]
    fn memory_store_returns_inserted_bytes(content in proptest::collection::vec(any::<u8>(), 0..4096)) {
        let store = MemoryStore::new();
        let desc = store.insert("p", "", content.clone());
        prop_assert_eq!(desc.size, content.len() as u64);
        prop_assert_eq!(lookup(&store, &desc), content);
    }

    #[test]
    fn digests_are_deterministic_across_names(content in proptest::collection::vec(any::<u8>(), 0..256), name in "[a-z]{1,8}") {
        let store = MemoryStore::new();
        let first = store.insert(name.clone(), "", content.clone());
        let second = store.insert(format!("{name}-again"), "", content.clone());
        prop_assert_eq!(&first.digest, &second.digest);
        prop_assert_eq!(first.size, second.size);
        prop_assert_eq!(store.len(), 1);
    }
}
