use turbo_core::*;

fn sorted<'a, T: Ord + Clone + 'a>(values: impl Iterator<Item = &'a T>) -> Vec<T> {
    let mut values: Vec<T> = values.cloned().collect();
    values.sort();
    values
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Person {
    id: u32,
    surname: &'static str,
}

fn person(id: u32, surname: &'static str) -> Person {
    Person { id, surname }
}

#[test]
fn test_lookup_by_either_part() {
    let collection: MultiKeyCollection<u32, &str, &str> =
        MultiKeyCollection::try_from_iter([((1, "a"), "x"), ((1, "b"), "y"), ((2, "a"), "z")])
            .unwrap();

    assert_eq!(sorted(collection.get_values_by_id(&1).unwrap()), ["x", "y"]);
    assert_eq!(sorted(collection.get_values_by_name("a").unwrap()), ["x", "z"]);
}

#[test]
fn test_empty_collection_has_no_parts() {
    let collection: MultiKeyCollection<i64, String, String> = MultiKeyCollection::new();

    assert!(matches!(
        collection.get_values_by_id(&0),
        Err(CollectionError::KeyNotFound { index: Some(IndexKind::Id), .. })
    ));
    assert!(matches!(
        collection.get_values_by_name("anything"),
        Err(CollectionError::KeyNotFound { index: Some(IndexKind::Name), .. })
    ));
    assert_eq!(collection.count(), 0);
}

#[test]
fn test_overwrite_keeps_single_index_entry() {
    let mut collection: MultiKeyCollection<u32, u32, u32> = MultiKeyCollection::new();
    collection.add((0, 0), 1).unwrap();
    collection.set_by_key((0, 0), 2);

    assert_eq!(collection.count(), 1);
    assert_eq!(collection.get(&CompositeKey::new(0, 0)), Ok(&2));
    assert_eq!(collection.get_values_by_id(&0).unwrap().len(), 1);
}

#[test]
fn test_remove_last_entry_for_name() {
    let mut collection: MultiKeyCollection<u32, String, u32> = MultiKeyCollection::new();
    collection.add((0, "0".to_string()), 1).unwrap();
    collection.add((0, "1".to_string()), 2).unwrap();

    assert!(collection.remove(&CompositeKey::new(0, "0".to_string())));

    assert_eq!(sorted(collection.get_values_by_id(&0).unwrap()), [2]);
    assert!(matches!(
        collection.get_values_by_name("0"),
        Err(CollectionError::KeyNotFound { .. })
    ));
}

#[test]
fn test_struct_id_part() {
    let collection: MultiKeyCollection<Person, &str, String> = MultiKeyCollection::try_from_iter(
        [
            ((person(1, "Nekrasov"), "Pavel"), "Nekrasov Pavel"),
            ((person(2, "Denisov"), "Makar"), "Denisov Makar"),
            ((person(3, "Avdeeva"), "Stefania"), "Avdeeva Stefania"),
            ((person(4, "Smirnova"), "Sofia"), "Smirnova Sofia"),
            ((person(5, "Kiseleva"), "Arina"), "Kiseleva Arina"),
            ((person(5, "Kiseleva"), "Stefania"), "Kiseleva Stefania"),
            ((person(2, "Denisov"), "Denis"), "Denisov Denis"),
            ((person(4, "Smirnova"), "Arina"), "Smirnova Arina"),
            ((person(2, "Denisov"), "Timofey"), "Denisov Timofey"),
            ((person(2, "Denisov"), "Nikita"), "Denisov Nikita"),
        ]
        .map(|(key, value)| (key, value.to_string())),
    )
    .unwrap();

    assert_eq!(collection.get_values_by_name("Pavel").unwrap().count(), 1);
    assert_eq!(collection.get_values_by_name("Stefania").unwrap().count(), 2);
    assert_eq!(collection.get_values_by_id(&person(1, "Nekrasov")).unwrap().count(), 1);
    assert_eq!(collection.get_values_by_id(&person(2, "Denisov")).unwrap().count(), 4);

    // Same surname, different id: a distinct part value
    assert!(collection.get_values_by_id(&person(0, "Kiseleva")).is_err());
}

#[test]
fn test_duplicate_in_bulk_construction() {
    let pairs: Vec<(CompositeKey<u32, char>, String)> = vec![
        (CompositeKey::new(0, 'a'), "first".to_string()),
        (CompositeKey::new(0, 'b'), "second".to_string()),
        (CompositeKey::new(1, 'b'), "third".to_string()),
        (CompositeKey::new(42, 'z'), "42".to_string()),
    ];
    let mut collection = MultiKeyCollection::<u32, char, String>::try_from(pairs).unwrap();
    assert_eq!(collection.count(), 4);

    let err = collection.add((0, 'a'), "again".to_string()).unwrap_err();
    assert!(matches!(err, CollectionError::DuplicateKey { .. }));
    assert_eq!(collection.count(), 4);
    assert_eq!(collection[&CompositeKey::new(0, 'a')], "first");

    let repeated: [(CompositeKey<u32, char>, i32); 2] =
        [(CompositeKey::new(7, 'x'), 1), (CompositeKey::new(7, 'x'), 2)];
    assert!(matches!(
        MultiKeyCollection::<u32, char, i32>::try_from(repeated),
        Err(CollectionError::DuplicateKey { .. })
    ));
}

#[test]
fn test_add_then_lookup_by_parts() {
    let collection: MultiKeyCollection<i32, &str, i32> = MultiKeyCollection::try_from_iter([
        ((0, "0"), 1),
        ((0, "1"), 2),
        ((1, "1"), 3),
        ((2, "2"), 4),
        ((3, "1"), 5),
        ((3, "4"), 6),
        ((42, "0"), 42),
    ])
    .unwrap();

    assert_eq!(sorted(collection.get_values_by_id(&0).unwrap()), [1, 2]);
    assert_eq!(sorted(collection.get_values_by_id(&1).unwrap()), [3]);
    assert_eq!(sorted(collection.get_values_by_id(&3).unwrap()), [5, 6]);
    assert!(collection.get_values_by_id(&-1).is_err());

    assert_eq!(sorted(collection.get_values_by_name("0").unwrap()), [1, 42]);
    assert_eq!(sorted(collection.get_values_by_name("1").unwrap()), [2, 3, 5]);
    assert_eq!(sorted(collection.get_values_by_name("2").unwrap()), [4]);
    assert!(collection.get_values_by_name("key").is_err());
}

#[test]
fn test_indexer_style_population() {
    let mut collection: MultiKeyCollection<u32, u32, u32> = MultiKeyCollection::new();
    for (id, name, value) in [(0, 0, 1), (0, 1, 2), (1, 1, 3), (1, 2, 4), (2, 2, 5), (41, 43, 42)]
    {
        collection.set_by_key((id, name), value);
    }

    assert_eq!(collection.count(), 6);
    assert_eq!(collection[&CompositeKey::new(41, 43)], 42);

    assert_eq!(collection.get_values_by_id(&0).unwrap().len(), 2);
    assert_eq!(collection.get_values_by_id(&1).unwrap().len(), 2);
    assert_eq!(collection.get_values_by_id(&2).unwrap().len(), 1);
    assert_eq!(collection.get_values_by_name(&0).unwrap().len(), 1);
    assert_eq!(collection.get_values_by_name(&1).unwrap().len(), 2);
    assert_eq!(collection.get_values_by_name(&2).unwrap().len(), 2);

    assert_eq!(sorted(collection.get_values_by_id(&41).unwrap()), [42]);
    assert_eq!(sorted(collection.get_values_by_name(&43).unwrap()), [42]);
}

#[test]
fn test_indexer_replace() {
    let mut collection: MultiKeyCollection<u32, u32, u32> = MultiKeyCollection::new();
    collection.set_by_key((0, 0), 1);
    collection.set_by_key((0, 1), 2);
    collection.set_by_key((0, 0), 2);

    assert_eq!(collection[&CompositeKey::new(0, 0)], 2);
    assert_eq!(collection.count(), 2);
    assert_eq!(collection.get_values_by_id(&0).unwrap().len(), 2);
    assert_eq!(collection.get_values_by_name(&0).unwrap().len(), 1);
    assert_eq!(collection.get_values_by_name(&1).unwrap().len(), 1);
}

#[test]
fn test_remove_keeps_other_entries_indexed() {
    let mut collection: MultiKeyCollection<u32, &str, u32> =
        MultiKeyCollection::try_from_iter([((0, "0"), 1), ((0, "1"), 54), ((42, "0"), 42)])
            .unwrap();
    assert_eq!(collection.count(), 3);

    assert!(collection.remove(&CompositeKey::new(0, "0")));

    assert_eq!(sorted(collection.get_values_by_id(&0).unwrap()), [54]);
    assert_eq!(sorted(collection.get_values_by_name("0").unwrap()), [42]);
    assert!(collection.stats().is_coherent());
}

#[test]
fn test_config_driven_collection() {
    let config = CollectionConfig::from_toml_str("initial_capacity = 32\nbucket_capacity = 2")
        .unwrap()
        .apply_overrides(|_| None)
        .unwrap();
    let mut collection: MultiKeyCollection<u64, u64, u64> = MultiKeyCollection::with_config(&config);

    for id in 0..32 {
        collection.add((id / 4, id % 4), id).unwrap();
    }

    let stats = collection.stats();
    assert_eq!(stats.entries, 32);
    assert_eq!(stats.by_id.distinct_parts, 8);
    assert_eq!(stats.by_name.distinct_parts, 4);
    assert_eq!(stats.by_name.largest_bucket, 8);
    assert!(stats.is_coherent());
}
