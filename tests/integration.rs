//! End-to-end tests: dataset files on disk through loading, indexing and
//! relation type classification.

use std::path::Path;
use std::sync::Arc;

use kge_dataset::config::DatasetConfig;
use kge_dataset::dataset::{Dataset, DatasetParts};
use kge_dataset::error::DatasetError;
use kge_dataset::index::{prepare_index, Direction};
use kge_dataset::ingest::SplitData;
use kge_dataset::relation_types::RelationType;
use kge_dataset::triples::{Split, TripleArray};

fn write(dir: &Path, file: &str, content: &str) {
    std::fs::write(dir.join(file), content).unwrap();
}

/// A small dataset with one relation of each type.
///
/// - r0 "capital_of": 1-1
/// - r1 "has_child": 1-N (entity 0 has children 1, 2, 3)
/// - r2 "born_in": N-1 (entities 1, 2, 3 born in 4)
/// - r3 "sibling_of": N-N (entities 1..=3 all siblings)
/// - r4 never appears in train
fn write_toy_dataset(dir: &Path) {
    write(
        dir,
        "entity_map.del",
        "0\t/m/parent\n1\t/m/a\n2\t/m/b\n3\t/m/c\n4\t/m/city\n6\t/m/country\n",
    );
    write(
        dir,
        "relation_map.del",
        "0\tcapital_of\n1\thas_child\n2\tborn_in\n3\tsibling_of\n4\tunused\n",
    );
    write(
        dir,
        "train.del",
        "4\t0\t6\n\
         0\t1\t1\n0\t1\t2\n0\t1\t3\n\
         1\t2\t4\n2\t2\t4\n3\t2\t4\n\
         1\t3\t2\n1\t3\t3\n2\t3\t1\n2\t3\t3\n3\t3\t1\n3\t3\t2\n",
    );
    write(dir, "valid.del", "0\t1\t3\tsource:wiki\n");
    write(dir, "test.del", "2\t2\t4\n1\t2\t4\n");
}

fn toy_config(dir: &Path) -> DatasetConfig {
    DatasetConfig::with_name("toy").in_dir(dir)
}

#[test]
fn load_from_disk() {
    let dir = tempfile::TempDir::new().unwrap();
    write_toy_dataset(dir.path());

    let dataset = Dataset::load(&toy_config(dir.path())).unwrap();
    assert_eq!(dataset.name(), "toy");
    assert_eq!(dataset.num_entities(), 7);
    assert_eq!(dataset.num_relations(), 5);
    assert!(dataset.entities()[5].is_empty());
    assert_eq!(dataset.entities()[6], vec!["/m/country".to_string()]);

    assert_eq!(dataset.split(Split::Train).len(), 13);
    assert_eq!(dataset.split(Split::Valid).len(), 1);
    assert_eq!(dataset.split_meta(Split::Valid)[0], vec!["source:wiki".to_string()]);
    assert_eq!(dataset.split(Split::Test).rows(), &[[2, 2, 4], [1, 2, 4]]);
}

#[test]
fn relation_types_from_disk() {
    let dir = tempfile::TempDir::new().unwrap();
    write_toy_dataset(dir.path());
    let dataset = Dataset::load(&toy_config(dir.path())).unwrap();

    assert_eq!(dataset.relation_type(0), Some(RelationType::OneToOne));
    assert_eq!(dataset.relation_type(1), Some(RelationType::OneToMany));
    assert_eq!(dataset.relation_type(2), Some(RelationType::ManyToOne));
    assert_eq!(dataset.relation_type(3), Some(RelationType::ManyToMany));
    assert_eq!(dataset.relation_type(4), Some(RelationType::OneToOne));
    assert_eq!(dataset.relation_type(5), None);

    let per_type = dataset.relations_per_type();
    let ids = |t: RelationType| per_type[&t].iter().copied().collect::<Vec<_>>();
    assert_eq!(ids(RelationType::OneToOne), vec![0, 4]);
    assert_eq!(ids(RelationType::OneToMany), vec![1]);
    assert_eq!(ids(RelationType::ManyToOne), vec![2]);
    assert_eq!(ids(RelationType::ManyToMany), vec![3]);
}

#[test]
fn config_file_drives_loading() {
    let dir = tempfile::TempDir::new().unwrap();
    write_toy_dataset(dir.path());
    let config_path = dir.path().join("dataset.toml");
    let toml = format!(
        "[dataset]\nname = \"toy\"\nbase_dir = {:?}\n",
        dir.path().display().to_string()
    );
    std::fs::write(&config_path, toml).unwrap();

    let config = DatasetConfig::load(&config_path).unwrap();
    let dataset = Dataset::load(&config).unwrap();
    assert_eq!(dataset.num_relations(), 5);
}

#[test]
fn out_of_range_id_fails_loading() {
    let dir = tempfile::TempDir::new().unwrap();
    write_toy_dataset(dir.path());
    write(dir.path(), "test.del", "2\t2\t4\n1\t2\t7\n");

    let err = Dataset::load(&toy_config(dir.path())).unwrap_err();
    match err {
        DatasetError::IdentifierOutOfRange {
            split,
            row,
            column,
            id,
            limit,
        } => {
            assert_eq!((split.as_str(), row, column, id, limit), ("test", 1, "object", 7, 7));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_split_file() {
    let dir = tempfile::TempDir::new().unwrap();
    write_toy_dataset(dir.path());
    std::fs::remove_file(dir.path().join("valid.del")).unwrap();

    let err = Dataset::load(&toy_config(dir.path())).unwrap_err();
    assert!(matches!(err, DatasetError::Io { .. }));
}

fn scenario() -> Dataset {
    let train: TripleArray = TripleArray::from(vec![[0, 0, 1], [0, 0, 2], [1, 0, 2]]);
    Dataset::new(DatasetParts {
        name: "scenario".into(),
        entities: vec![Vec::new(); 3],
        relations: vec![Vec::new(); 1],
        train: SplitData {
            meta: vec![Vec::new(); train.len()],
            triples: train,
        },
        ..Default::default()
    })
    .unwrap()
}

#[test]
fn end_to_end_scenario() {
    let dataset = scenario();

    let sp = dataset.index_1_to_n(Split::Train, Direction::Sp);
    assert_eq!(sp.len(), 2);
    assert_eq!(sp.get(&[0, 0]), Some(&[1, 2][..]));
    assert_eq!(sp.get(&[1, 0]), Some(&[2][..]));

    let po = dataset.index_1_to_n(Split::Train, Direction::Po);
    assert_eq!(po.len(), 2);
    assert_eq!(po.get(&[0, 1]), Some(&[0][..]));
    assert_eq!(po.get(&[0, 2]), Some(&[0, 1][..]));

    let stats = dataset.relation_types().stats(0).unwrap();
    assert_eq!((stats.out_total, stats.out_groups), (3, 2));
    assert_eq!((stats.in_total, stats.in_groups), (3, 2));
    assert_eq!(dataset.relation_type(0), Some(RelationType::OneToOne));
    assert_eq!(dataset.relation_type(0).unwrap().to_string(), "1-1");
}

#[test]
fn repeated_index_requests_do_not_rebuild() {
    let dataset = scenario();
    let builds = dataset.index_builds();

    let first = dataset.index_1_to_n_named("train", "sp").unwrap();
    let second = dataset.index_1_to_n_named("train", "sp").unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(dataset.index_builds(), builds);

    let valid_first = dataset.index_1_to_n(Split::Valid, Direction::Po);
    let valid_second = dataset.index_1_to_n(Split::Valid, Direction::Po);
    assert_eq!(valid_first.keys(), valid_second.keys());
    assert_eq!(dataset.index_builds(), builds + 1);
}

#[test]
fn invalid_arguments_create_no_cache_entry() {
    let dataset = scenario();
    let before = dataset.cached_indexes();

    for (split, direction) in [("bogus", "sp"), ("train", "xy"), ("Test", "po"), ("valid", "")] {
        let err = dataset.index_1_to_n_named(split, direction).unwrap_err();
        assert!(matches!(err, DatasetError::InvalidArgument { .. }));
    }
    assert_eq!(dataset.cached_indexes(), before);
}

#[test]
fn compact_view_of_cached_index() {
    let dataset = scenario();
    let index = dataset.index_1_to_n(Split::Train, Direction::Po);
    let compact = prepare_index(&index);

    assert_eq!(compact.keys(), &[[0, 1], [0, 2]]);
    assert_eq!(compact.values(), &[0, 0, 1]);
    assert_eq!(compact.offsets(), &[0, 1, 3]);
    assert_eq!(dataset.compact_index(Split::Train, Direction::Po), compact);
}

#[test]
fn concurrent_readers_build_once() {
    let dataset = scenario();
    let builds = dataset.index_builds();

    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                let index = dataset.index_1_to_n(Split::Test, Direction::Sp);
                assert!(index.is_empty());
            });
        }
    });

    assert_eq!(dataset.index_builds(), builds + 1);
}
