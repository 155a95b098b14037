//! Integration tests for workspace loading and scoring.
//!
//! Each test writes a real workspace directory (meta.txt, binary vector
//! file, train.txt) into a temp dir and drives the public API end to end.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::thread;

use tempfile::TempDir;

use holix::scoring::{circular_correlation, dot, sigmoid};
use holix::{EmbeddingClient, EmbeddingStore, Error, HolE, ModelKind, TransE};

/// Write a workspace: `meta.txt`, a big-endian vector file, `train.txt`.
fn write_workspace(
    dir: &Path,
    entities: &[Vec<f64>],
    relations: &[Vec<f64>],
    facts: &[(usize, usize, usize)],
    vector_file: &str,
) {
    let dim = entities.first().map_or(0, Vec::len);

    fs::write(
        dir.join("meta.txt"),
        format!("{} {} 0\n", entities.len(), relations.len()),
    )
    .unwrap();

    let mut vectors = fs::File::create(dir.join(vector_file)).unwrap();
    vectors.write_all(&(dim as f64).to_be_bytes()).unwrap();
    for row in entities.iter().chain(relations) {
        for value in row {
            vectors.write_all(&value.to_be_bytes()).unwrap();
        }
    }

    let mut train = String::new();
    for (s, p, o) in facts {
        train.push_str(&format!("{s} {p} {o}\n"));
    }
    fs::write(dir.join("train.txt"), train).unwrap();
}

fn sample_workspace(vector_file: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    write_workspace(
        dir.path(),
        &[
            vec![1.0, 2.0, 3.0, 4.0],
            vec![4.0, 3.0, 2.0, 1.0],
            vec![-0.5, 0.25, 0.0, 0.75],
        ],
        &[vec![1.0, 1.0, 1.0, 1.0], vec![0.1, -0.2, 0.3, -0.4]],
        &[(0, 0, 1), (1, 1, 2)],
        vector_file,
    );
    dir
}

#[test]
fn test_load_hole_workspace() {
    let dir = sample_workspace("hole");
    let model = HolE::load(dir.path()).unwrap();

    assert_eq!(model.num_entities(), 3);
    assert_eq!(model.num_relations(), 2);
    assert_eq!(model.embedding_dim(), 4);
    assert_eq!(model.store().meta().n_classes, 0);

    let score = model.score(0, 1, 2).unwrap();
    assert!(score > 0.0 && score < 1.0);
}

#[test]
fn test_end_to_end_reference_score() {
    let dir = sample_workspace("hole");
    let model = HolE::load(dir.path()).unwrap();

    // s = [1,2,3,4], o = [4,3,2,1]: corr = [20,26,28,26]; r = ones
    // dots to 100.
    let expected = sigmoid(100.0);
    let score = model.score(0, 0, 1).unwrap();
    assert!((score - expected).abs() < 1e-9);

    let direct = circular_correlation(&[1.0, 2.0, 3.0, 4.0], &[4.0, 3.0, 2.0, 1.0]);
    assert!((dot(&direct, &[1.0; 4]) - 100.0).abs() < 1e-9);
}

#[test]
fn test_fact_index_round_trip_through_train_file() {
    let dir = sample_workspace("hole");
    let model = HolE::load(dir.path()).unwrap();

    assert!(model.known_fact(0, 0, 1).unwrap());
    assert!(model.known_fact(1, 1, 2).unwrap());
    assert!(!model.known_fact(1, 0, 0).unwrap());
    assert!(!model.known_fact(0, 1, 1).unwrap());

    assert_eq!(model.fact_index(0).unwrap().len(), 1);
    assert!(model.fact_index(5).is_err());
}

#[test]
fn test_cached_and_uncached_scores_match() {
    let dir = sample_workspace("hole");
    let cached = HolE::load_with_cache(dir.path(), true).unwrap();
    let uncached = HolE::load_with_cache(dir.path(), false).unwrap();
    assert!(cached.cache_enabled());
    assert!(!uncached.cache_enabled());

    for s in 0..3 {
        for p in 0..2 {
            for o in 0..3 {
                let a = cached.score(s, p, o).unwrap();
                let b = uncached.score(s, p, o).unwrap();
                assert!((a - b).abs() < 1e-12, "divergence at ({s},{p},{o})");
            }
        }
    }
}

#[test]
fn test_cache_auto_enable_boundary() {
    // Entity counts straddling the threshold, tiny dimension to keep the
    // files small.
    for (n_entities, expect_cached) in [(15_000, true), (15_001, false)] {
        let dir = TempDir::new().unwrap();
        let entities: Vec<Vec<f64>> = (0..n_entities)
            .map(|i| vec![i as f64 * 1e-4, 1.0])
            .collect();
        write_workspace(dir.path(), &entities, &[vec![0.1, 0.2]], &[], "hole");

        let model = HolE::load(dir.path()).unwrap();
        assert_eq!(
            model.cache_enabled(),
            expect_cached,
            "n_entities = {n_entities}"
        );
    }
}

#[test]
fn test_concurrent_scoring_is_consistent() {
    let dir = sample_workspace("hole");
    let model = Arc::new(HolE::load(dir.path()).unwrap());
    let baseline = model.score(0, 0, 1).unwrap();

    thread::scope(|scope| {
        for _ in 0..8 {
            let model = Arc::clone(&model);
            scope.spawn(move || {
                for _ in 0..50 {
                    let score = model.score(0, 0, 1).unwrap();
                    assert!((score - baseline).abs() < 1e-12);
                }
            });
        }
    });

    // The (0, 1) pair was computed into exactly one cache cell.
    assert_eq!(model.cached_pairs(), 1);
}

#[test]
fn test_transe_workspace() {
    let dir = TempDir::new().unwrap();
    write_workspace(
        dir.path(),
        &[vec![0.0, 0.0], vec![1.0, 0.0], vec![3.0, -4.0]],
        &[vec![1.0, 0.0]],
        &[(0, 0, 1)],
        "transe",
    );

    let model = TransE::load(dir.path()).unwrap();
    // h + r = t exactly: distance 0, sigmoid(0) = 0.5.
    assert!((model.score(0, 0, 1).unwrap() - 0.5).abs() < 1e-12);
    // ‖[1,0] + [0,0]... distance to [3,-4] from [0,0]+[1,0] is sqrt(4+16).
    let far = model.score(0, 0, 2).unwrap();
    assert!((far - sigmoid(-20f64.sqrt())).abs() < 1e-12);
    assert!(model.known_fact(0, 0, 1).unwrap());
}

#[test]
fn test_model_kind_factory() {
    let dir = sample_workspace("hole");
    let model: Box<dyn EmbeddingClient> = "hole".parse::<ModelKind>().unwrap().load(dir.path()).unwrap();
    assert_eq!(model.name(), "HolE");
    assert!(model.score(0, 0, 1).unwrap() > 0.0);

    let dir = TempDir::new().unwrap();
    write_workspace(
        dir.path(),
        &[vec![0.0], vec![1.0]],
        &[vec![1.0]],
        &[],
        "transe",
    );
    let model = ModelKind::TransE.load(dir.path()).unwrap();
    assert_eq!(model.name(), "TransE");
}

#[test]
fn test_missing_files_are_fatal() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(HolE::load(dir.path()), Err(Error::Io(_))));

    // meta.txt present, vector file absent.
    fs::write(dir.path().join("meta.txt"), "2 1 0").unwrap();
    assert!(HolE::load(dir.path()).is_err());
}

#[test]
fn test_truncated_vector_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    write_workspace(
        dir.path(),
        &[vec![1.0, 2.0], vec![3.0, 4.0]],
        &[vec![0.5, 0.5]],
        &[],
        "hole",
    );

    // Drop the last 8 bytes (one double).
    let path = dir.path().join("hole");
    let bytes = fs::read(&path).unwrap();
    fs::write(&path, &bytes[..bytes.len() - 8]).unwrap();

    assert!(matches!(HolE::load(dir.path()), Err(Error::Malformed(_))));
}

#[test]
fn test_malformed_meta_is_fatal() {
    let dir = sample_workspace("hole");
    fs::write(dir.path().join("meta.txt"), "3 two 0").unwrap();
    assert!(matches!(HolE::load(dir.path()), Err(Error::Malformed(_))));

    fs::write(dir.path().join("meta.txt"), "3").unwrap();
    assert!(matches!(HolE::load(dir.path()), Err(Error::Malformed(_))));
}

#[test]
fn test_out_of_range_predicate_in_train_file_is_fatal() {
    let dir = sample_workspace("hole");
    fs::write(dir.path().join("train.txt"), "0 9 1\n").unwrap();
    assert!(matches!(HolE::load(dir.path()), Err(Error::Malformed(_))));
}

#[test]
fn test_dimension_tolerates_float_noise() {
    // Exporters sometimes write the dimension with rounding error; the
    // loader rounds it.
    let dir = TempDir::new().unwrap();
    write_workspace(dir.path(), &[vec![1.0, 2.0]], &[vec![0.5, 0.5]], &[], "hole");

    let path = dir.path().join("hole");
    let mut bytes = fs::read(&path).unwrap();
    bytes[..8].copy_from_slice(&(2.0f64 + 1e-9).to_be_bytes());
    fs::write(&path, bytes).unwrap();

    let store = EmbeddingStore::load(dir.path(), "hole").unwrap();
    assert_eq!(store.dim(), 2);
}
