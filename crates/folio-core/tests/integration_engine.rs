//! Integration tests for the Folio engine entry points.

use folio_core::{
    build_and_query, Backend, CoreError, DocumentPredicate, Engine, EngineConfig, IndexerError,
    QueryKind, QueryResult,
};
use folio_indexer::MemoryFileSystem;
use folio_worker::{TaskCoordinator, WorkerPool};
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::tempdir;

/// Helper to create the `{a.txt, sub/b.txt, sub/c.txt}` fixture
fn create_fixture(base: &Path) -> PathBuf {
    let root = base.join("works");
    std::fs::create_dir_all(root.join("sub")).unwrap();
    std::fs::write(root.join("a.txt"), "the cat sat on the mat").unwrap();
    std::fs::write(root.join("sub/b.txt"), "The dog\nchased the cat").unwrap();
    std::fs::write(root.join("sub/c.txt"), "no felines here").unwrap();
    root
}

fn memory_engine(fs: MemoryFileSystem, workers: usize) -> Engine<WorkerPool> {
    Engine::new(WorkerPool::new(workers).unwrap(), Arc::new(fs))
}

fn wait_until_idle<C: TaskCoordinator>(coordinator: &C, limit: Duration) -> bool {
    let deadline = Instant::now() + limit;
    while Instant::now() < deadline {
        if coordinator.in_flight() == 0 {
            return true;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    coordinator.in_flight() == 0
}

#[test]
fn test_build_and_query_round_trip() {
    let temp_dir = tempdir().unwrap();
    let root = create_fixture(temp_dir.path());

    let result =
        build_and_query(&root, QueryKind::DocumentCount, Duration::from_secs(10)).unwrap();
    assert_eq!(result, QueryResult::Count(3));
}

#[test]
fn test_concurrent_callers_see_same_count() {
    let temp_dir = tempdir().unwrap();
    let root = create_fixture(temp_dir.path());

    let engine = Engine::from_config(&EngineConfig::default()).unwrap();
    let tree = engine.build_tree(&root).unwrap();

    let counts: Vec<_> = std::thread::scope(|scope| {
        let callers: Vec<_> = (0..2)
            .map(|_| scope.spawn(|| engine.run_query(&tree, &QueryKind::DocumentCount).unwrap()))
            .collect();
        callers.into_iter().map(|c| c.join().unwrap()).collect()
    });

    assert_eq!(counts, vec![QueryResult::Count(3), QueryResult::Count(3)]);
    assert_eq!(engine.metrics().queries_total.load(Ordering::Relaxed), 2);
}

#[test]
fn test_word_count_query() {
    let fs = MemoryFileSystem::new().with_file("/doc.txt", "the cat sat on the mat");
    let engine = memory_engine(fs, 2);

    let result = engine
        .build_and_query(Path::new("/doc.txt"), QueryKind::WordCount("the".into()))
        .unwrap();
    assert_eq!(result, QueryResult::Count(2));
}

#[test]
fn test_all_query_kinds_on_fixture() {
    let temp_dir = tempdir().unwrap();
    let root = create_fixture(temp_dir.path());
    let engine = Engine::from_config(&EngineConfig::default()).unwrap();
    let tree = engine.build_tree(&root).unwrap();

    let run = |query: QueryKind| engine.run_query(&tree, &query).unwrap();

    assert_eq!(run(QueryKind::EntryCount), QueryResult::Count(5));
    assert_eq!(run(QueryKind::LineCount), QueryResult::Count(4));
    assert_eq!(run(QueryKind::WordCount("THE".into())), QueryResult::Count(4));

    let found = run(QueryKind::Find(DocumentPredicate::containing_word("cat")));
    let names: Vec<_> = found
        .as_documents()
        .unwrap()
        .iter()
        .map(|d| d.name())
        .collect();
    assert_eq!(names, vec!["a.txt", "b.txt"]);
}

#[test]
fn test_backends_agree() {
    let temp_dir = tempdir().unwrap();
    let root = create_fixture(temp_dir.path());

    let mut results = Vec::new();
    let setups = [
        (Backend::Pool, 1),
        (Backend::Pool, 4),
        (Backend::Pool, 64),
        (Backend::EventLoop, 1),
    ];
    for (backend, workers) in setups {
        let config = EngineConfig {
            backend,
            worker_threads: workers,
            ..EngineConfig::default()
        };
        let engine = Engine::from_config(&config).unwrap();
        let found = engine
            .build_and_query(&root, QueryKind::Find(DocumentPredicate::with_extension("txt")))
            .unwrap();
        results.push(found);
    }

    assert!(results.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(results[0].as_documents().unwrap().len(), 3);
}

#[test]
fn test_unreadable_file_fails_query() {
    let fs = MemoryFileSystem::new()
        .with_file("/root/a.txt", "readable")
        .with_file("/root/sub/b.txt", "readable")
        .with_file("/root/sub/secret.txt", "locked")
        .with_failure("/root/sub/secret.txt");
    let engine = memory_engine(fs, 4);

    let err = engine
        .build_and_query(Path::new("/root"), QueryKind::DocumentCount)
        .unwrap_err();

    assert!(err.is_io());
    assert!(matches!(err, CoreError::Indexer(IndexerError::Io { .. })));
    assert_eq!(engine.metrics().failures.load(Ordering::Relaxed), 1);
}

#[test]
fn test_missing_root() {
    let engine = memory_engine(MemoryFileSystem::new(), 1);
    let err = engine.build_tree(Path::new("/absent")).unwrap_err();
    assert!(matches!(err, CoreError::Indexer(IndexerError::PathNotFound(_))));
}

#[test]
fn test_slow_filesystem_times_out_and_pool_goes_idle() {
    let fs = MemoryFileSystem::new()
        .with_file("/slow/a.txt", "a")
        .with_file("/slow/b.txt", "b")
        .with_read_delay(Duration::from_millis(800));
    let engine = memory_engine(fs, 8);

    let started = Instant::now();
    let err = engine
        .build_and_query_within(
            Path::new("/slow"),
            QueryKind::DocumentCount,
            Duration::from_millis(50),
        )
        .unwrap_err();

    assert!(err.is_timeout(), "expected timeout, got {err:?}");
    assert!(started.elapsed() < Duration::from_millis(700));
    assert_eq!(engine.metrics().timeouts.load(Ordering::Relaxed), 1);

    // Reads already in progress finish, then nothing is left behind.
    assert!(wait_until_idle(engine.coordinator(), Duration::from_secs(5)));
}

#[test]
fn test_timeout_holds_when_reads_outnumber_workers() {
    for workers in [1, 2] {
        let mut fs = MemoryFileSystem::new().with_read_delay(Duration::from_millis(50));
        for i in 0..40 {
            fs = fs.with_file(format!("/busy/doc{i}.txt"), "the");
        }
        let engine = memory_engine(fs, workers);

        // 40 reads of 50ms take at least a second on two workers.
        let started = Instant::now();
        let err = engine
            .build_and_query_within(
                Path::new("/busy"),
                QueryKind::DocumentCount,
                Duration::from_millis(100),
            )
            .unwrap_err();
        let elapsed = started.elapsed();

        assert!(err.is_timeout(), "workers={workers}: expected timeout, got {err:?}");
        assert!(
            elapsed < Duration::from_millis(500),
            "workers={workers}: timed out after {elapsed:?}"
        );
        assert!(wait_until_idle(engine.coordinator(), Duration::from_secs(5)));
    }
}

#[test]
fn test_repeated_queries_are_identical() {
    let temp_dir = tempdir().unwrap();
    let root = create_fixture(temp_dir.path());
    let engine = Engine::from_config(&EngineConfig::default()).unwrap();
    let tree = engine.build_tree(&root).unwrap();

    let first = engine.run_query(&tree, &QueryKind::DocumentCount).unwrap();
    let second = engine.run_query(&tree, &QueryKind::DocumentCount).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_blocking_inside_unit_is_rejected() {
    let fs = MemoryFileSystem::new().with_file("/root/a.txt", "a");
    let engine = Arc::new(memory_engine(fs, 2));

    let inner = Arc::clone(&engine);
    let nested = engine.coordinator().submit(async move {
        Ok::<_, IndexerError>(inner.build_tree(Path::new("/root")))
    });

    let outcome = engine.coordinator().wait(nested).unwrap();
    assert!(matches!(
        outcome,
        Err(CoreError::Indexer(IndexerError::Task(_)))
    ));
}

#[test]
fn test_invalid_config_rejected() {
    let config = EngineConfig {
        timeout_ms: 0,
        ..EngineConfig::default()
    };
    assert!(matches!(
        Engine::from_config(&config),
        Err(CoreError::Config(_))
    ));
}
