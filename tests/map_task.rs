use std::{collections::HashMap, fs, path::Path};

use map_task_rs::mr::{
    codec::read_bucket, partition::bucket_for, reduce_name, ErrorKind, KeyValue, MapConfig,
    MapTask, MapWorker,
};

fn tricky_records(_file: &str, contents: &str) -> anyhow::Result<Vec<KeyValue>> {
    let mut kvs = contents
        .lines()
        .enumerate()
        .map(|(i, line)| KeyValue::new(line, format!("line {}\nof \"{}\"", i, contents.len())))
        .collect::<Vec<_>>();
    kvs.push(KeyValue::new("", ""));
    kvs.push(KeyValue::new("dup", "a"));
    kvs.push(KeyValue::new("dup", "b"));
    kvs.push(KeyValue::new("multi\nline \"key\"", "{\"Key\": 1}"));
    Ok(kvs)
}

fn run(dir: &Path, shard: &Path, n_reduce: usize) -> Vec<Vec<KeyValue>> {
    let worker = MapWorker::new(MapConfig::default().with_output_dir(dir));
    let task = MapTask::new("test", 7, n_reduce).unwrap();
    let output = worker.map(&task, shard, &tricky_records).unwrap();
    assert_eq!(output.buckets.len(), n_reduce);
    (0..n_reduce)
        .map(|r| read_bucket(&dir.join(reduce_name("test", 7, r))).unwrap())
        .collect()
}

fn write_shard(dir: &Path) -> std::path::PathBuf {
    let shard = dir.join("shard.txt");
    fs::write(&shard, "alpha\nbeta\ngamma\n\ndelta \"quoted\"\nepsilon\tzeta\n").unwrap();
    shard
}

#[test]
fn buckets_partition_the_emitted_records_exactly() {
    let dir = tempfile::tempdir().unwrap();
    let shard = write_shard(dir.path());
    let contents = fs::read_to_string(&shard).unwrap();
    let expected = tricky_records("", &contents).unwrap();

    let buckets = run(dir.path(), &shard, 5);

    let mut counts: HashMap<KeyValue, i32> = HashMap::new();
    for kv in &expected {
        *counts.entry(kv.clone()).or_default() += 1;
    }
    for (r, records) in buckets.iter().enumerate() {
        for kv in records {
            assert_eq!(bucket_for(&kv.key, 5), r, "{:?} is in the wrong bucket", kv);
            *counts.entry(kv.clone()).or_default() -= 1;
        }
    }
    assert!(counts.values().all(|c| *c == 0), "{:?}", counts);
}

#[test]
fn records_keep_their_emission_order_within_a_bucket() {
    let dir = tempfile::tempdir().unwrap();
    let shard = write_shard(dir.path());
    let buckets = run(dir.path(), &shard, 3);

    let dup_bucket = &buckets[bucket_for("dup", 3)];
    let dups = dup_bucket
        .iter()
        .filter(|kv| kv.key == "dup")
        .map(|kv| kv.value())
        .collect::<Vec<_>>();
    assert_eq!(dups, vec!["a", "b"]);
}

#[test]
fn rerunning_a_task_produces_identical_files() {
    let dir = tempfile::tempdir().unwrap();
    let shard = write_shard(dir.path());

    run(dir.path(), &shard, 4);
    let first = (0..4)
        .map(|r| fs::read(dir.path().join(reduce_name("test", 7, r))).unwrap())
        .collect::<Vec<_>>();
    run(dir.path(), &shard, 4);
    let second = (0..4)
        .map(|r| fs::read(dir.path().join(reduce_name("test", 7, r))).unwrap())
        .collect::<Vec<_>>();

    assert_eq!(first, second);
}

#[test]
fn a_single_reduce_task_gets_everything() {
    let dir = tempfile::tempdir().unwrap();
    let shard = write_shard(dir.path());
    let contents = fs::read_to_string(&shard).unwrap();

    let buckets = run(dir.path(), &shard, 1);
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0], tricky_records("", &contents).unwrap());
}

#[test]
fn failing_map_function_is_reported_as_a_transform_error() {
    let dir = tempfile::tempdir().unwrap();
    let shard = write_shard(dir.path());
    let worker = MapWorker::new(MapConfig::default().with_output_dir(dir.path()));
    let task = MapTask::new("test", 0, 2).unwrap();

    let err = worker
        .map(&task, &shard, &|_: &str, _: &str| -> anyhow::Result<Vec<KeyValue>> {
            Err(anyhow::anyhow!("cannot parse"))
        })
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transform);
    assert!(!dir.path().join(reduce_name("test", 0, 0)).exists());
    assert!(!dir.path().join(reduce_name("test", 0, 1)).exists());
}
