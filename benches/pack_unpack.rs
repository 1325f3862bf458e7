// benches/pack_unpack.rs
use criterion::{criterion_group, criterion_main, Criterion};
use dirsnap::{archive_dir, extract_archive};
use std::fs;
use std::path::Path;

const FILES_PER_DIR: usize = 50;
const DIRS: usize = 8;

fn build_dataset(root: &Path) {
    for d in 0..DIRS {
        let dir = root.join(format!("dir_{d}"));
        fs::create_dir_all(&dir).unwrap();
        for f in 0..FILES_PER_DIR {
            let ext = if f % 3 == 0 { "log" } else { "txt" };
            let body = format!("file {f} in dir {d}\n").repeat(64 + f);
            fs::write(dir.join(format!("file_{f}.{ext}")), body).unwrap();
        }
    }
}

fn bench_pack_unpack(c: &mut Criterion) {
    let src = tempfile::tempdir().unwrap();
    build_dataset(src.path());
    let work = tempfile::tempdir().unwrap();
    let archive = work.path().join("bench.zip");

    c.bench_function("pack all", |b| {
        b.iter(|| archive_dir(src.path(), &archive, "*").unwrap())
    });

    c.bench_function("pack *.txt", |b| {
        b.iter(|| archive_dir(src.path(), &archive, "*.txt").unwrap())
    });

    archive_dir(src.path(), &archive, "*").unwrap();
    c.bench_function("unpack", |b| {
        b.iter_with_setup(
            || tempfile::tempdir().unwrap(),
            |out| extract_archive(&archive, out.path()).unwrap(),
        )
    });
}

criterion_group!(benches, bench_pack_unpack);
criterion_main!(benches);
