//! Benchmarks for the configuration engine
//!
//! Run with: cargo bench --package marquee-config

use criterion::{criterion_group, criterion_main, Criterion};
use marquee_config::{Catalog, ConfigManager, LevelFile, RomContext};
use marquee_core::Level;
use std::fs;
use std::hint::black_box;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, text: &str) {
    let path = root.join(relative);
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).expect("Failed to create dirs");
    }
    fs::write(path, text).expect("Failed to write file");
}

/// A root whose chain has been loaded and saved once
fn seeded_root() -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write(temp_dir.path(), "config/feel.ini", "current_platform arcade\n");
    write(temp_dir.path(), "config/arcade/arcade.ini", "current_emulator mame\n");
    write(
        temp_dir.path(),
        "config/arcade/mame/mame.ini",
        "current_gamelist mame-0\nrom_path /roms\n",
    );
    let mut manager =
        ConfigManager::with_builtin_catalog(temp_dir.path()).expect("Failed to build engine");
    manager
        .load_config(Level::Global)
        .expect("Failed to load chain");
    manager.save_config().expect("Failed to save chain");
    temp_dir
}

fn bench_catalog(c: &mut Criterion) {
    c.bench_function("catalog_builtin", |b| {
        b.iter(|| {
            let catalog = Catalog::builtin().expect("Failed to parse catalog");
            black_box(catalog);
        });
    });
}

fn bench_load_chain(c: &mut Criterion) {
    let temp_dir = seeded_root();
    let base = ConfigManager::with_builtin_catalog(temp_dir.path()).expect("Failed to build");

    c.bench_function("load_full_chain", |b| {
        b.iter(|| {
            let mut manager = base.fresh();
            manager
                .load_config(Level::Global)
                .expect("Failed to load chain");
            black_box(manager);
        });
    });
}

fn bench_resolve(c: &mut Criterion) {
    let temp_dir = seeded_root();
    let mut manager =
        ConfigManager::with_builtin_catalog(temp_dir.path()).expect("Failed to build");
    manager
        .load_config(Level::Global)
        .expect("Failed to load chain");

    c.bench_function("restore_gamelist_values", |b| {
        b.iter(|| {
            manager.restore_level_values(black_box(Level::Gamelist));
        });
    });
}

fn bench_save(c: &mut Criterion) {
    let temp_dir = seeded_root();
    let mut manager =
        ConfigManager::with_builtin_catalog(temp_dir.path()).expect("Failed to build");
    manager
        .load_config(Level::Global)
        .expect("Failed to load chain");
    let mut counter = 0u32;

    c.bench_function("save_changed_value", |b| {
        b.iter(|| {
            counter += 1;
            manager
                .set_parameter("keyboard_scroll_rate", &counter.to_string())
                .expect("Failed to set");
            manager.save_config().expect("Failed to save");
        });
    });
}

fn bench_parse_level_file(c: &mut Criterion) {
    let text: String = (0..300)
        .map(|i| format!("param_{}\t\t  value {}\n", i, i))
        .collect();

    c.bench_function("parse_level_file", |b| {
        b.iter(|| {
            let file = LevelFile::parse(black_box(&text), |name| name.len() % 2 == 0);
            black_box(file);
        });
    });
}

fn bench_expand_template(c: &mut Criterion) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut manager =
        ConfigManager::with_builtin_catalog(temp_dir.path()).expect("Failed to build");
    manager
        .set_parameter("rom_path", "[emulator_path]/roms")
        .expect("Failed to set");
    manager
        .set_parameter("rom_extension", "zip")
        .expect("Failed to set");
    let rom = RomContext::new("pacman");

    c.bench_function("expand_template", |b| {
        b.iter(|| {
            let expanded = manager.expand_template(
                black_box("-rompath \"[rom_path]\" [full_path] -video [video_path]"),
                Some(&rom),
            );
            black_box(expanded);
        });
    });
}

criterion_group!(
    benches,
    bench_catalog,
    bench_load_chain,
    bench_resolve,
    bench_save,
    bench_parse_level_file,
    bench_expand_template
);
criterion_main!(benches);
