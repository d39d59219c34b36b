//! Store Performance Benchmarks
//!
//! Measures the statements behind each menu action on a file-backed `SQLite`
//! database:
//! - Existence checks (hit and miss)
//! - Full-table listing and rendering

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use employee_tracker::engine::sqlite::SqliteStore;
use employee_tracker::output::render_table;
use employee_tracker::{ConnectionConfig, NewDepartment, NewRole, Store, Table};

fn seeded_store(runtime: &tokio::runtime::Runtime, name: &str) -> (SqliteStore, std::path::PathBuf) {
    let temp_file = std::env::temp_dir().join(name);
    let _ = std::fs::remove_file(&temp_file);

    let store = SqliteStore::open(&ConnectionConfig::sqlite(temp_file.clone()))
        .expect("Failed to open database");

    runtime.block_on(async {
        store.ensure_schema().await.expect("Failed to create schema");
        store.insert_department(&NewDepartment { name: "Engineering".into() }).await.unwrap();
        for i in 1..=100 {
            store
                .insert_role(&NewRole {
                    title: format!("Role {i}"),
                    salary: (50_000 + i * 100).to_string(),
                    department_id: "1".into(),
                })
                .await
                .unwrap();
        }
    });

    (store, temp_file)
}

fn bench_existence_check(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let (store, temp_file) = seeded_store(&runtime, "bench_store_exists.db");

    c.bench_function("sqlite_role_exists_hit", |b| {
        b.iter(|| runtime.block_on(store.exists(Table::Role, black_box("50"))).unwrap());
    });

    c.bench_function("sqlite_role_exists_miss", |b| {
        b.iter(|| runtime.block_on(store.exists(Table::Role, black_box("5000"))).unwrap());
    });

    let _ = runtime.block_on(store.close());
    let _ = std::fs::remove_file(&temp_file);
}

fn bench_view_all_roles(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let (store, temp_file) = seeded_store(&runtime, "bench_store_view.db");

    c.bench_function("sqlite_view_all_roles", |b| {
        b.iter(|| {
            let result = runtime.block_on(store.fetch_all(black_box(Table::Role))).unwrap();
            render_table(&result)
        });
    });

    let _ = runtime.block_on(store.close());
    let _ = std::fs::remove_file(&temp_file);
}

criterion_group!(benches, bench_existence_check, bench_view_all_roles);
criterion_main!(benches);
