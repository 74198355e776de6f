//! Session Benchmarks
//!
//! Measures:
//! - Session creation and history growth
//! - Caller lookup through the session store
//! - SQLite provider round trips
//! - Session serialization

use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use tokio_test::block_on;

use va_core::llm::Message;
use va_core::session::{
    APP_NAME, InMemorySessionService, Session, SessionService, SessionStore, SqliteSessionService,
};

fn bench_session_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("session_creation");

    group.bench_function("new_session", |b| {
        b.iter(|| black_box(Session::new(APP_NAME, "+15550001")))
    });

    for count in [10, 50, 100].iter() {
        group.bench_with_input(BenchmarkId::new("add_messages", count), count, |b, &count| {
            b.iter(|| {
                let mut session = Session::new(APP_NAME, "+15550001");
                for i in 0..count {
                    session.add_message(Message::user(format!("Utterance {}", i)));
                }
                black_box(session)
            })
        });
    }

    group.finish();
}

fn bench_store_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("session_store");

    group.bench_function("get_or_create_new_caller", |b| {
        b.iter_with_setup(
            || SessionStore::new(Arc::new(InMemorySessionService::new())),
            |store| block_on(store.get_or_create("+15550001")).unwrap(),
        )
    });

    group.bench_function("get_or_create_known_caller", |b| {
        let store = SessionStore::new(Arc::new(InMemorySessionService::new()));
        for i in 0..100 {
            block_on(store.get_or_create(&format!("+1555{:07}", i))).unwrap();
        }

        b.iter(|| block_on(store.get_or_create(black_box("+15550000042"))).unwrap())
    });

    group.finish();
}

fn bench_sqlite_provider(c: &mut Criterion) {
    let mut group = c.benchmark_group("sqlite_provider");

    group.bench_function("create_session", |b| {
        let service = SqliteSessionService::in_memory().unwrap();
        b.iter(|| block_on(service.create_session(APP_NAME, "+15550001")).unwrap())
    });

    group.bench_function("get_session", |b| {
        let service = SqliteSessionService::in_memory().unwrap();
        let session = block_on(service.create_session(APP_NAME, "+15550001")).unwrap();
        block_on(service.append_history(
            &session.id,
            vec![Message::user("What's my balance?"), Message::assistant("1245 rupees.")],
        ))
        .unwrap();

        b.iter(|| block_on(service.get_session(black_box(&session.id))).unwrap())
    });

    group.finish();
}

fn bench_serialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("session_serialization");

    for count in [10, 50, 200].iter() {
        group.bench_with_input(BenchmarkId::new("serialize", count), count, |b, &count| {
            let mut session = Session::new(APP_NAME, "+15550001");
            for i in 0..count {
                session.add_message(Message::user(format!("Utterance {} about my bill", i)));
            }

            b.iter(|| serde_json::to_string(black_box(&session)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_session_creation,
    bench_store_lookup,
    bench_sqlite_provider,
    bench_serialization,
);

criterion_main!(benches);
