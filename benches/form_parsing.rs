//! Benchmarks for form parsing and record decoding.
//!
//! These benchmarks measure turning edit forms into request fields and
//! decoding list responses into records.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use organizer::api::{Entity, HealthEntry, Task};
use organizer::screen::Form;

fn task_list_json(count: usize) -> String {
    let records: Vec<String> = (0..count)
        .map(|id| {
            format!(
                r#"{{"id":{},"title":"Task {}","description":null,"due_date":"2024-05-01T00:00:00","completed":false,"user_id":1}}"#,
                id, id
            )
        })
        .collect();
    format!("[{}]", records.join(","))
}

fn bench_task_form(c: &mut Criterion) {
    let form = Form::new(Task::SCHEMA)
        .with("title", "Buy milk")
        .with("description", "Two litres")
        .with("due_date", "2024-05-01")
        .with("completed", "yes");

    c.bench_function("task_fields_from_form", |b| {
        b.iter(|| Task::fields_from_form(black_box(&form)))
    });
}

fn bench_health_form(c: &mut Criterion) {
    let form = Form::new(HealthEntry::SCHEMA)
        .with("activity", "Yoga")
        .with("time", "18:00")
        .with("date", "2024-05-02");

    c.bench_function("health_fields_from_form", |b| {
        b.iter(|| HealthEntry::fields_from_form(black_box(&form)))
    });
}

fn bench_decode_tasks(c: &mut Criterion) {
    let body = task_list_json(200);

    c.bench_function("decode_200_tasks", |b| {
        b.iter(|| serde_json::from_str::<Vec<Task>>(black_box(&body)))
    });
}

criterion_group!(benches, bench_task_form, bench_health_form, bench_decode_tasks);
criterion_main!(benches);
