use criterion::{criterion_group, criterion_main, Criterion};
use quarantine::drugs::Drug;
use quarantine::health::HealthState;
use quarantine::{PatientSnapshot, Quarantine};
use std::hint::black_box;

static TICKS: usize = 1000;

fn population() -> PatientSnapshot {
    PatientSnapshot::new([
        (HealthState::Fever, 1_000),
        (HealthState::Pain, 3_000),
        (HealthState::Healthy, 2_000),
        (HealthState::Diabetic, 3_000),
        (HealthState::Tuberculosis, 1_000),
        (HealthState::Dead, 0),
    ])
    .expect("valid population")
}

fn treatment_ticks() -> PatientSnapshot {
    let mut quarantine = Quarantine::new(population());
    quarantine.set_drugs([Drug::Antibiotic, Drug::Insulin, Drug::Paracetamol]);
    for _ in 0..TICKS {
        quarantine.step();
    }
    quarantine.report()
}

fn lethal_ticks() -> PatientSnapshot {
    let mut quarantine = Quarantine::new(population());
    quarantine.set_drugs([Drug::Aspirin, Drug::Ibuprofen]);
    for _ in 0..TICKS {
        quarantine.step();
    }
    quarantine.report()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("quarantine treatment ticks", |bencher| {
        bencher.iter(|| black_box(treatment_ticks()))
    });
    c.bench_function("quarantine lethal ticks", |bencher| {
        bencher.iter(|| black_box(lethal_ticks()))
    });
}

criterion_group!(quarantine_benches, criterion_benchmark);
criterion_main!(quarantine_benches);
