use quarantine::drugs::Drug::{self, Antibiotic, Aspirin, Ibuprofen, Insulin, Paracetamol};
use quarantine::health::HealthState::{self, Dead, Diabetic, Fever, Healthy, Pain, Tuberculosis};
use quarantine::{DeadRuleAggregation, PatientSnapshot, Quarantine, RuleSet, TickOutcome};
use strum::IntoEnumIterator;

// One of each disease, plus three patients in pain.
fn population() -> PatientSnapshot {
    PatientSnapshot::new([
        (Fever, 1),
        (Pain, 3),
        (Healthy, 2),
        (Diabetic, 3),
        (Tuberculosis, 1),
        (Dead, 0),
    ])
    .unwrap()
}

// Expected counts in the order F, P, H, D, T, X.
fn expected(counts: [u64; 6]) -> PatientSnapshot {
    let states = [Fever, Pain, Healthy, Diabetic, Tuberculosis, Dead];
    PatientSnapshot::new(states.into_iter().zip(counts)).unwrap()
}

fn after_one_tick(drugs: &[Drug]) -> PatientSnapshot {
    let mut quarantine = Quarantine::new(population());
    quarantine.set_drugs(drugs.iter().copied());
    quarantine.step();
    quarantine.report()
}

const ALL_DEAD: [u64; 6] = [0, 0, 0, 0, 0, 10];

#[test]
fn every_drug_combination() {
    let table: &[(&[Drug], [u64; 6])] = &[
        (&[], [1, 3, 2, 0, 1, 3]),
        // One drug
        (&[Antibiotic], [1, 3, 3, 0, 0, 3]),
        (&[Aspirin], [0, 0, 6, 0, 1, 3]),
        (&[Ibuprofen], [0, 0, 6, 0, 1, 3]),
        (&[Insulin], [1, 3, 2, 3, 1, 0]),
        (&[Paracetamol], [0, 0, 6, 0, 1, 3]),
        // Two drugs
        (&[Antibiotic, Aspirin], [0, 0, 7, 0, 0, 3]),
        (&[Antibiotic, Ibuprofen], [0, 0, 7, 0, 0, 3]),
        (&[Antibiotic, Insulin], [3, 3, 1, 3, 0, 0]),
        (&[Antibiotic, Paracetamol], [0, 0, 7, 0, 0, 3]),
        (&[Aspirin, Ibuprofen], ALL_DEAD),
        (&[Aspirin, Insulin], [0, 0, 6, 3, 1, 0]),
        (&[Paracetamol, Aspirin], ALL_DEAD),
        (&[Ibuprofen, Insulin], [0, 0, 6, 3, 1, 0]),
        (&[Paracetamol, Ibuprofen], [0, 0, 6, 0, 1, 3]),
        (&[Paracetamol, Insulin], [0, 0, 6, 3, 1, 0]),
        // Three drugs
        (&[Antibiotic, Aspirin, Ibuprofen], ALL_DEAD),
        (&[Antibiotic, Aspirin, Insulin], [2, 0, 5, 3, 0, 0]),
        (&[Antibiotic, Aspirin, Paracetamol], ALL_DEAD),
        (&[Antibiotic, Ibuprofen, Insulin], [2, 0, 5, 3, 0, 0]),
        (&[Antibiotic, Ibuprofen, Paracetamol], [0, 0, 7, 0, 0, 3]),
        (&[Antibiotic, Insulin, Paracetamol], [2, 0, 5, 3, 0, 0]),
        (&[Aspirin, Ibuprofen, Insulin], ALL_DEAD),
        (&[Aspirin, Ibuprofen, Paracetamol], ALL_DEAD),
        (&[Aspirin, Insulin, Paracetamol], ALL_DEAD),
        (&[Ibuprofen, Insulin, Paracetamol], [0, 0, 6, 3, 1, 0]),
        // Four drugs
        (&[Antibiotic, Aspirin, Ibuprofen, Insulin], ALL_DEAD),
        (&[Antibiotic, Aspirin, Ibuprofen, Paracetamol], ALL_DEAD),
        (&[Antibiotic, Aspirin, Insulin, Paracetamol], ALL_DEAD),
        (&[Antibiotic, Ibuprofen, Insulin, Paracetamol], [2, 0, 5, 3, 0, 0]),
        (&[Aspirin, Ibuprofen, Insulin, Paracetamol], ALL_DEAD),
        // Five drugs
        (&[Antibiotic, Aspirin, Ibuprofen, Insulin, Paracetamol], ALL_DEAD),
    ];
    assert_eq!(table.len(), 32);

    for (drugs, counts) in table {
        assert_eq!(
            after_one_tick(drugs),
            expected(*counts),
            "drugs {drugs:?}"
        );
    }
}

fn all_drug_lists() -> Vec<Vec<Drug>> {
    let drugs: Vec<Drug> = Drug::iter().collect();
    (0..1u32 << drugs.len())
        .map(|mask| {
            drugs
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, drug)| *drug)
                .collect()
        })
        .collect()
}

fn populations() -> Vec<PatientSnapshot> {
    vec![
        population(),
        PatientSnapshot::new([
            (Fever, 1),
            (Healthy, 2),
            (Diabetic, 3),
            (Tuberculosis, 1),
            (Dead, 0),
        ])
        .unwrap(),
        PatientSnapshot::new([
            (Fever, 5),
            (Pain, 0),
            (Healthy, 0),
            (Diabetic, 11),
            (Tuberculosis, 2),
            (Dead, 9),
        ])
        .unwrap(),
    ]
}

#[test]
fn population_is_conserved_and_death_is_monotonic() {
    for aggregation in [DeadRuleAggregation::AnyFired, DeadRuleAggregation::LastEvaluated] {
        for patients in populations() {
            for drugs in all_drug_lists() {
                let mut quarantine =
                    Quarantine::new(patients.clone()).with_aggregation(aggregation);
                quarantine.set_drugs(drugs.iter().copied());
                for _ in 0..3 {
                    let before = quarantine.report();
                    quarantine.step();
                    let after = quarantine.report();
                    assert_eq!(after.total(), before.total(), "drugs {drugs:?}");
                    assert!(after.get(Dead) >= before.get(Dead), "drugs {drugs:?}");
                    assert_eq!(
                        after.states().collect::<Vec<_>>(),
                        before.states().collect::<Vec<_>>()
                    );
                }
            }
        }
    }
}

#[test]
fn setting_drugs_twice_is_the_same_as_once() {
    for drugs in all_drug_lists() {
        let mut once = Quarantine::new(population());
        once.set_drugs(drugs.iter().copied());
        once.step();

        let mut twice = Quarantine::new(population());
        twice.set_drugs(drugs.iter().copied());
        twice.set_drugs(drugs.iter().copied());
        twice.step();

        assert_eq!(once.report(), twice.report());
    }
}

#[test]
fn all_dead_is_a_fixed_point() {
    let mut quarantine = Quarantine::new(population());
    quarantine.set_drugs([Aspirin, Paracetamol]);
    assert_eq!(quarantine.step(), TickOutcome::Lethal);
    let dead = quarantine.report();
    assert_eq!(dead.get(Dead), 10);

    for drugs in all_drug_lists() {
        quarantine.set_drugs(drugs.iter().copied());
        quarantine.step();
        assert_eq!(quarantine.report(), dead, "drugs {drugs:?}");
    }
}

#[test]
fn lethal_mode_is_not_sticky() {
    let mut quarantine = Quarantine::new(population());
    quarantine.set_drugs([Insulin]);
    assert_eq!(quarantine.step(), TickOutcome::Treated);
    quarantine.set_drugs([Aspirin, Ibuprofen]);
    assert_eq!(quarantine.step(), TickOutcome::Lethal);
    quarantine.set_drugs([Insulin]);
    assert_eq!(quarantine.step(), TickOutcome::Treated);
}

#[test]
fn classic_rules_ignore_ibuprofen() {
    let patients = PatientSnapshot::new([
        (Fever, 1),
        (Healthy, 2),
        (Diabetic, 3),
        (Tuberculosis, 1),
        (Dead, 0),
    ])
    .unwrap();
    let mut quarantine = Quarantine::with_rules(patients, RuleSet::classic());
    quarantine.set_drugs([Aspirin, Ibuprofen, Insulin]);
    assert_eq!(quarantine.step(), TickOutcome::Treated);
    let report = quarantine.report();
    assert_eq!(report.get(Fever), 0);
    assert_eq!(report.get(Healthy), 3);
    assert_eq!(report.get(Diabetic), 3);
}

#[test]
fn report_keys_match_the_initial_snapshot() {
    let mut quarantine = Quarantine::new(population());
    quarantine.step();
    let states: Vec<HealthState> = quarantine.report().states().collect();
    assert_eq!(states, [Fever, Pain, Healthy, Diabetic, Tuberculosis, Dead]);
}

#[test]
fn largest_population_steps_without_overflow() {
    let mut quarantine = Quarantine::new(
        PatientSnapshot::new([
            (Fever, u64::MAX - 3),
            (Pain, 1),
            (Healthy, 1),
            (Diabetic, 1),
            (Tuberculosis, 0),
            (Dead, 0),
        ])
        .unwrap(),
    );
    quarantine.set_drugs([Paracetamol]);
    assert_eq!(quarantine.step(), TickOutcome::Treated);
    assert_eq!(quarantine.report().get(Healthy), u64::MAX - 1);
    assert_eq!(quarantine.report().total(), u64::MAX);

    quarantine.set_drugs([Aspirin, Paracetamol]);
    assert_eq!(quarantine.step(), TickOutcome::Lethal);
    assert_eq!(quarantine.report().get(Dead), u64::MAX);
}
