//! Property-based tests for stint reconstruction and gap aggregation.

use proptest::prelude::*;
use stint_analyzer::{gap_to_leader, reconstruct_stints, Compound, LapRecord, StintStrategy};

fn compound_strategy() -> impl Strategy<Value = Option<Compound>> {
    prop_oneof![
        Just(None),
        Just(Some(Compound::Soft)),
        Just(Some(Compound::Medium)),
        Just(Some(Compound::Hard)),
        Just(Some(Compound::Intermediate)),
        Just(Some(Compound::Wet)),
    ]
}

fn driver_laps(driver: &str, compounds: &[Option<Compound>]) -> Vec<LapRecord> {
    compounds
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let mut lap = LapRecord::new(driver, i as u32 + 1);
            lap.compound = *c;
            lap
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_single_compound_is_one_stint(n in 1u32..80) {
        let laps: Vec<LapRecord> = (1..=n)
            .map(|i| LapRecord::new("VER", i).with_compound(Compound::Medium))
            .collect();
        let stints = reconstruct_stints(&laps, StintStrategy::Compound).unwrap();
        prop_assert_eq!(stints.len(), 1);
        prop_assert_eq!(stints[0].start_lap, 1);
        prop_assert_eq!(stints[0].end_lap, n);
    }

    #[test]
    fn prop_durations_sum_to_tagged_laps(
        compounds in prop::collection::vec(compound_strategy(), 0..60)
    ) {
        let laps = driver_laps("HAM", &compounds);
        let stints = reconstruct_stints(&laps, StintStrategy::Compound).unwrap();

        let tagged = compounds.iter().filter(|c| c.is_some()).count() as u32;
        let total: u32 = stints.iter().map(|s| s.duration_laps).sum();
        prop_assert_eq!(total, tagged);

        for (i, s) in stints.iter().enumerate() {
            prop_assert_eq!(s.stint_index, i);
            prop_assert_eq!(s.duration_laps, s.end_lap - s.start_lap + 1);
            for lap in s.start_lap..=s.end_lap {
                prop_assert_eq!(compounds[(lap - 1) as usize], Some(s.compound));
            }
        }
    }

    #[test]
    fn prop_reconstruction_is_repeatable(
        compounds in prop::collection::vec(compound_strategy(), 0..40)
    ) {
        let laps = driver_laps("LEC", &compounds);
        let first = reconstruct_stints(&laps, StintStrategy::Compound).unwrap();
        let second = reconstruct_stints(&laps, StintStrategy::Compound).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_pit_time_covers_every_lap(
        pits in prop::collection::vec(any::<(bool, bool)>(), 1..50)
    ) {
        let laps: Vec<LapRecord> = pits
            .iter()
            .enumerate()
            .map(|(i, (pit_in, pit_out))| {
                let mut lap = LapRecord::new("NOR", i as u32 + 1);
                lap.pit_in_time_s = pit_in.then_some(i as f64 * 90.0);
                lap.pit_out_time_s = pit_out.then_some(i as f64 * 90.0 + 20.0);
                lap
            })
            .collect();
        let stints = reconstruct_stints(&laps, StintStrategy::PitTime).unwrap();
        let total: u32 = stints.iter().map(|s| s.duration_laps).sum();
        prop_assert_eq!(total as usize, laps.len());
    }

    #[test]
    fn prop_leader_gap_is_zero(
        times in prop::collection::vec(prop::collection::vec(60.0f64..120.0, 1..6), 1..20)
    ) {
        let drivers = ["A", "B", "C", "D", "E"];
        let mut laps = Vec::new();
        for (i, lap_times) in times.iter().enumerate() {
            for (d, t) in lap_times.iter().enumerate() {
                laps.push(LapRecord::new(drivers[d], i as u32 + 1).with_lap_time(*t));
            }
        }

        let rows = gap_to_leader(&laps).unwrap();
        prop_assert_eq!(rows.len(), laps.len());
        for lap_number in 1..=times.len() as u32 {
            let min = rows
                .iter()
                .filter(|r| r.lap_number == lap_number)
                .map(|r| r.gap_to_leader_s)
                .fold(f64::INFINITY, f64::min);
            prop_assert_eq!(min, 0.0);
        }
    }

    #[test]
    fn prop_untimed_driver_does_not_move_gaps(
        times in prop::collection::vec((60.0f64..120.0, 60.0f64..120.0), 1..20)
    ) {
        let mut laps = Vec::new();
        for (i, (a, b)) in times.iter().enumerate() {
            laps.push(LapRecord::new("A", i as u32 + 1).with_lap_time(*a));
            laps.push(LapRecord::new("B", i as u32 + 1).with_lap_time(*b));
        }
        let without = gap_to_leader(&laps).unwrap();

        for i in 0..times.len() {
            laps.push(LapRecord::new("Z", i as u32 + 1));
        }
        let with = gap_to_leader(&laps).unwrap();
        prop_assert_eq!(without, with);
    }
}
