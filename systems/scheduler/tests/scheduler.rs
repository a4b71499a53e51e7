use std::time::Duration;

use turf_war_core::{Command, Event, FactionId, Selection, TerritoryId};
use turf_war_system_scheduler::{Config, SimulationScheduler, ATTACK_WEIGHT, RANDOM_TICK_WEIGHT};
use turf_war_world::{self as world, query, World};

fn elapsed(millis: u64) -> Vec<Event> {
    vec![Event::TimeAdvanced {
        dt: Duration::from_millis(millis),
    }]
}

fn ids(values: &[u32]) -> Vec<TerritoryId> {
    values.iter().copied().map(TerritoryId::new).collect()
}

#[test]
fn emits_one_skirmish_per_elapsed_period() {
    let territories = ids(&[1, 2, 3]);
    let mut scheduler = SimulationScheduler::new(Config::new(Duration::from_millis(500), 0xfeed));
    let mut commands = Vec::new();

    scheduler.handle(&elapsed(400), &territories, &mut commands);
    assert!(commands.is_empty(), "no skirmish before a full period");

    scheduler.handle(&elapsed(100), &territories, &mut commands);
    assert_eq!(commands.len(), 1);

    scheduler.handle(&elapsed(1600), &territories, &mut commands);
    assert_eq!(commands.len(), 4, "three more periods elapsed");

    for command in &commands {
        match command {
            Command::ApplyTransaction {
                territory, weight, ..
            } => {
                assert!(territories.contains(territory));
                assert_eq!(*weight, RANDOM_TICK_WEIGHT);
            }
            other => panic!("unexpected command emitted: {other:?}"),
        }
    }
}

#[test]
fn same_seed_replays_identical_skirmishes() {
    let territories = ids(&[1, 2, 3, 4, 5, 6, 7, 8]);
    let run = |seed: u64| {
        let mut scheduler = SimulationScheduler::new(Config::new(Duration::from_millis(400), seed));
        let mut commands = Vec::new();
        for _ in 0..50 {
            scheduler.handle(&elapsed(400), &territories, &mut commands);
        }
        commands
    };

    let first = run(0x5eed);
    assert_eq!(first.len(), 50);
    assert_eq!(first, run(0x5eed));
    assert_ne!(first, run(0x5eee), "different seeds should diverge");
}

#[test]
fn pause_discards_pending_phase_and_resume_does_not_replay() {
    let territories = ids(&[1]);
    let mut scheduler = SimulationScheduler::new(Config::new(Duration::from_millis(1000), 3));
    let mut commands = Vec::new();

    scheduler.handle(&elapsed(900), &territories, &mut commands);
    scheduler.set_running(false);
    assert!(!scheduler.is_running());

    scheduler.handle(&elapsed(5000), &territories, &mut commands);
    assert!(commands.is_empty(), "paused scheduler must not fire");

    scheduler.set_running(true);
    scheduler.handle(&elapsed(200), &territories, &mut commands);
    assert!(commands.is_empty(), "resume starts a fresh period");

    scheduler.handle(&elapsed(800), &territories, &mut commands);
    assert_eq!(commands.len(), 1);
}

#[test]
fn period_changes_are_clamped_and_release_at_most_one_fire() {
    let mut clamped = SimulationScheduler::new(Config::default());
    assert_eq!(clamped.set_period(Duration::from_millis(100)), Duration::from_millis(350));
    assert_eq!(clamped.set_period(Duration::from_secs(60)), Duration::from_millis(2200));

    let territories = ids(&[1, 2]);
    let mut scheduler = SimulationScheduler::new(Config::new(Duration::from_millis(2000), 11));
    let mut commands = Vec::new();

    scheduler.handle(&elapsed(1900), &territories, &mut commands);
    assert!(commands.is_empty());
    assert_eq!(scheduler.set_period(Duration::from_millis(400)), Duration::from_millis(400));

    scheduler.handle(&elapsed(1), &territories, &mut commands);
    assert_eq!(commands.len(), 1, "carried phase releases a single skirmish");

    scheduler.handle(&elapsed(398), &territories, &mut commands);
    assert_eq!(commands.len(), 1);
    scheduler.handle(&elapsed(2), &territories, &mut commands);
    assert_eq!(commands.len(), 2);
}

#[test]
fn attack_without_faction_is_a_no_op() {
    let world = World::new();
    let mut scheduler = SimulationScheduler::new(Config::default());
    let mut commands = Vec::new();

    let target = scheduler.attack(
        &Selection {
            faction: None,
            territory: Some(TerritoryId::new(3)),
        },
        &query::territory_view(&world),
        &mut commands,
    );

    assert!(target.is_none());
    assert!(commands.is_empty());
}

#[test]
fn attack_prefers_selected_then_contested_then_random_territory() {
    let mut world = World::new();
    let mut scheduler = SimulationScheduler::new(Config::new(Duration::from_millis(1200), 21));
    let mut commands = Vec::new();

    let selected = Selection {
        faction: Some(FactionId::Monad),
        territory: Some(TerritoryId::new(6)),
    };
    let target = scheduler.attack(&selected, &query::territory_view(&world), &mut commands);
    assert_eq!(target, Some(TerritoryId::new(6)));
    assert_eq!(
        commands.pop(),
        Some(Command::ApplyTransaction {
            territory: TerritoryId::new(6),
            faction: FactionId::Monad,
            weight: ATTACK_WEIGHT,
        })
    );

    let unselected = Selection {
        faction: Some(FactionId::Base),
        territory: None,
    };
    let view = query::territory_view(&world);
    assert!(view.first_contested().is_none(), "fresh board has nothing contested");
    let target = scheduler
        .attack(&unselected, &view, &mut commands)
        .expect("random target chosen");
    assert!(view.get(target).is_some());
    commands.clear();

    for faction in [FactionId::Base, FactionId::Hyperliquid, FactionId::Monad] {
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::ApplyTransaction {
                territory: TerritoryId::new(14),
                faction,
                weight: 1.0,
            },
            &mut events,
        )
        .expect("transaction accepted");
    }
    let view = query::territory_view(&world);
    assert_eq!(view.first_contested().map(|snapshot| snapshot.id), Some(TerritoryId::new(14)));

    let target = scheduler.attack(&unselected, &view, &mut commands);
    assert_eq!(target, Some(TerritoryId::new(14)));
}

#[test]
fn skirmishes_feed_the_world_without_breaking_invariants() {
    let mut world = World::new();
    let territories = query::territory_ids(&world);
    let mut scheduler = SimulationScheduler::new(Config::new(Duration::from_millis(350), 99));

    for _ in 0..500 {
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(350),
            },
            &mut events,
        )
        .expect("tick accepted");

        let mut commands = Vec::new();
        scheduler.handle(&events, &territories, &mut commands);
        assert_eq!(commands.len(), 1);
        for command in commands {
            world::apply(&mut world, command, &mut events).expect("skirmish accepted");
        }
    }

    for snapshot in query::territory_view(&world).iter() {
        assert!((snapshot.control.total() - 100.0).abs() < 1e-6);
    }
}
