use std::time::Duration;

use rampart_core::{AbilityKind, Command, Event, GameConfig};
use rampart_system_abilities::{Abilities, AbilityRequest};
use rampart_world::{apply, query, MapLayout, World};

fn frame(
    world: &mut World,
    abilities: &mut Abilities,
    requests: &[AbilityRequest],
) -> Vec<Event> {
    let mut events = Vec::new();
    apply(
        world,
        Command::Tick {
            dt: Duration::from_millis(100),
        },
        &mut events,
    );

    let mut commands = Vec::new();
    abilities.handle(&events, requests, &mut commands);
    let mut ability_events = Vec::new();
    for command in commands {
        apply(world, command, &mut ability_events);
    }
    // Feed confirmations straight back so cooldowns arm this frame.
    let mut ignored = Vec::new();
    abilities.handle(&ability_events, &[], &mut ignored);
    events.append(&mut ability_events);
    events
}

#[test]
fn activation_deducts_cost_and_arms_the_cooldown() {
    let mut world =
        World::new(&MapLayout::classic(), GameConfig::default()).expect("classic layout is valid");
    let mut abilities = Abilities::new();

    let request = AbilityRequest::new(AbilityKind::CashBoost, None);
    let events = frame(&mut world, &mut abilities, &[request]);
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::AbilityActivated { .. })));
    assert_eq!(query::player(&world).money, 550);

    // The follow-up request is swallowed by the cooldown gate.
    let events = frame(&mut world, &mut abilities, &[request]);
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::AbilityActivated { .. })));
    assert_eq!(query::player(&world).money, 550);
    assert!(!abilities.is_ready(AbilityKind::CashBoost));
}

#[test]
fn world_rejections_do_not_consume_the_cooldown() {
    let config = GameConfig {
        starting_money: 50,
        ..GameConfig::default()
    };
    let mut world =
        World::new(&MapLayout::classic(), config).expect("classic layout is valid");
    let mut abilities = Abilities::new();

    let request = AbilityRequest::new(AbilityKind::FreezeAll, None);
    let events = frame(&mut world, &mut abilities, &[request]);
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::AbilityRejected { .. })));
    assert!(
        abilities.is_ready(AbilityKind::FreezeAll),
        "a rejected activation must stay ready for retry"
    );
}
