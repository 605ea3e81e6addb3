use tactics_core::{
    EffectKind, Engine, EngineError, GameConfig, Grid, ModifierDuration, ModifierTemplate,
    PlayerId, Position, StackOutcome, StackingPolicy, StatBlock, StatKind, StatOp, TerrainKind,
    UnitKind, UnitTemplate,
};

fn soldier() -> UnitTemplate {
    UnitTemplate::new(
        "soldier",
        UnitKind::Combatant,
        StatBlock::new()
            .with(StatKind::MaxHealth, 12)
            .with(StatKind::Movement, 3)
            .with(StatKind::Actions, 1)
            .with(StatKind::MinAttack, 20)
            .with(StatKind::MaxAttack, 20)
            .with(StatKind::Vision, 3),
    )
}

fn engine() -> (Engine, PlayerId, PlayerId) {
    let grid = Grid::filled(4, 4, TerrainKind::Grass).unwrap();
    let mut engine = Engine::new(grid, GameConfig::new().with_fog_of_war(false));
    let red = engine.add_player(0).unwrap();
    let blue = engine.add_player(0).unwrap();
    (engine, red, blue)
}

fn haste(turns: i32, policy: StackingPolicy) -> ModifierTemplate {
    ModifierTemplate::stat(
        "haste",
        StatKind::Movement,
        StatOp::Add(2),
        ModifierDuration::Finite(turns),
        policy,
    )
}

#[test]
fn zero_duration_survives_until_the_next_turn_start() {
    let (mut engine, red, _) = engine();
    let unit = engine.spawn_unit(&soldier(), red, Position::new(0, 0)).unwrap();
    engine
        .attach_modifier(&haste(0, StackingPolicy::RejectDuplicate), unit, unit)
        .unwrap();
    assert_eq!(engine.effective_stats(unit).unwrap()[StatKind::Movement], 5);

    let expired = engine.start_turn(red).unwrap();
    assert_eq!(expired.len(), 1);
    assert_eq!(expired[0].name, "haste");
    assert_eq!(engine.unit(unit).unwrap().movement_left(), 3);
}

#[test]
fn durations_count_owner_turn_starts() {
    let (mut engine, red, blue) = engine();
    let unit = engine.spawn_unit(&soldier(), red, Position::new(0, 0)).unwrap();
    engine
        .attach_modifier(&haste(1, StackingPolicy::RejectDuplicate), unit, unit)
        .unwrap();

    // Other players' turns do not tick this unit.
    engine.start_turn(blue).unwrap();
    engine.start_turn(blue).unwrap();

    engine.start_turn(red).unwrap();
    assert_eq!(engine.unit(unit).unwrap().movement_left(), 5);
    engine.start_turn(red).unwrap();
    assert_eq!(engine.unit(unit).unwrap().movement_left(), 3);
}

#[test]
fn stacking_policies_through_the_engine() {
    let (mut engine, red, _) = engine();
    let unit = engine.spawn_unit(&soldier(), red, Position::new(0, 0)).unwrap();

    let first = engine
        .attach_modifier(&haste(1, StackingPolicy::DurationAdditive), unit, unit)
        .unwrap();
    assert!(matches!(first, StackOutcome::Applied(_)));
    let second = engine
        .attach_modifier(&haste(2, StackingPolicy::DurationAdditive), unit, unit)
        .unwrap();
    assert!(matches!(second, StackOutcome::Extended { .. }));

    let stack = engine.unit(unit).unwrap().modifiers();
    assert_eq!(stack.len(), 1);
    assert_eq!(
        stack.iter().next().unwrap().remaining,
        ModifierDuration::Finite(3)
    );
    assert_eq!(engine.effective_stats(unit).unwrap()[StatKind::Movement], 5);
}

#[test]
fn rooted_units_get_no_movement() {
    let (mut engine, red, _) = engine();
    let unit = engine.spawn_unit(&soldier(), red, Position::new(0, 0)).unwrap();
    let roots = ModifierTemplate::effect(
        "roots",
        EffectKind::Rooted,
        ModifierDuration::Finite(1),
        StackingPolicy::ReplaceIfLonger,
    );
    engine.attach_modifier(&roots, unit, unit).unwrap();

    engine.start_turn(red).unwrap();
    let rooted = engine.unit(unit).unwrap();
    assert_eq!(rooted.movement_left(), 0);
    assert_eq!(rooted.actions_left(), 1);
}

#[test]
fn losing_the_commander_eliminates_its_player() {
    let (mut engine, red, blue) = engine();
    let general = UnitTemplate::new(
        "general",
        UnitKind::Commander,
        StatBlock::new().with(StatKind::MaxHealth, 10),
    );
    let attacker = engine.spawn_unit(&soldier(), red, Position::new(1, 1)).unwrap();
    let commander = engine.spawn_unit(&general, blue, Position::new(1, 2)).unwrap();
    engine.start_turn(red).unwrap();

    let outcome = engine.attack(attacker, commander).unwrap();
    assert!(outcome.defender_died);
    assert!(!engine.world().player(blue).unwrap().is_alive());
    assert!(engine.world().player(red).unwrap().is_alive());
}

#[test]
fn modifiers_that_empty_health_destroy_the_unit() {
    let (mut engine, red, blue) = engine();
    let general = UnitTemplate::new(
        "general",
        UnitKind::Commander,
        StatBlock::new().with(StatKind::MaxHealth, 10),
    );
    let hexer = engine.spawn_unit(&soldier(), red, Position::new(0, 0)).unwrap();
    let commander = engine.spawn_unit(&general, blue, Position::new(3, 3)).unwrap();
    let withering = ModifierTemplate::stat(
        "withering",
        StatKind::MaxHealth,
        StatOp::SetMax(0),
        ModifierDuration::Infinite,
        StackingPolicy::RejectDuplicate,
    );

    let outcome = engine
        .attach_modifier(&withering, commander, hexer)
        .unwrap();
    assert!(outcome.attached().is_some());

    assert!(engine.unit(commander).is_none());
    assert_eq!(engine.world().grid().occupant(Position::new(3, 3)), None);
    assert!(engine.unit(hexer).unwrap().granted().is_empty());
    assert!(!engine.world().player(blue).unwrap().is_alive());

    engine.start_turn(blue).unwrap();
    assert_eq!(engine.units_of(blue).count(), 0);
}

#[test]
fn unknown_handles_are_reported() {
    let (mut engine, _, _) = engine();
    assert_eq!(
        engine.start_turn(PlayerId(7)).unwrap_err(),
        EngineError::PlayerNotFound(PlayerId(7))
    );
}
