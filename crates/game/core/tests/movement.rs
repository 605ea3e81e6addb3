use std::collections::BTreeMap;

use proptest::prelude::*;

use tactics_core::{
    Engine, EngineError, ErrorSeverity, GameConfig, GameError, Grid, MovementCloud,
    MovementError, PlayerId, Position, StatBlock, StatKind, TerrainKind, TerrainSet, UnitId,
    UnitKind, UnitTemplate,
};

fn walker(movement: i32, vision: i32) -> UnitTemplate {
    UnitTemplate::new(
        "walker",
        UnitKind::Combatant,
        StatBlock::new()
            .with(StatKind::MaxHealth, 10)
            .with(StatKind::Movement, movement)
            .with(StatKind::Actions, 1)
            .with(StatKind::MaxAttack, 1)
            .with(StatKind::Vision, vision),
    )
}

fn open_engine(rows: u32, cols: u32, fog: bool) -> (Engine, PlayerId, PlayerId) {
    let grid = Grid::filled(rows, cols, TerrainKind::Grass).unwrap();
    let mut engine = Engine::new(grid, GameConfig::new().with_fog_of_war(fog));
    let red = engine.add_player(0).unwrap();
    let blue = engine.add_player(0).unwrap();
    (engine, red, blue)
}

fn spawn_ready(engine: &mut Engine, owner: PlayerId, at: Position, movement: i32) -> UnitId {
    let id = engine.spawn_unit(&walker(movement, 1), owner, at).unwrap();
    engine.start_turn(owner).unwrap();
    id
}

#[test]
fn open_field_reach_is_a_diamond() {
    for (budget, expected) in [(2, 13), (3, 21)] {
        let (mut engine, red, _) = open_engine(5, 5, false);
        let unit = spawn_ready(&mut engine, red, Position::new(2, 2), budget);

        let destinations = engine.destinations(unit).unwrap();
        assert_eq!(destinations.len(), expected);
        assert!(
            destinations
                .iter()
                .all(|tile| tile.manhattan(Position::new(2, 2)) <= budget as u32)
        );
    }
}

#[test]
fn path_requires_a_fresh_movement_cloud() {
    let (mut engine, red, _) = open_engine(3, 5, false);
    let unit = spawn_ready(&mut engine, red, Position::new(1, 0), 4);
    let target = Position::new(1, 3);

    let err = engine.path(unit, target).unwrap_err();
    assert!(matches!(
        err,
        EngineError::Movement(MovementError::NoMovementCloud { .. })
    ));
    assert_eq!(err.severity(), ErrorSeverity::Fatal);

    engine.movement_cloud(unit).unwrap();
    let path = engine.path(unit, target).unwrap();
    assert_eq!(path.first(), Some(&Position::new(1, 0)));
    assert_eq!(path.last(), Some(&target));
    assert_eq!(path.len(), 4);

    engine.move_unit(unit, path).unwrap();
    assert!(matches!(
        engine.path(unit, Position::new(1, 4)),
        Err(EngineError::Movement(MovementError::NoMovementCloud { .. }))
    ));
}

#[test]
fn walking_spends_only_the_cost_traveled() {
    let grid = Grid::from_rows(vec![vec![
        TerrainKind::Grass,
        TerrainKind::Forest,
        TerrainKind::Grass,
        TerrainKind::Grass,
    ]])
    .unwrap();
    let mut engine = Engine::new(grid, GameConfig::new().with_fog_of_war(false));
    let red = engine.add_player(0).unwrap();
    let unit = spawn_ready(&mut engine, red, Position::new(0, 0), 5);

    let path = (0..3).map(|col| Position::new(0, col)).collect();
    let outcome = engine.move_unit(unit, path).unwrap();

    assert_eq!(outcome.reached, Position::new(0, 2));
    assert_eq!(outcome.spent, 3);
    assert!(!outcome.interrupted);
    assert_eq!(engine.unit(unit).unwrap().movement_left(), 2);
    assert_eq!(
        engine.world().grid().occupant(Position::new(0, 2)),
        Some(unit)
    );
    assert_eq!(engine.world().grid().occupant(Position::new(0, 0)), None);
}

#[test]
fn hidden_enemy_interrupts_the_walk() {
    let (mut engine, red, blue) = open_engine(1, 6, true);
    let scout = spawn_ready(&mut engine, red, Position::new(0, 0), 5);
    let lurker = engine
        .spawn_unit(&walker(0, 0), blue, Position::new(0, 3))
        .unwrap();
    assert!(!engine.world().can_see(red, Position::new(0, 3)));

    let path = (0..6).map(|col| Position::new(0, col)).collect();
    let outcome = engine.move_unit(scout, path).unwrap();

    assert_eq!(outcome.reached, Position::new(0, 2));
    assert_eq!(outcome.spent, 2);
    assert!(outcome.interrupted);
    assert_eq!(engine.unit(lurker).unwrap().position(), Position::new(0, 3));
    assert_eq!(engine.unit(scout).unwrap().movement_left(), 3);
}

#[test]
fn visible_enemy_blocks_but_ally_does_not() {
    let (mut engine, red, blue) = open_engine(1, 5, false);
    let runner = spawn_ready(&mut engine, red, Position::new(0, 0), 4);
    let ally = engine
        .spawn_unit(&walker(0, 1), red, Position::new(0, 1))
        .unwrap();

    let through_ally: Vec<Position> = (0..3).map(|col| Position::new(0, col)).collect();
    let outcome = engine.move_unit(runner, through_ally).unwrap();
    assert_eq!(outcome.reached, Position::new(0, 2));

    let err = engine
        .move_unit(runner, vec![Position::new(0, 2), Position::new(0, 1)])
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Movement(MovementError::Occupied {
            destination: Position::new(0, 1),
            occupant: ally,
        })
    );

    let enemy = engine
        .spawn_unit(&walker(0, 1), blue, Position::new(0, 3))
        .unwrap();
    let err = engine
        .move_unit(
            runner,
            vec![Position::new(0, 2), Position::new(0, 3), Position::new(0, 4)],
        )
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Movement(MovementError::Blocked {
            position: Position::new(0, 3),
            occupant: enemy,
        })
    );
    assert_eq!(err.severity(), ErrorSeverity::Rejected);
}

#[test]
fn walking_through_a_visible_enemy_is_refused() {
    let (mut engine, red, blue) = open_engine(3, 5, false);
    let runner = spawn_ready(&mut engine, red, Position::new(1, 0), 4);
    let guard = engine
        .spawn_unit(&walker(0, 1), blue, Position::new(1, 1))
        .unwrap();
    assert!(engine.world().can_see(red, Position::new(1, 1)));

    // The far side is reachable around the guard, just not through it.
    assert!(
        engine
            .destinations(runner)
            .unwrap()
            .contains(&Position::new(1, 2))
    );

    let straight = vec![Position::new(1, 0), Position::new(1, 1), Position::new(1, 2)];
    let err = engine.move_unit(runner, straight).unwrap_err();
    assert_eq!(
        err,
        EngineError::Movement(MovementError::Blocked {
            position: Position::new(1, 1),
            occupant: guard,
        })
    );
    assert_eq!(err.severity(), ErrorSeverity::Rejected);
    assert_eq!(err.error_code(), "MOVE_BLOCKED");

    let runner_unit = engine.unit(runner).unwrap();
    assert_eq!(runner_unit.position(), Position::new(1, 0));
    assert_eq!(runner_unit.movement_left(), 4);

    let around = vec![
        Position::new(1, 0),
        Position::new(0, 0),
        Position::new(0, 1),
        Position::new(0, 2),
        Position::new(1, 2),
    ];
    let outcome = engine.move_unit(runner, around).unwrap();
    assert_eq!(outcome.reached, Position::new(1, 2));
    assert!(!outcome.interrupted);
}

#[test]
fn rejected_moves_leave_the_world_untouched() {
    let (mut engine, red, _) = open_engine(3, 3, false);
    let unit = spawn_ready(&mut engine, red, Position::new(0, 0), 1);

    let too_far = vec![
        Position::new(0, 0),
        Position::new(0, 1),
        Position::new(0, 2),
    ];
    let err = engine.move_unit(unit, too_far).unwrap_err();
    assert_eq!(err.severity(), ErrorSeverity::Rejected);

    let jump = vec![Position::new(0, 0), Position::new(1, 1)];
    assert!(matches!(
        engine.move_unit(unit, jump),
        Err(EngineError::Movement(MovementError::NotContiguous { .. }))
    ));

    let unit = engine.unit(unit).unwrap();
    assert_eq!(unit.position(), Position::new(0, 0));
    assert_eq!(unit.movement_left(), 1);
}

#[test]
fn buildings_do_not_move() {
    let (mut engine, red, _) = open_engine(3, 3, false);
    let tower = UnitTemplate::new(
        "tower",
        UnitKind::Building,
        StatBlock::new()
            .with(StatKind::MaxHealth, 30)
            .with(StatKind::Movement, 3),
    );
    let id = engine.spawn_unit(&tower, red, Position::new(1, 1)).unwrap();
    engine.start_turn(red).unwrap();

    let cloud = engine.movement_cloud(id).unwrap();
    assert_eq!(cloud.reachable().count(), 1);
    assert!(matches!(
        engine.move_unit(id, vec![Position::new(1, 1), Position::new(1, 2)]),
        Err(EngineError::Movement(MovementError::NotMovable { .. }))
    ));
}

// ===== properties =====

const TERRAINS: [TerrainKind; 7] = [
    TerrainKind::Grass,
    TerrainKind::Road,
    TerrainKind::Forest,
    TerrainKind::Hill,
    TerrainKind::Mountain,
    TerrainKind::Water,
    TerrainKind::Wall,
];

fn board() -> impl Strategy<Value = Vec<Vec<TerrainKind>>> {
    (2usize..7, 2usize..7).prop_flat_map(|(rows, cols)| {
        prop::collection::vec(
            prop::collection::vec(prop::sample::select(TERRAINS.to_vec()), cols),
            rows,
        )
    })
}

/// Cheapest entry cost from `origin` to every tile, by repeated relaxation.
fn reference_costs(
    grid: &Grid,
    origin: Position,
    step_cost: impl Fn(Position) -> Option<i32>,
) -> BTreeMap<Position, i32> {
    let mut cost = BTreeMap::from([(origin, 0)]);
    let tiles: Vec<Position> = grid.tiles().map(|tile| tile.position()).collect();
    for _ in 0..tiles.len() {
        let mut changed = false;
        for &tile in &tiles {
            let Some(&here) = cost.get(&tile) else {
                continue;
            };
            for next in grid.neighbors(tile) {
                let Some(step) = step_cost(next) else {
                    continue;
                };
                let candidate = here + step;
                if cost.get(&next).is_none_or(|&known| candidate < known) {
                    cost.insert(next, candidate);
                    changed = true;
                }
            }
        }
        if !changed {
            break;
        }
    }
    cost
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Every reached tile is reached at minimal cost, and nothing within
    /// budget is missed.
    #[test]
    fn prop_search_is_optimal(layout in board(), budget in 0i32..12, pick in any::<prop::sample::Index>()) {
        let grid = Grid::from_rows(layout).unwrap();
        let tiles: Vec<Position> = grid.tiles().map(|tile| tile.position()).collect();
        let origin = tiles[pick.index(tiles.len())];
        let step_cost = |position: Position| TerrainSet::LAND.cost_of(grid.terrain(position)?);

        let cloud = MovementCloud::search(&grid, UnitId(1), origin, budget, step_cost);
        let reference = reference_costs(&grid, origin, step_cost);

        for (&tile, &cost) in &reference {
            if tile == origin {
                continue;
            }
            if cost <= budget {
                prop_assert_eq!(cloud.cost_to(tile), Some(cost));
            } else {
                prop_assert!(!cloud.contains(tile));
            }
        }
        prop_assert!(cloud.reachable().all(|tile| reference.contains_key(&tile)));
    }

    /// Paths are contiguous, start at the origin and cost what the cloud
    /// says they cost.
    #[test]
    fn prop_paths_are_valid(layout in board(), budget in 0i32..12, pick in any::<prop::sample::Index>()) {
        let grid = Grid::from_rows(layout).unwrap();
        let tiles: Vec<Position> = grid.tiles().map(|tile| tile.position()).collect();
        let origin = tiles[pick.index(tiles.len())];
        let step_cost = |position: Position| TerrainSet::LAND.cost_of(grid.terrain(position)?);

        let cloud = MovementCloud::search(&grid, UnitId(1), origin, budget, step_cost);
        for tile in cloud.reachable() {
            let path = cloud.path_to(tile).unwrap();
            prop_assert_eq!(path.first(), Some(&origin));
            prop_assert_eq!(path.last(), Some(&tile));
            prop_assert!(path.windows(2).all(|pair| pair[0].manhattan(pair[1]) == 1));

            let cost: i32 = path[1..].iter().map(|&step| step_cost(step).unwrap()).sum();
            prop_assert_eq!(Some(cost), cloud.cost_to(tile));
            prop_assert!(cost <= budget);
        }
    }
}
