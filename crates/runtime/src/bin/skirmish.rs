//! Headless skirmish between two scripted players. Blue thinks for
//! `thinking_delay_ms` before each decision.
//!
//! ```bash
//! RUST_LOG=debug cargo run -p tactics-runtime --bin skirmish -- skirmish.ron
//! ```
//!
//! The optional argument is a RON [`RuntimeConfig`] document.

use anyhow::{Context, Result};
use tactics_core::{
    Action, AttackAction, ClassSet, CombatClass, Grid, MoveAction, PlayerId, Position, StatBlock,
    StatKind, TerrainKind, UnitKind, UnitTemplate, World,
};
use tactics_runtime::{
    AbortSignal, GameEvent, PlayerCommand, Runtime, RuntimeConfig, ScriptedProvider, ThinkingDelay,
};

const MAX_ROUNDS: u32 = 10;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let source = std::fs::read_to_string(&path)
                .with_context(|| format!("reading runtime config {path}"))?;
            RuntimeConfig::from_ron_str(&source)
                .with_context(|| format!("parsing runtime config {path}"))?
        }
        None => RuntimeConfig::default(),
    };

    let skirmish = Skirmish::new()?;
    let abort = AbortSignal::new();
    let blue = ThinkingDelay::new(
        ScriptedProvider::new(skirmish.blue_script),
        config.thinking_delay(),
        &abort,
    );
    let runtime = Runtime::builder()
        .config(config)
        .world(skirmish.world)
        .abort_signal(abort)
        .provider(skirmish.red, ScriptedProvider::new(skirmish.red_script))
        .provider(skirmish.blue, blue)
        .build()
        .await?;

    let mut events = runtime.subscribe_events();
    let printer = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            print_event(&event);
        }
    });

    let winner = runtime.run(MAX_ROUNDS).await?;
    match winner {
        Some(player) => tracing::info!(%player, "skirmish won"),
        None => tracing::info!(rounds = MAX_ROUNDS, "skirmish ended without a winner"),
    }

    runtime.shutdown().await?;
    printer.await?;
    Ok(())
}

fn print_event(event: &GameEvent) {
    match event {
        GameEvent::TurnStarted { player, expired } => {
            println!("-- {player} begins ({expired} modifiers expired)");
        }
        GameEvent::ActionExecuted { action, result } => {
            println!("   {} by {}: {result:?}", action.as_str(), action.actor());
        }
        GameEvent::ActionFailed {
            action, code, error, ..
        } => {
            println!("   {} refused [{code}]: {error}", action.as_str());
        }
        GameEvent::PlayerEliminated { player } => println!("** {player} eliminated"),
        GameEvent::TurnEnded { player } => println!("-- {player} ends"),
    }
}

/// Two commanders with an escort each, facing off across a river ford.
struct Skirmish {
    world: World,
    red: PlayerId,
    blue: PlayerId,
    red_script: Vec<PlayerCommand>,
    blue_script: Vec<PlayerCommand>,
}

impl Skirmish {
    fn new() -> Result<Self> {
        use TerrainKind::{Forest, Grass, Road, Water};

        let grid = Grid::from_rows(vec![
            vec![Grass, Grass, Water, Grass, Grass],
            vec![Road, Road, Road, Road, Road],
            vec![Grass, Forest, Water, Forest, Grass],
        ])?;
        let mut world = World::new(grid);
        let red = world.add_player(10)?;
        let blue = world.add_player(10)?;

        let lancer = escort("lancer", CombatClass::Spear);
        let swordsman = escort("swordsman", CombatClass::Sword);
        let commander = UnitTemplate::new(
            "commander",
            UnitKind::Commander,
            StatBlock::new()
                .with(StatKind::MaxHealth, 25)
                .with(StatKind::Movement, 2)
                .with(StatKind::Actions, 1)
                .with(StatKind::MinAttack, 4)
                .with(StatKind::MaxAttack, 8)
                .with(StatKind::Vision, 4),
        );

        let red_commander = world.spawn_unit(&commander, red, Position::new(1, 0))?;
        let red_lancer = world.spawn_unit(&lancer, red, Position::new(0, 1))?;
        let blue_commander = world.spawn_unit(&commander, blue, Position::new(1, 4))?;
        let blue_swordsman = world.spawn_unit(&swordsman, blue, Position::new(1, 3))?;

        let red_script = vec![
            PlayerCommand::Act(Action::Move(MoveAction::new(
                red_lancer,
                vec![Position::new(0, 1), Position::new(1, 1), Position::new(1, 2)],
            ))),
            PlayerCommand::Act(Action::Attack(AttackAction::new(red_lancer, blue_swordsman))),
            PlayerCommand::EndTurn,
            PlayerCommand::Act(Action::Attack(AttackAction::new(red_lancer, blue_swordsman))),
            PlayerCommand::Act(Action::Move(MoveAction::new(
                red_commander,
                vec![Position::new(1, 0), Position::new(1, 1)],
            ))),
        ];
        let blue_script = vec![
            PlayerCommand::Act(Action::Attack(AttackAction::new(
                blue_swordsman,
                red_lancer,
            ))),
            PlayerCommand::EndTurn,
            PlayerCommand::Act(Action::Attack(AttackAction::new(
                blue_commander,
                red_lancer,
            ))),
        ];

        Ok(Self {
            world,
            red,
            blue,
            red_script,
            blue_script,
        })
    }
}

fn escort(name: &str, class: CombatClass) -> UnitTemplate {
    UnitTemplate::new(
        name,
        UnitKind::Combatant,
        StatBlock::new()
            .with(StatKind::MaxHealth, 20)
            .with(StatKind::Movement, 3)
            .with(StatKind::Actions, 1)
            .with(StatKind::MinAttack, 6)
            .with(StatKind::MaxAttack, 10)
            .with(StatKind::Vision, 3),
    )
    .with_classes(ClassSet::from(class))
}
