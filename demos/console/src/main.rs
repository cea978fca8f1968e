use blockwalk::anyhow::bail;
use blockwalk::anyhow::Result;
use blockwalk::executor::Command;
use blockwalk::game::Game;
use blockwalk::game::SessionEvent;
use blockwalk::log::info;
use blockwalk::log::LevelFilter;
use blockwalk::map::MapModel;
use simple_logger::SimpleLogger;
use std::env;

const TIMESTEP: f32 = 1.0 / 60.0;

fn main() -> Result<()> {
    SimpleLogger::new().with_level(LevelFilter::Info).init()?;

    let map = MapModel::from_json(include_str!("../assets/map.json"))?;
    let mut game = Game::new(map);

    let args: Vec<String> = env::args().skip(1).collect();
    let program = if args.is_empty() {
        info!("No program given, running the sample: move:2 turn-left move:1");
        vec![Command::Move { blocks: 2 }, Command::TurnLeft, Command::Move { blocks: 1 }]
    } else {
        parse_program(&args)?
    };

    info!("Go to {}", game.destination().name.as_deref().unwrap_or("the destination"));
    game.run(&program);

    loop {
        game.update(TIMESTEP);

        while let Some(event) = game.poll_event() {
            match event {
                SessionEvent::Win => {
                    info!("You reached {}!", game.destination().name.as_deref().unwrap_or("the destination"));
                    return Ok(());
                }
                SessionEvent::Fail => {
                    info!("You didn't reach {}, walking back to the start", game.destination().name.as_deref().unwrap_or("the destination"));
                    game.reset_to_start();
                    return Ok(());
                }
                _ => {}
            }
        }
    }
}

fn parse_program(args: &[String]) -> Result<Vec<Command>> {
    let mut program = vec![];

    for arg in args {
        let command = match arg.as_str() {
            "move" => Command::Move { blocks: 1 },
            "littlebit" => Command::MoveLittlebit,
            "turn-left" => Command::TurnLeft,
            "turn-right" => Command::TurnRight,
            "look-left" => Command::LookLeft,
            "look-right" => Command::LookRight,
            other => match other.strip_prefix("move:") {
                Some(blocks) => match blocks.parse() {
                    Ok(blocks) => Command::Move { blocks },
                    Err(_) => bail!("Invalid block count in {}", other),
                },
                None => bail!("Unknown command {}", other),
            },
        };

        program.push(command);
    }

    Ok(program)
}
