use crate::map::MapModel;
use crate::motion::MotionController;
use crate::nav;
use crate::nav::StraightMove;
use crate::nav::TurnDirection;
use glam::Vec2;
use log::info;
use log::warn;
use std::collections::VecDeque;

/// The executable unit produced by the external block editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Move { blocks: u32 },
    MoveLittlebit,
    TurnLeft,
    TurnRight,
    LookLeft,
    LookRight,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    Move { blocks: u32 },
    MoveLittlebit,
    Turn(TurnDirection),
}

/// Drains a command batch strictly one step at a time. A step only starts
/// once the motion controller is idle again, which is also what serializes a
/// turn requested right after a move.
#[derive(Default)]
pub struct CommandExecutor {
    steps: VecDeque<Step>,
    executing: bool,
}

impl CommandExecutor {
    pub fn is_executing(&self) -> bool {
        self.executing
    }

    pub fn is_finished(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn begin(&mut self, commands: &[Command]) {
        self.steps.clear();

        for command in commands {
            match command {
                Command::Move { blocks } => self.steps.push_back(Step::Move { blocks: *blocks }),
                Command::MoveLittlebit => self.steps.push_back(Step::MoveLittlebit),
                Command::TurnLeft => self.steps.push_back(Step::Turn(TurnDirection::Left)),
                Command::TurnRight => self.steps.push_back(Step::Turn(TurnDirection::Right)),
                Command::LookLeft => {
                    // Look is a turn followed by one block forward.
                    self.steps.push_back(Step::Turn(TurnDirection::Left));
                    self.steps.push_back(Step::Move { blocks: 1 });
                }
                Command::LookRight => {
                    self.steps.push_back(Step::Turn(TurnDirection::Right));
                    self.steps.push_back(Step::Move { blocks: 1 });
                }
            }
        }

        self.executing = true;
        info!("Executing {} commands ({} steps)", commands.len(), self.steps.len());
    }

    pub fn abort(&mut self) {
        self.steps.clear();
        self.executing = false;
    }

    /// Starts the next queued step against the motion controller. Infeasible
    /// steps log a notice and no-op, keeping whatever progress was made.
    pub fn advance(&mut self, map: &MapModel, motion: &mut MotionController, destination: Vec2, tolerance: f32) {
        let step = match self.steps.pop_front() {
            Some(step) => step,
            None => return,
        };

        match step {
            Step::Move { blocks } => match nav::plan_straight_move(map, motion.position(), motion.heading(), blocks, destination, tolerance) {
                StraightMove::Feasible(plan) => {
                    motion.start_path(plan);
                }
                StraightMove::Blocked { valid_blocks } => warn!("No valid path forward, {} of {} blocks reachable", valid_blocks, blocks),
            },
            Step::MoveLittlebit => match nav::plan_littlebit_move(map, motion.position(), motion.heading(), destination, tolerance) {
                StraightMove::Feasible(plan) => {
                    motion.start_path(plan);
                }
                StraightMove::Blocked { .. } => warn!("No valid path forward"),
            },
            Step::Turn(direction) => match nav::plan_turn(map, motion.position(), motion.heading(), direction, tolerance) {
                Some(target) => {
                    motion.start_rotation(target);
                }
                None => warn!("No {:?} turn available here", direction),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn look_commands_expand_into_a_turn_and_a_move() {
        let mut executor = CommandExecutor::default();
        executor.begin(&[Command::LookLeft, Command::LookRight]);

        assert_eq!(
            executor.steps,
            [Step::Turn(TurnDirection::Left), Step::Move { blocks: 1 }, Step::Turn(TurnDirection::Right), Step::Move { blocks: 1 }]
        );
        assert!(executor.is_executing());
    }

    #[test]
    fn abort_discards_the_remaining_queue() {
        let mut executor = CommandExecutor::default();
        executor.begin(&[Command::Move { blocks: 2 }, Command::TurnLeft]);
        executor.abort();

        assert!(!executor.is_executing());
        assert!(executor.is_finished());
    }
}
