use crate::error_return;
use crate::executor::Command;
use crate::executor::CommandExecutor;
use crate::map::same_point;
use crate::map::MapModel;
use crate::map::Point;
use crate::map::PointKind;
use crate::map::DEFAULT_TOLERANCE;
use crate::motion::AnimationFrame;
use crate::motion::MotionController;
use crate::utils::math::Vec2MathUtils;
use glam::Vec2;
use log::info;
use std::collections::VecDeque;

/// Discrete lifecycle signals for the embedder, drained with `poll_event`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    RoundStarted,
    Win,
    Fail,
    ResetToStart,
}

/// Settled pose, always equal to a map point once a segment completes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerState {
    pub position: Vec2,
    pub heading: f32,
    pub moving: bool,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DebugOverlay {
    pub show_points: bool,
    pub show_paths: bool,
}

/// Everything the renderer needs for one frame. Without the debug overlay
/// only the destination marker is drawn on top of the map.
pub struct RenderView<'a> {
    pub frame: AnimationFrame,
    pub player: PlayerState,
    pub destination: &'a Point,
    pub debug: DebugOverlay,
}

/// One game session: the static map, the player, the executing program and
/// the round state. All progression happens inside `update`, driven by the
/// embedder's frame loop.
pub struct Game {
    map: MapModel,
    motion: MotionController,
    executor: CommandExecutor,
    start: Vec2,
    start_heading: f32,
    destination: Point,
    game_over: bool,
    tolerance: f32,
    events: VecDeque<SessionEvent>,
    debug: DebugOverlay,
}

impl Game {
    pub fn new(map: MapModel) -> Self {
        let mut game = Self {
            map,
            motion: MotionController::new(Vec2::ZERO, 0.0),
            executor: Default::default(),
            start: Vec2::ZERO,
            start_heading: 0.0,
            destination: Point { position: Vec2::ZERO, kind: PointKind::Destination, name: None },
            game_over: false,
            tolerance: DEFAULT_TOLERANCE,
            events: Default::default(),
            debug: Default::default(),
        };

        game.start_round();
        game
    }

    pub fn map(&self) -> &MapModel {
        &self.map
    }

    pub fn destination(&self) -> &Point {
        &self.destination
    }

    pub fn is_over(&self) -> bool {
        self.game_over
    }

    pub fn is_executing(&self) -> bool {
        self.executor.is_executing()
    }

    /// Picks a random start and a random destination. Destinations one edge
    /// away from the start are skipped when a farther one exists.
    pub fn start_round(&mut self) {
        let starts: Vec<Point> = self.map.points_of_kind(PointKind::Start).cloned().collect();
        let start = starts[fastrand::usize(..starts.len())].clone();

        let destinations: Vec<Point> = self.map.points_of_kind(PointKind::Destination).cloned().collect();
        let indirect: Vec<Point> = destinations.iter().filter(|point| !self.map.has_direct_connection(start.position, point.position, self.tolerance)).cloned().collect();
        let candidates = if indirect.is_empty() { destinations } else { indirect };
        self.destination = candidates[fastrand::usize(..candidates.len())].clone();

        self.start = start.position;
        self.start_heading = self.initial_heading(start.position);
        self.motion.warp_to(self.start, self.start_heading);
        self.executor.abort();
        self.game_over = false;
        self.events.push_back(SessionEvent::RoundStarted);

        info!("Round started, go to {}", self.destination_name());
    }

    /// Returns the player to the round's starting pose. Safe to call any
    /// number of times.
    pub fn reset_to_start(&mut self) {
        self.executor.abort();
        self.motion.warp_to(self.start, self.start_heading);
        self.game_over = false;
        self.events.push_back(SessionEvent::ResetToStart);

        info!("Player reset to the starting position");
    }

    /// Accepts a command batch for execution. Only one batch runs at a time.
    pub fn run(&mut self, commands: &[Command]) {
        if self.executor.is_executing() {
            error_return!("Run request rejected, a program is already executing");
        }
        if self.game_over {
            error_return!("Run request rejected, the round is over");
        }

        self.executor.begin(commands);
    }

    /// Stops execution and drops the remaining queue. The in-flight animation
    /// is cut short without rolling back, the settled position stays at the
    /// last completed segment.
    pub fn stop(&mut self) {
        self.executor.abort();
        self.motion.cancel();
    }

    pub fn update(&mut self, delta: f32) {
        self.motion.update(delta);

        if self.motion.take_completed() && !self.game_over && same_point(self.motion.position(), self.destination.position, self.tolerance) {
            self.game_over = true;
            self.executor.abort();
            self.events.push_back(SessionEvent::Win);
            info!("Destination {} reached", self.destination_name());
            return;
        }

        if self.executor.is_executing() && !self.motion.is_busy() && !self.game_over {
            if self.executor.is_finished() {
                self.executor.abort();

                if !same_point(self.motion.position(), self.destination.position, self.tolerance) {
                    self.events.push_back(SessionEvent::Fail);
                    info!("Program finished away from {}", self.destination_name());
                }
                return;
            }

            self.executor.advance(&self.map, &mut self.motion, self.destination.position, self.tolerance);
        }
    }

    pub fn poll_event(&mut self) -> Option<SessionEvent> {
        self.events.pop_front()
    }

    pub fn player(&self) -> PlayerState {
        PlayerState { position: self.motion.position(), heading: self.motion.heading(), moving: self.motion.is_moving() }
    }

    pub fn view(&self) -> RenderView {
        RenderView { frame: self.motion.frame(), player: self.player(), destination: &self.destination, debug: self.debug }
    }

    pub fn toggle_show_points(&mut self) {
        self.debug.show_points = !self.debug.show_points;
    }

    pub fn toggle_show_paths(&mut self) {
        self.debug.show_paths = !self.debug.show_paths;
    }

    /// Debug helper: warps to the map point nearest to the given coordinates.
    pub fn teleport(&mut self, position: Vec2) {
        if let Some(point) = self.map.nearest_point(position) {
            let position = point.position;
            self.motion.warp_to(position, self.motion.heading());
        }
    }

    fn destination_name(&self) -> &str {
        self.destination.name.as_deref().unwrap_or("the destination")
    }

    fn initial_heading(&self, position: Vec2) -> f32 {
        match self.map.connections_at(position, self.tolerance).next() {
            Some(connection) => position.heading_to(connection.opposite_end(position, self.tolerance)),
            None => 0.0,
        }
    }
}
