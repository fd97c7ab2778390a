//! Game session: the idle/active state machine and its handlers
//!
//! One `Session` lives for the whole page. Each playthrough runs from `Idle`
//! to the next restart, which rebuilds the world from scratch.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::body::{EntityId, Group, IdAllocator};
use super::camera::{Camera, Continuation};
use super::events::{Contact, GameEvent, Subscriptions};
use super::world::World;
use crate::angle_between;
use crate::tuning::{Tuning, TuningError};

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Waiting for the first click; player pinned in place
    Idle,
    /// Running, collisions live
    Active,
    /// Obstacle hit; fading out toward a restart
    Ending,
}

/// Complete session state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct Session {
    tuning: Tuning,
    phase: GamePhase,
    prompt: String,
    pub world: World,
    pub camera: Camera,
    /// Last known pointer position (world pixels)
    pub pointer: Vec2,
    /// Pointer currently held down
    pub pointer_held: bool,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Completed playthroughs
    pub restarts: u32,
    viewport: Vec2,
    rng: Pcg32,
    ids: IdAllocator,
    subscriptions: Subscriptions,
    events: Vec<GameEvent>,
}

impl Session {
    /// Build the first world and register the session's handlers
    ///
    /// Fails if `tuning` does not pass [`Tuning::validate`].
    pub fn new(seed: u64, viewport: Vec2, tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;

        let mut ids = IdAllocator::default();
        let world = World::build(viewport, &tuning, &mut ids);

        let mut subscriptions = Subscriptions::default();
        subscriptions.on_pointer_down(Session::handle_pointer_down);
        subscriptions.on_pointer_up(Session::handle_pointer_up);
        subscriptions.add_collider(Group::Player, Group::Platforms);
        subscriptions.add_collider(Group::Obstacles, Group::Platforms);
        subscriptions.add_collider(Group::Obstacles, Group::Bushes);
        subscriptions.add_overlap(Group::Player, Group::Obstacles, Session::hit_obstacle);
        subscriptions.add_overlap(Group::Player, Group::Goal, Session::collect_treasure);

        Ok(Self {
            prompt: tuning.prompt.clone(),
            tuning,
            phase: GamePhase::Idle,
            world,
            camera: Camera::default(),
            pointer: Vec2::ZERO,
            pointer_held: false,
            time_ticks: 0,
            restarts: 0,
            viewport,
            rng: Pcg32::seed_from_u64(seed),
            ids,
            subscriptions,
            events: Vec::new(),
        })
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// True from the first click until the next restart
    pub fn is_started(&self) -> bool {
        self.phase != GamePhase::Idle
    }

    /// On-screen instruction (empty while playing)
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn subscriptions(&self) -> &Subscriptions {
        &self.subscriptions
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// New canvas size; the current world keeps its layout until restart
    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.viewport = viewport;
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    // === Handlers ===

    /// Pointer pressed: first press starts the session, every press runs right
    pub fn handle_pointer_down(&mut self, pos: Vec2) {
        self.pointer = pos;
        self.pointer_held = true;
        if self.phase == GamePhase::Idle {
            self.start();
        }
        self.world.player.vel.x = self.tuning.player_speed;
    }

    /// Pointer released: stop
    pub fn handle_pointer_up(&mut self, pos: Vec2) {
        self.pointer = pos;
        self.pointer_held = false;
        self.world.player.vel.x = 0.0;
    }

    /// Player ran into an obstacle: shake, fade, restart after the fade
    pub fn hit_obstacle(&mut self, contact: Contact) {
        if self.phase != GamePhase::Active {
            return;
        }
        self.phase = GamePhase::Ending;
        log::info!("Hit obstacle {:?}", contact.b);
        self.emit(GameEvent::ObstacleHit { obstacle: contact.b });

        let shake = self.tuning.shake_duration();
        if self.camera.shake(shake, self.tuning.shake_intensity) {
            self.emit(GameEvent::ShakeStarted { duration: shake });
        }
        let fade = self.tuning.fade_duration();
        if self
            .camera
            .fade_out(fade, self.tuning.fade_rgba(), Some(Continuation::Restart))
        {
            self.emit(GameEvent::FadeStarted { duration: fade });
        }
    }

    /// Player reached the treasure: notify and restart immediately
    pub fn collect_treasure(&mut self, _contact: Contact) {
        if self.phase != GamePhase::Active {
            return;
        }
        log::info!("Treasure found after {} ticks", self.time_ticks);
        let message = self.tuning.treasure_message.clone();
        self.emit(GameEvent::TreasureFound { message });
        self.restart();
    }

    fn start(&mut self) {
        self.phase = GamePhase::Active;
        self.prompt.clear();
        log::info!("Session started");
        self.emit(GameEvent::Started);
    }

    /// Back to idle with a freshly built world
    pub fn restart(&mut self) {
        self.phase = GamePhase::Idle;
        self.prompt = self.tuning.prompt.clone();
        self.camera = Camera::default();
        self.world = World::build(self.viewport, &self.tuning, &mut self.ids);
        self.restarts += 1;
        log::info!("Restarted (playthrough {})", self.restarts + 1);
        self.emit(GameEvent::Restarted);
    }

    /// Run a fade continuation
    pub(crate) fn resume(&mut self, continuation: Continuation) {
        match continuation {
            Continuation::Restart => self.restart(),
        }
    }

    // === Dispatch ===

    pub(crate) fn dispatch_pointer_down(&mut self, pos: Vec2) {
        for i in 0..self.subscriptions.pointer_down().len() {
            let handler = self.subscriptions.pointer_down()[i];
            handler(self, pos);
        }
    }

    pub(crate) fn dispatch_pointer_up(&mut self, pos: Vec2) {
        for i in 0..self.subscriptions.pointer_up().len() {
            let handler = self.subscriptions.pointer_up()[i];
            handler(self, pos);
        }
    }

    pub(crate) fn run_colliders(&mut self) {
        for i in 0..self.subscriptions.colliders().len() {
            let rule = self.subscriptions.colliders()[i];
            self.world.collide(rule.moving, rule.fixed);
        }
    }

    /// Fire overlap handlers; stops as soon as one ends the session
    pub(crate) fn dispatch_overlaps(&mut self) {
        if self.phase != GamePhase::Active {
            return;
        }
        for i in 0..self.subscriptions.overlaps().len() {
            let rule = self.subscriptions.overlaps()[i];
            for contact in self.world.contacts(rule.a, rule.b) {
                (rule.handler)(self, contact);
                if self.phase != GamePhase::Active {
                    return;
                }
            }
        }
    }

    /// Per-tick policy while started: jittering fall, face the held pointer
    pub(crate) fn update_started(&mut self) {
        if !self.is_started() {
            return;
        }
        if self.pointer_held {
            let player = &mut self.world.player;
            player.rotation = angle_between(player.pos, self.pointer);
        }
        let range = self.tuning.fall_speed_range();
        for obstacle in &mut self.world.obstacles {
            obstacle.vel.y = self.rng.random_range(range.clone()) as f32;
        }
    }

    /// Advance camera effects, running the fade continuation if it fires
    pub(crate) fn update_camera(&mut self, dt: f32) {
        if let Some(continuation) = self.camera.update(dt, self.viewport, &mut self.rng) {
            self.emit(GameEvent::FadeComplete);
            self.resume(continuation);
        }
    }

    /// Whether an entity lives in the current world
    pub fn contains(&self, id: EntityId) -> bool {
        self.world.entity_ids().any(|e| e == id)
    }
}
