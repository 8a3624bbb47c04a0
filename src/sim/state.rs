//! Session state: the player, POIs, obstacles, and the per-level machine
//!
//! One `LevelSession` owns everything the tick loop mutates. Construction and
//! `reset` are the only places state is seeded from the config, so a mid-run
//! reset restores exactly the starting conditions (obstacle geometry excepted;
//! the world does not move).

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::level::{LevelConfig, SurvivalRule};

use super::aabb::Aabb;
use super::hazard::Hazard;
use super::timers::{Deferred, EventToken, Scheduler, TimerBank};

/// Where the level loop currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelPhase {
    /// Narrative screen up, simulation idle
    Intro,
    /// Normal play
    Active,
    /// Death sequence running, reset countdown armed
    Dying,
    /// Frozen by the pause key
    Paused,
    /// All items collected; waiting for the host to swap levels
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoiKind {
    Item,
    Chest,
}

/// A point of interest seeded from the level config
#[derive(Debug, Clone)]
pub struct Poi {
    pub id: usize,
    pub kind: PoiKind,
    pub position: Vec3,
    pub radius: f32,
    pub consumed: bool,
    /// Narrative text shown when an item is collected
    pub payload: String,
    /// Cosmetic spin angle, advanced while unconsumed
    pub spin: f32,
    /// Per-POI ambience cue guard, cleared only by reset
    pub hum_played: bool,
}

/// The player
#[derive(Debug, Clone)]
pub struct Actor {
    pub position: Vec3,
    /// Snap angle from the last attempted movement direction
    pub facing: f32,
    /// Mouse-driven light aim, unbounded accumulation
    pub aim: f32,
    pub half_extents: Vec3,
}

impl Actor {
    pub fn bounding_box(&self) -> Aabb {
        Aabb::from_center_half_extents(self.position, self.half_extents)
    }

    pub fn bounding_box_at(&self, position: Vec3) -> Aabb {
        Aabb::from_center_half_extents(position, self.half_extents)
    }
}

/// Capped append-only pools of collision volumes
///
/// Geometry streams in as the host loads assets; gameplay never mutates it
/// and a level reset keeps it.
#[derive(Debug, Clone, Default)]
pub struct ObstacleSet {
    walls: Vec<Aabb>,
    chest_hulls: Vec<Aabb>,
}

impl ObstacleSet {
    pub fn add_walls(&mut self, volumes: impl IntoIterator<Item = Aabb>) {
        for volume in volumes {
            if self.walls.len() >= WALL_VOLUME_CAP {
                log::warn!("wall volume pool full ({WALL_VOLUME_CAP}), dropping volume");
                return;
            }
            self.walls.push(volume);
        }
    }

    pub fn add_chest_hulls(&mut self, volumes: impl IntoIterator<Item = Aabb>) {
        for volume in volumes {
            if self.chest_hulls.len() >= CHEST_VOLUME_CAP {
                log::warn!("chest volume pool full ({CHEST_VOLUME_CAP}), dropping volume");
                return;
            }
            self.chest_hulls.push(volume);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.walls.is_empty() && self.chest_hulls.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Aabb> {
        self.walls.iter().chain(self.chest_hulls.iter())
    }
}

/// Scripted jump-then-fall after the trapped floor opens
#[derive(Debug, Clone)]
pub struct FallState {
    pub jump_speed: f32,
    pub fall_speed: f32,
}

impl FallState {
    pub fn new() -> Self {
        Self {
            jump_speed: FALL_JUMP_SPEED,
            fall_speed: 0.0,
        }
    }

    /// One tick of the fall: a short decelerating hop, then accelerating drop
    pub fn advance(&mut self, position: &mut Vec3) {
        if self.jump_speed > 0.0 {
            position.y += self.jump_speed;
            self.jump_speed -= FALL_GRAVITY;
        } else {
            self.fall_speed += FALL_GRAVITY;
            position.y -= self.fall_speed;
        }
    }
}

impl Default for FallState {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot outputs for the host's renderer / audio / UI layers
///
/// Drained by `take_events`; the core never interprets these itself.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    IntroShown(String),
    IntroHidden,
    WallBump,
    FootstepsStarted,
    FootstepsStopped,
    ItemCollected { id: usize },
    ChestOpened { id: usize },
    /// First approach to any item, re-armable
    ItemHum,
    /// First approach to a specific chest this run
    ChestHum { id: usize },
    HazardHit { hazard: usize },
    HeartLost { hearts_left: u8 },
    /// The trapped floor opened; host swaps the map mesh
    FloorOpened,
    DeathStarted,
    DeathPopup,
    LevelReset,
    LevelCompleted { next_level: usize },
}

/// Per-tick UI derivations
#[derive(Debug, Clone, PartialEq)]
pub struct UiSignals {
    /// Darkness overlay strength in [0, 1]
    pub vignette: f32,
    /// True while standing at an interactable POI
    pub interact_prompt: bool,
    pub message: Option<String>,
}

/// All mutable state for one level run
#[derive(Debug, Clone)]
pub struct LevelSession {
    pub config: LevelConfig,
    pub phase: LevelPhase,
    pub actor: Actor,
    pub pois: Vec<Poi>,
    pub hazards: Vec<Hazard>,
    pub obstacles: ObstacleSet,
    pub timers: TimerBank,
    pub scheduler: Scheduler,
    /// Minimap trail, world positions divided by the level trail scale
    pub trail: Vec<Vec3>,
    pub hearts: u8,
    pub collected: usize,
    pub message: Option<String>,
    pub hide_message_token: Option<EventToken>,
    /// Item hum fires when armed; re-armed by the scheduler
    pub item_hum_armed: bool,
    pub at_item: Option<usize>,
    pub at_chest: Option<usize>,
    pub fall: Option<FallState>,
    pub death_sound_played: bool,
    pub death_popup_scheduled: bool,
    pub last_hazard_hit: Option<u64>,
    pub time_ticks: u64,
    pub was_moving: bool,
    pub rng: Pcg32,
    pub seed: u64,
    pub events: Vec<SessionEvent>,
    /// Set on completion; the host reads it to load the next level
    pub pending_level: Option<usize>,
}

impl LevelSession {
    pub fn new(config: LevelConfig, seed: u64) -> Self {
        let phase = if config.intro_text.is_some() {
            LevelPhase::Intro
        } else {
            LevelPhase::Active
        };
        let hearts = match config.survival {
            SurvivalRule::Hearts { start, .. } => start,
            SurvivalRule::Flashlight => 0,
        };
        let mut session = Self {
            phase,
            actor: Actor {
                position: config.spawn,
                facing: 0.0,
                aim: 0.0,
                half_extents: config.actor_half_extents,
            },
            pois: Vec::new(),
            hazards: Vec::new(),
            obstacles: ObstacleSet::default(),
            timers: TimerBank::from_defaults(&config.timer_defaults),
            scheduler: Scheduler::default(),
            trail: Vec::new(),
            hearts,
            collected: 0,
            message: None,
            hide_message_token: None,
            item_hum_armed: true,
            at_item: None,
            at_chest: None,
            fall: None,
            death_sound_played: false,
            death_popup_scheduled: false,
            last_hazard_hit: None,
            time_ticks: 0,
            was_moving: false,
            rng: Pcg32::seed_from_u64(seed),
            seed,
            events: Vec::new(),
            pending_level: None,
            config,
        };
        session.seed_world();
        session
    }

    fn seed_world(&mut self) {
        self.pois.clear();
        let mut id = 0;
        for item in &self.config.items {
            self.pois.push(Poi {
                id,
                kind: PoiKind::Item,
                position: item.position,
                radius: self.config.item_radius,
                consumed: false,
                payload: item.description.clone(),
                spin: 0.0,
                hum_played: false,
            });
            id += 1;
        }
        for chest in &self.config.chests {
            self.pois.push(Poi {
                id,
                kind: PoiKind::Chest,
                position: chest.position,
                radius: self.config.chest_radius,
                consumed: false,
                payload: String::new(),
                spin: 0.0,
                hum_played: false,
            });
            id += 1;
        }
        self.hazards = self.config.hazards.iter().map(Hazard::from_def).collect();
    }

    /// Full restart of the run; obstacle geometry is kept
    pub fn reset(&mut self) {
        log::info!("level reset: {}", self.config.name);
        self.actor.position = self.config.spawn;
        self.actor.facing = 0.0;
        self.actor.aim = 0.0;
        self.seed_world();
        self.timers = TimerBank::from_defaults(&self.config.timer_defaults);
        self.scheduler.clear();
        self.trail.clear();
        self.hearts = match self.config.survival {
            SurvivalRule::Hearts { start, .. } => start,
            SurvivalRule::Flashlight => 0,
        };
        self.collected = 0;
        self.message = None;
        self.hide_message_token = None;
        self.item_hum_armed = true;
        self.at_item = None;
        self.at_chest = None;
        self.fall = None;
        self.death_sound_played = false;
        self.death_popup_scheduled = false;
        self.last_hazard_hit = None;
        self.was_moving = false;
        self.pending_level = None;
        self.phase = LevelPhase::Active;
    }

    /// Show a message and arm its hide one-shot, superseding any pending one
    pub fn show_message(&mut self, text: String, ticks: u64) {
        if let Some(token) = self.hide_message_token.take() {
            self.scheduler.cancel(token);
        }
        self.message = Some(text);
        self.hide_message_token =
            Some(self.scheduler.schedule(self.time_ticks, ticks, Deferred::HideMessage));
    }

    pub fn vignette_intensity(&self) -> f32 {
        (1.0 - self.timers.darkness.value() / DARKNESS_FULL).clamp(0.0, 1.0)
    }

    pub fn ui_signals(&self) -> UiSignals {
        UiSignals {
            vignette: self.vignette_intensity(),
            interact_prompt: self.at_item.is_some() || self.at_chest.is_some(),
            message: self.message.clone(),
        }
    }

    pub fn elapsed_secs(&self) -> f32 {
        crate::ticks_to_secs(self.time_ticks)
    }

    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }
}
