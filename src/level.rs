//! Data-driven level configuration
//!
//! Everything that varies between the three afterlife levels lives in a
//! `LevelConfig` record: spawn point, movement tuning, POI seeds, hazard
//! patrols, timer defaults, and which chest effect the level uses. The
//! presets below carry the shipped coordinates and flavor text; custom
//! levels can be authored as JSON.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// What interacting with a chest does in a given level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChestEffect {
    /// Refill the flashlight charge and bounce light
    RechargeLight,
    /// Restore one heart and show the chest message
    ///
    /// Chests with this effect are deliberately never consumed; standing
    /// near one lets the player farm hearts across drain cycles. Observed
    /// shipped behavior, kept as-is (see DESIGN.md).
    RestoreHeart,
    /// Swap the floor for its trapped variant and drop the player through
    OpenFloor,
}

/// How the survival resource depletes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SurvivalRule {
    /// Darkness accrues while the flashlight charge is below threshold
    Flashlight,
    /// Hearts drain on a fixed interval and on hazard contact
    Hearts { start: u8, drain_interval_ticks: u64 },
}

/// A collectible item seed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDef {
    pub position: Vec3,
    /// Narrative text shown for 10 s on collection
    pub description: String,
}

/// A chest seed
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChestDef {
    pub position: Vec3,
}

/// A patrolling hazard seed (ghost, angel)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HazardDef {
    pub start: Vec3,
    pub end: Vec3,
    /// Contact radius against the player (planar)
    pub radius: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    pub acceleration: f32,
}

/// Initial values for the flashlight/darkness timer bank
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TimerDefaults {
    pub charge: f32,
    pub bounce: f32,
    pub darkness: f32,
}

impl Default for TimerDefaults {
    fn default() -> Self {
        Self {
            charge: CHARGE_FULL,
            bounce: BOUNCE_FULL,
            darkness: DARKNESS_FULL,
        }
    }
}

/// Plain record describing one level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelConfig {
    pub name: String,
    pub spawn: Vec3,
    pub move_speed: f32,
    /// Player hull half extents, used to rebuild the AABB every tick
    pub actor_half_extents: Vec3,
    /// Collisions are ignored while the player's planar position is within
    /// this distance of the origin on both axes (spawn safe zone)
    pub safe_zone_half_extent: f32,
    /// Divisor applied to world coordinates before trail points land on the
    /// minimap
    pub trail_scale: f32,
    pub item_radius: f32,
    pub chest_radius: f32,
    pub chest_effect: ChestEffect,
    /// Message shown when a chest fires (hearts variant only in the presets)
    pub chest_message: Option<String>,
    pub survival: SurvivalRule,
    /// Narrative screen shown on the first tick, hidden after 25 s
    pub intro_text: Option<String>,
    pub items: Vec<ItemDef>,
    pub chests: Vec<ChestDef>,
    pub hazards: Vec<HazardDef>,
    pub timer_defaults: TimerDefaults,
    /// Level index the completion transition requests
    pub next_level: usize,
}

impl LevelConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Level 0: flashlight survival against the heat
    pub fn inferno() -> Self {
        Self {
            name: "inferno".into(),
            spawn: Vec3::ZERO,
            move_speed: 0.75,
            actor_half_extents: Vec3::new(4.0, 10.0, 4.0),
            safe_zone_half_extent: 30.0,
            trail_scale: 20.0,
            item_radius: 30.0,
            chest_radius: 30.0,
            chest_effect: ChestEffect::RechargeLight,
            chest_message: None,
            survival: SurvivalRule::Flashlight,
            intro_text: Some(
                "Black. Your vision is consumed by an inescapable darkness - though \
                 your body is gifted no such absence.\n\
                 There is a pervasive heat that you feel beyond your skin, as though \
                 your innards are in a constant cycle of melting and reconstruction.\n\n\
                 The abyss fades; the scalding caresse of the inferno does not.\n\n\
                 \u{201c}Where\u{2026} am I?\u{201d}\n\n\
                 You wish your confusion was confined to your location. You know nothing.\n\
                 Who are you? How did you get here?\n\n\
                 There is but one thing that you know to be certain: you cannot let the \
                 darkness grab hold of you."
                    .into(),
            ),
            items: vec![
                ItemDef {
                    position: Vec3::new(-400.0, -2.0, -100.0),
                    description: "A contract with the following text:\n\"...all earthly \
                                  possessions and the signatory\u{2019}s soul enter the sole \
                                  possession of\u{2026}\"\nThe rest is illegible."
                        .into(),
                },
                ItemDef {
                    position: Vec3::new(-400.0, 0.0, 100.0),
                    description: "Iron chains with a light blue tint.\nThe metal is ice cold \
                                  and makes me feel empty.\n...were these mine?"
                        .into(),
                },
                ItemDef {
                    position: Vec3::new(400.0, -25.0, -600.0),
                    description: "Was this my old dagger?\nI don\u{2019}t remember where I put \
                                  it.\n...how did it get here?"
                        .into(),
                },
            ],
            chests: vec![
                ChestDef { position: Vec3::new(127.0, 0.0, -733.0) },
                ChestDef { position: Vec3::new(336.0, 0.0, 230.0) },
                ChestDef { position: Vec3::new(435.0, 0.0, -172.0) },
                ChestDef { position: Vec3::new(-672.0, 0.0, -134.0) },
                ChestDef { position: Vec3::new(-375.0, 0.0, 315.0) },
            ],
            hazards: Vec::new(),
            timer_defaults: TimerDefaults::default(),
            next_level: 1,
        }
    }

    /// Level 1: hearts drain over time, ghosts patrol, chests restore
    pub fn purgatorio() -> Self {
        Self {
            name: "purgatorio".into(),
            spawn: Vec3::ZERO,
            move_speed: 0.75,
            actor_half_extents: Vec3::new(4.0, 10.0, 4.0),
            safe_zone_half_extent: 30.0,
            trail_scale: 15.0,
            item_radius: 50.0,
            chest_radius: 50.0,
            chest_effect: ChestEffect::RestoreHeart,
            chest_message: Some("You found a chest! +1 Life".into()),
            survival: SurvivalRule::Hearts { start: 5, drain_interval_ticks: 1800 },
            intro_text: Some(
                "Retrieving the third of these forsaken items, you find that the black \
                 abyss grows in size; drowning out the light with which you ran from it.\n\n\
                 Before you, in the inky void, there lies a form - one more human than you \
                 thought you would find here. You step closer, and\u{2026}\n\
                 No\u{2026} Could it be?\n\n\
                 You reach out.\n\
                 \u{201c}Liora? No!\u{201d}\n\
                 She is whisked away, consumed by the black.\n\n\
                 Your vision begins to clear, but you find that the infernal heat is no \
                 more. Instead, you are surrounded by an overwhelming melancholy, leaving \
                 a palpable weight surrounding your body.\n\n\
                 Is this\u{2026} No, it can\u{2019}t be."
                    .into(),
            ),
            items: vec![
                ItemDef {
                    position: Vec3::new(-96.0, 0.0, -1208.0),
                    description: "A single metallic tear with a blue shine.\nOn the side is \
                                  the initial L inscribed.\nIs this\n...for me?"
                        .into(),
                },
                ItemDef {
                    position: Vec3::new(-700.0, 0.0, -396.0),
                    description: "A silver mirror but the glass is broken.\nIs this how \
                                  Narcissus felt when it was all over?"
                        .into(),
                },
                ItemDef {
                    position: Vec3::new(92.0, 0.0, -584.0),
                    description: "An ornate silver key with a lace tag reading \u{201c}Mine \
                                  now.\u{201d}\nThis is the key for Liora\u{2019}s Music \
                                  Box.\nIs that my handwriting on the tag?"
                        .into(),
                },
            ],
            chests: vec![
                ChestDef { position: Vec3::new(-324.0, 0.0, -1212.0) },
                ChestDef { position: Vec3::new(-756.0, 0.0, -668.0) },
                ChestDef { position: Vec3::new(628.0, 0.0, -728.0) },
            ],
            hazards: vec![
                ghost_patrol(Vec3::new(-776.0, 0.0, -624.0)),
                ghost_patrol(Vec3::new(-276.0, 0.0, -1192.0)),
                ghost_patrol(Vec3::new(592.0, 0.0, -716.0)),
            ],
            timer_defaults: TimerDefaults::default(),
            next_level: 2,
        }
    }

    /// Level 2: bright, but one chest opens the floor
    pub fn paradiso() -> Self {
        Self {
            name: "paradiso".into(),
            spawn: Vec3::ZERO,
            move_speed: 1.25,
            actor_half_extents: Vec3::new(4.0, 4.0, 4.0),
            safe_zone_half_extent: 10.0,
            trail_scale: 15.0,
            item_radius: 30.0,
            chest_radius: 30.0,
            chest_effect: ChestEffect::OpenFloor,
            chest_message: None,
            survival: SurvivalRule::Flashlight,
            intro_text: None,
            items: vec![
                ItemDef {
                    position: Vec3::new(125.0, 0.0, 300.0),
                    description: "A single metallic tear with a blue shine.\nOn the side is \
                                  the initial L inscribed.\nIs this\n...for me?"
                        .into(),
                },
                ItemDef {
                    position: Vec3::new(-420.0, 0.0, -238.0),
                    description: "My Heart!!!!!!!!!!!!!!!!!!!!!!!!!!!!".into(),
                },
                ItemDef {
                    position: Vec3::new(55.0, 0.0, -350.0),
                    description: "An ornate silver key with a lace tag reading \u{201c}Mine \
                                  now.\u{201d}\nThis is the key for Liora\u{2019}s Music \
                                  Box.\nIs that my handwriting on the tag?"
                        .into(),
                },
            ],
            chests: vec![
                ChestDef { position: Vec3::new(190.0, 0.0, 135.0) },
                ChestDef { position: Vec3::new(250.0, 0.0, -100.0) },
                ChestDef { position: Vec3::new(90.0, 0.0, -420.0) },
                ChestDef { position: Vec3::new(-400.0, 0.0, -60.0) },
                ChestDef { position: Vec3::new(-140.0, 0.0, 125.0) },
            ],
            hazards: vec![HazardDef {
                start: Vec3::new(300.0, 0.0, 300.0),
                end: Vec3::new(-300.0, 0.0, -300.0),
                radius: 20.0,
                min_speed: 0.1,
                max_speed: 2.0,
                acceleration: 0.05,
            }],
            timer_defaults: TimerDefaults { bounce: 0.0, ..TimerDefaults::default() },
            next_level: 1,
        }
    }
}

/// Ghost patrol: a short bounce through the ghost's original post
fn ghost_patrol(post: Vec3) -> HazardDef {
    HazardDef {
        start: post - Vec3::new(0.0, 0.0, 60.0),
        end: post + Vec3::new(0.0, 0.0, 60.0),
        radius: 10.0,
        min_speed: 0.1,
        max_speed: 2.0,
        acceleration: 0.05,
    }
}

/// Number of shipped levels
pub const LEVEL_COUNT: usize = 3;

/// Look up a shipped level by traversal index
///
/// Out-of-range indices clamp to the last level rather than failing; a bad
/// jump should never stall the loop.
pub fn level_by_index(index: usize) -> LevelConfig {
    if index >= LEVEL_COUNT {
        log::warn!("level index {} out of range, clamping to {}", index, LEVEL_COUNT - 1);
    }
    match index {
        0 => LevelConfig::inferno(),
        1 => LevelConfig::purgatorio(),
        _ => LevelConfig::paradiso(),
    }
}
