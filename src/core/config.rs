//! Shop configuration loaded from `config/shop.toml`.
use std::{collections::BTreeMap, fs, path::Path};

use bevy::prelude::*;
use serde::Deserialize;

use crate::{dialogue::lines::DialogueLines, npc::patience::PatiencePolicy};

const CONFIG_PATH: &str = "config/shop.toml";

#[derive(Debug, Clone, Deserialize, Default)]
struct RawShopConfig {
    #[serde(default)]
    npc: RawNpcSection,
    #[serde(default)]
    patience: RawPatienceSection,
    #[serde(default)]
    text: RawTextSection,
    #[serde(default)]
    player: RawPlayerSection,
    #[serde(default)]
    dialogue: RawDialogueSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawNpcSection {
    wait_time_at_counter: f32,
    wait_time_jitter: f32,
    item_price: f32,
    price_jitter: f32,
    barter_step: f32,
    walk_speed: f32,
    arrival_epsilon: f32,
    spawn_interval_seconds: f32,
    max_customers: usize,
}

impl Default for RawNpcSection {
    fn default() -> Self {
        Self {
            wait_time_at_counter: 2.0,
            wait_time_jitter: 0.0,
            item_price: 10.0,
            price_jitter: 0.0,
            barter_step: 0.1,
            walk_speed: 2.5,
            arrival_epsilon: 0.1,
            spawn_interval_seconds: 6.0,
            max_customers: 1,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawPatienceSection {
    start_color: [f32; 3],
    end_color: [f32; 3],
    policy: PatiencePolicy,
}

impl Default for RawPatienceSection {
    fn default() -> Self {
        Self {
            start_color: [0.0, 1.0, 0.0],
            end_color: [1.0, 0.0, 0.0],
            policy: PatiencePolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawTextSection {
    seconds_per_char: f32,
    use_typewriter: bool,
}

impl Default for RawTextSection {
    fn default() -> Self {
        Self {
            seconds_per_char: 0.05,
            use_typewriter: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawPlayerSection {
    mouse_sensitivity: f32,
    move_speed: f32,
    acceleration: f32,
    friction: f32,
    interact_range: f32,
    focus_cone_degrees: f32,
}

impl Default for RawPlayerSection {
    fn default() -> Self {
        Self {
            mouse_sensitivity: 0.5,
            move_speed: 5.0,
            acceleration: 10.0,
            friction: 5.0,
            interact_range: 3.0,
            focus_cone_degrees: 20.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawDialogueSection {
    lines: BTreeMap<String, String>,
}

/// Tunables for customers and their walk to the counter.
#[derive(Debug, Clone)]
pub struct NpcSettings {
    pub wait_time_at_counter: f32,
    pub wait_time_jitter: f32,
    pub item_price: f32,
    pub price_jitter: f32,
    pub barter_step: f32,
    pub walk_speed: f32,
    pub arrival_epsilon: f32,
    pub spawn_interval_seconds: f32,
    pub max_customers: usize,
}

#[derive(Debug, Clone)]
pub struct PatienceSettings {
    pub start_color: Color,
    pub end_color: Color,
    pub policy: PatiencePolicy,
}

#[derive(Debug, Clone)]
pub struct TextSettings {
    pub seconds_per_char: f32,
    pub use_typewriter: bool,
}

#[derive(Debug, Clone)]
pub struct PlayerSettings {
    pub mouse_sensitivity: f32,
    pub move_speed: f32,
    pub acceleration: f32,
    pub friction: f32,
    pub interact_range: f32,
    pub focus_cone_degrees: f32,
}

/// Validated shop configuration shared by every plugin.
#[derive(Resource, Debug, Clone)]
pub struct ShopConfig {
    pub npc: NpcSettings,
    pub patience: PatienceSettings,
    pub text: TextSettings,
    pub player: PlayerSettings,
    /// Lines every customer starts with; unknown keys were dropped at load.
    pub dialogue_lines: DialogueLines,
}

impl ShopConfig {
    pub fn load_or_default() -> Self {
        Self::load_from(Path::new(CONFIG_PATH))
    }

    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(data) => Self::from_toml_str(&data).unwrap_or_else(|err| {
                warn!(
                    "Failed to parse {} ({}). Falling back to defaults.",
                    path.display(),
                    err
                );
                RawShopConfig::default().into()
            }),
            Err(err) => {
                warn!(
                    "Failed to read {} ({}). Falling back to defaults.",
                    path.display(),
                    err
                );
                RawShopConfig::default().into()
            }
        }
    }

    pub fn from_toml_str(data: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<RawShopConfig>(data).map(Into::into)
    }
}

impl Default for ShopConfig {
    fn default() -> Self {
        RawShopConfig::default().into()
    }
}

impl From<RawShopConfig> for ShopConfig {
    fn from(value: RawShopConfig) -> Self {
        let npc = value.npc;
        let patience = value.patience;
        let text = value.text;
        let player = value.player;

        let (dialogue_lines, unknown_keys) = DialogueLines::from_config(value.dialogue.lines);
        for key in unknown_keys {
            warn!(
                "Ignoring unknown dialogue key \"{}\" in {}",
                key, CONFIG_PATH
            );
        }

        Self {
            npc: NpcSettings {
                wait_time_at_counter: npc.wait_time_at_counter.max(0.0),
                wait_time_jitter: npc.wait_time_jitter.max(0.0),
                item_price: npc.item_price.max(0.0),
                price_jitter: npc.price_jitter.max(0.0),
                barter_step: npc.barter_step.clamp(0.0, 1.0),
                walk_speed: npc.walk_speed.max(0.1),
                arrival_epsilon: npc.arrival_epsilon.max(0.01),
                spawn_interval_seconds: npc.spawn_interval_seconds.max(0.1),
                max_customers: npc.max_customers,
            },
            patience: PatienceSettings {
                start_color: rgb(patience.start_color),
                end_color: rgb(patience.end_color),
                policy: patience.policy,
            },
            text: TextSettings {
                seconds_per_char: text.seconds_per_char.max(0.0),
                use_typewriter: text.use_typewriter,
            },
            player: PlayerSettings {
                mouse_sensitivity: player.mouse_sensitivity.max(0.0),
                move_speed: player.move_speed.max(0.0),
                acceleration: player.acceleration.max(0.0),
                friction: player.friction.max(0.0),
                interact_range: player.interact_range.max(0.5),
                focus_cone_degrees: player.focus_cone_degrees.clamp(1.0, 90.0),
            },
            dialogue_lines,
        }
    }
}

fn rgb(channels: [f32; 3]) -> Color {
    Color::srgb(
        channels[0].clamp(0.0, 1.0),
        channels[1].clamp(0.0, 1.0),
        channels[2].clamp(0.0, 1.0),
    )
}
