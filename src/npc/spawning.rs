//! Customer spawner: brings a new buyer or seller through the door now and then.
use std::time::Duration;

use bevy::{math::primitives::Capsule3d, prelude::*};
use rand::Rng;

use crate::{
    core::{
        config::{NpcSettings, ShopConfig},
        plugin::SimulationClock,
    },
    dialogue::lines::DialogueLines,
    portrait::{assembly::FaceLibrary, components::FaceGrid},
    world::components::ShopLayout,
};

use super::{
    components::{Identity, NpcIdGenerator, ShopNpc},
    navigation::NavAgent,
    patience::{PatienceIndicator, PatienceTimer},
    state::NpcBrain,
};

const CUSTOMER_NAMES: [&str; 10] = [
    "Alric", "Bryn", "Cedric", "Dagna", "Elsbeth", "Fenwick", "Greta", "Hollis", "Ingrid", "Jory",
];

const BUYER_COLOR: Color = Color::srgb(0.35, 0.55, 0.85);
const SELLER_COLOR: Color = Color::srgb(0.85, 0.55, 0.3);
const INDICATOR_SIZE: Vec3 = Vec3::new(1.0, 0.12, 0.02);

/// Paces customer arrivals and caps how many are in the shop at once.
#[derive(Resource, Debug)]
pub struct CustomerSpawner {
    timer: Timer,
    max_customers: usize,
    first_pending: bool,
}

impl CustomerSpawner {
    pub fn new(interval_seconds: f32, max_customers: usize) -> Self {
        Self {
            timer: Timer::from_seconds(interval_seconds.max(0.1), TimerMode::Repeating),
            max_customers,
            first_pending: true,
        }
    }

    /// Advances the interval and reports whether a customer should enter now.
    /// The first customer enters immediately.
    pub fn ready(&mut self, delta: Duration, alive: usize) -> bool {
        self.timer.tick(delta);
        if alive >= self.max_customers {
            return false;
        }
        if self.first_pending {
            self.first_pending = false;
            self.timer.reset();
            return true;
        }
        self.timer.just_finished()
    }
}

/// A freshly rolled customer before it is placed in the world.
#[derive(Debug, Clone)]
pub struct CustomerProfile {
    pub name: &'static str,
    pub npc: ShopNpc,
}

/// Role, price and patience drawn around the configured means.
pub fn roll_customer(
    rng: &mut impl Rng,
    settings: &NpcSettings,
    lines: &DialogueLines,
) -> CustomerProfile {
    let wait = settings.wait_time_at_counter
        + rng.gen_range(-settings.wait_time_jitter..=settings.wait_time_jitter);
    let price =
        settings.item_price + rng.gen_range(-settings.price_jitter..=settings.price_jitter);
    let npc = ShopNpc::new(wait.max(0.0), price.max(0.0).round(), rng.gen_bool(0.5))
        .with_barter_step(settings.barter_step)
        .with_lines(lines.clone());

    CustomerProfile {
        name: CUSTOMER_NAMES[rng.gen_range(0..CUSTOMER_NAMES.len())],
        npc,
    }
}

/// Everything a customer needs to walk, wait and talk, minus its visuals.
pub fn customer_bundle(
    identity: Identity,
    npc: ShopNpc,
    spawn: Vec3,
    counter: Vec3,
    walk_speed: f32,
    arrival_epsilon: f32,
) -> impl Bundle {
    let name = Name::new(format!("{} ({})", identity.display_name, identity.id));
    (
        Transform::from_translation(spawn),
        identity,
        npc,
        NpcBrain::new(spawn, Some(counter)).with_arrival_epsilon(arrival_epsilon),
        PatienceTimer::default(),
        NavAgent::new(walk_speed),
        name,
    )
}

/// Spawns a customer with its patience bar whenever the spawner allows.
#[allow(clippy::too_many_arguments)]
pub fn spawn_customers(
    mut commands: Commands,
    clock: Res<SimulationClock>,
    config: Res<ShopConfig>,
    layout: Res<ShopLayout>,
    library: Res<FaceLibrary>,
    mut spawner: ResMut<CustomerSpawner>,
    mut ids: ResMut<NpcIdGenerator>,
    customers: Query<(), With<ShopNpc>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if !spawner.ready(clock.last_scaled_delta(), customers.iter().count()) {
        return;
    }

    let mut rng = rand::thread_rng();
    let profile = roll_customer(&mut rng, &config.npc, &config.dialogue_lines);
    let face = library
        .generate_random_face(&mut rng)
        .unwrap_or_else(|| FaceGrid::random(&mut rng));
    let identity = Identity::new(ids.next_id(), profile.name);

    info!(
        "{} ({}) enters as a {} at {:.0} with {:.1}s of patience",
        identity.display_name,
        identity.id,
        if profile.npc.is_buyer() { "buyer" } else { "seller" },
        profile.npc.item_price,
        profile.npc.wait_time_at_counter()
    );

    let body_color = if profile.npc.is_buyer() {
        BUYER_COLOR
    } else {
        SELLER_COLOR
    };
    let customer = commands
        .spawn((
            customer_bundle(
                identity,
                profile.npc,
                layout.door,
                layout.customer_spot,
                config.npc.walk_speed,
                config.npc.arrival_epsilon,
            ),
            face,
            Mesh3d(meshes.add(Mesh::from(Capsule3d::new(0.3, 1.0)))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: body_color,
                ..default()
            })),
        ))
        .id();

    let material = materials.add(StandardMaterial {
        base_color: config.patience.start_color,
        unlit: true,
        ..default()
    });
    commands.spawn((
        Mesh3d(meshes.add(Mesh::from(Cuboid::from_size(INDICATOR_SIZE)))),
        MeshMaterial3d(material.clone()),
        Transform::from_translation(layout.door),
        Visibility::Hidden,
        PatienceIndicator {
            owner: customer,
            material,
            full_width: 1.0,
        },
        Name::new("Patience Indicator"),
    ));
}
