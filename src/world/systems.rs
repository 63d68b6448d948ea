//! Systems for the world module.
use bevy::{math::primitives::Plane3d, prelude::*};

use crate::world::components::{PrimarySun, ShopCounter, ShopLayout};

const FLOOR_SCALE: f32 = 30.0;
const COUNTER_SIZE: Vec3 = Vec3::new(4.0, 1.0, 1.0);
const DOOR_SIZE: Vec3 = Vec3::new(1.6, 2.6, 0.1);

/// Spawns the shop: floor, counter, door frame and lighting.
pub fn spawn_shop_environment(
    mut commands: Commands,
    layout: Res<ShopLayout>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Mesh3d(meshes.add(Mesh::from(Plane3d::default()))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb_u8(120, 96, 70),
            perceptual_roughness: 0.9,
            metallic: 0.0,
            ..default()
        })),
        Transform::from_scale(Vec3::splat(FLOOR_SCALE)),
        Name::new("Shop Floor"),
    ));

    commands.spawn((
        Mesh3d(meshes.add(Mesh::from(Cuboid::from_size(COUNTER_SIZE)))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb_u8(92, 60, 38),
            perceptual_roughness: 0.7,
            ..default()
        })),
        Transform::from_translation(layout.counter),
        ShopCounter,
        Name::new("Counter"),
    ));

    commands.spawn((
        Mesh3d(meshes.add(Mesh::from(Cuboid::from_size(DOOR_SIZE)))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb_u8(60, 40, 28),
            ..default()
        })),
        Transform::from_xyz(layout.door.x, DOOR_SIZE.y * 0.5, layout.door.z + 0.6),
        Name::new("Door"),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 12_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(6.0, 12.0, 8.0).looking_at(Vec3::ZERO, Vec3::Y),
        PrimarySun,
    ));

    commands.spawn((
        PointLight {
            intensity: 400_000.0,
            range: 20.0,
            ..default()
        },
        Transform::from_xyz(0.0, 3.5, 0.5),
        Name::new("Counter Lamp"),
    ));
}
