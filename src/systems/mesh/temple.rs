// walks a synthesized geometry tree and realizes it as the entity
// hierarchy the renderer consumes. Also owns disposal: the previous
// complex's meshes and materials are released explicitly before the
// entities go away, so repeated live edits never pile up assets.

use bevy::prelude::*;

use crate::config;
use crate::systems::mesh::mesh_gen;
use crate::systems::mesh::tower::{GeometryNode, Part, ShapeSpec};

// root marker for one spawned complex
#[derive(Component)]
pub struct Temple {
    pub seed: u64,
}

// asset handles owned by the currently displayed complex
#[derive(Resource, Default)]
pub struct TempleAssets {
    pub meshes: Vec<Handle<Mesh>>,
    pub materials: Vec<Handle<StandardMaterial>>,
}

fn material_for(spec: &ShapeSpec) -> StandardMaterial {
    let [r, g, b] = config::PALETTE[spec.color % config::PALETTE_SIZE];
    let base_color = match spec.part {
        Part::Door => Color::srgb(0.09, 0.05, 0.03),
        Part::Niche => Color::srgb(r * 0.45, g * 0.45, b * 0.45),
        Part::Finial => Color::srgb(0.92, 0.78, 0.34),
        Part::Ground => Color::srgb(0.35, 0.40, 0.29),
        Part::Wall => Color::srgb(r * 0.7, g * 0.7, b * 0.72),
        _ => Color::srgb(r, g, b),
    };
    StandardMaterial {
        base_color,
        perceptual_roughness: 0.92,
        alpha_mode: AlphaMode::Opaque,
        ..default()
    }
}

/// Spawns the entity tree for one synthesized complex.
pub fn spawn_temple(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    tracked: &mut TempleAssets,
    tree: &GeometryNode,
    seed: u64,
) {
    let root = spawn_node(commands, meshes, materials, tracked, tree);
    commands.entity(root).insert(Temple { seed });
}

fn spawn_node(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    tracked: &mut TempleAssets,
    node: &GeometryNode,
) -> Entity {
    let entity = if let Some(spec) = &node.shape {
        let mesh_handle = meshes.add(mesh_gen::shape_to_mesh(&spec.kind));
        let material_handle = materials.add(material_for(spec));
        tracked.meshes.push(mesh_handle.clone());
        tracked.materials.push(material_handle.clone());
        commands
            .spawn((
                Mesh3d(mesh_handle),
                MeshMaterial3d(material_handle),
                node.transform,
                Visibility::Visible,
            ))
            .id()
    } else {
        commands.spawn((node.transform, Visibility::Visible)).id()
    };

    let children: Vec<Entity> = node
        .children
        .iter()
        .map(|child| spawn_node(commands, meshes, materials, tracked, child))
        .collect();
    if !children.is_empty() {
        commands.entity(entity).add_children(&children);
    }
    entity
}

/// Frees the displayed complex: assets first, then the entity tree.
pub fn release_temple(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    tracked: &mut TempleAssets,
    roots: &Query<Entity, With<Temple>>,
) {
    for handle in tracked.meshes.drain(..) {
        meshes.remove(&handle);
    }
    for handle in tracked.materials.drain(..) {
        materials.remove(&handle);
    }
    for entity in roots.iter() {
        commands.entity(entity).try_despawn();
    }
}
