use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;
use spade::{ConstrainedDelaunayTriangulation, Point2, Triangulation as _};

use crate::systems::mesh::tower::profile::{point_in_polygon, polygon_area};
use crate::systems::mesh::tower::{Polygon, ShapeKind};

/// Realizes one shape spec as a renderable mesh. Prisms are extruded
/// from their fitted footprint; everything else maps to a bevy primitive.
pub fn shape_to_mesh(kind: &ShapeKind) -> Mesh {
    match kind {
        ShapeKind::Prism { footprint, height } => prism_mesh(footprint, *height),
        ShapeKind::Box { size } => Cuboid::new(size.x, size.y, size.z).into(),
        ShapeKind::Cylinder { radius, height } => Cylinder::new(*radius, *height).into(),
        ShapeKind::Cone { radius, height } => Cone { radius: *radius, height: *height }.into(),
        ShapeKind::Sphere { radius } => Sphere::new(*radius).into(),
    }
}

fn empty_mesh() -> Mesh {
    Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
    )
}

// extrude a footprint polygon (local XZ plane) from y = 0 up to `height`
fn prism_mesh(footprint: &Polygon, height: f32) -> Mesh {
    if footprint.len() < 3 {
        return empty_mesh();
    }

    // walls assume counter-clockwise winding for outward normals
    let mut polygon = footprint.clone();
    if polygon_area(&polygon) < 0.0 {
        polygon.reverse();
    }

    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut uvs = Vec::new();
    let mut indices = Vec::new();

    // walls
    for i in 0..polygon.len() {
        let next = (i + 1) % polygon.len();
        let v1 = polygon[i];
        let v2 = polygon[next];
        let edge = v2 - v1;
        let edge_length = edge.length();
        if edge_length < 1e-6 {
            continue;
        }
        let normal = Vec2::new(edge.y, -edge.x) / edge_length;
        let base_idx = positions.len() as u32;

        // wall quad
        positions.extend([
            [v1.x, 0.0, v1.y],
            [v2.x, 0.0, v2.y],
            [v1.x, height, v1.y],
            [v2.x, height, v2.y],
        ]);

        normals.extend([[normal.x, 0.0, normal.y]; 4]);

        uvs.extend([
            [0.0, 0.0],
            [edge_length, 0.0],
            [0.0, height],
            [edge_length, height],
        ]);

        indices.extend([base_idx, base_idx + 2, base_idx + 1]);
        indices.extend([base_idx + 1, base_idx + 2, base_idx + 3]);
    }

    // caps: the stepped footprints are concave, so a centroid fan is not
    // an option; constrained Delaunay handles any simple outline
    for triangle in cap_triangles(&polygon) {
        push_cap(&mut positions, &mut normals, &mut uvs, &mut indices, triangle, height, true);
        push_cap(&mut positions, &mut normals, &mut uvs, &mut indices, triangle, 0.0, false);
    }

    let mut mesh = empty_mesh();
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

// triangulate the footprint interior, dropping the triangles the
// constrained triangulation produces outside a concave outline
fn cap_triangles(polygon: &Polygon) -> Vec<[Vec2; 3]> {
    let mut cdt: ConstrainedDelaunayTriangulation<Point2<f64>> =
        ConstrainedDelaunayTriangulation::new();

    for i in 0..polygon.len() {
        let a = polygon[i];
        let b = polygon[(i + 1) % polygon.len()];
        cdt.add_constraint_edge(
            Point2::new(a.x as f64, a.y as f64),
            Point2::new(b.x as f64, b.y as f64),
        )
        .ok();
    }

    let mut triangles = Vec::new();
    for face in cdt.inner_faces() {
        let [v1, v2, v3] = face.vertices();
        let tri = [v1.position(), v2.position(), v3.position()]
            .map(|p| Vec2::new(p.x as f32, p.y as f32));
        let centroid = (tri[0] + tri[1] + tri[2]) / 3.0;
        if point_in_polygon(centroid, polygon) {
            triangles.push(tri);
        }
    }
    triangles
}

fn push_cap(
    positions: &mut Vec<[f32; 3]>,
    normals: &mut Vec<[f32; 3]>,
    uvs: &mut Vec<[f32; 2]>,
    indices: &mut Vec<u32>,
    triangle: [Vec2; 3],
    y: f32,
    facing_up: bool,
) {
    let base_idx = positions.len() as u32;
    for v in triangle {
        positions.push([v.x, y, v.y]);
        normals.push([0.0, if facing_up { 1.0 } else { -1.0 }, 0.0]);
        uvs.push([0.0, 0.0]);
    }

    // planar XZ winding: math-CCW comes out facing -Y once mapped to 3D
    let cross = (triangle[1].x - triangle[0].x) * (triangle[2].y - triangle[0].y)
        - (triangle[1].y - triangle[0].y) * (triangle[2].x - triangle[0].x);
    let ccw = cross > 0.0;
    if ccw == facing_up {
        indices.extend([base_idx, base_idx + 2, base_idx + 1]);
    } else {
        indices.extend([base_idx, base_idx + 1, base_idx + 2]);
    }
}
