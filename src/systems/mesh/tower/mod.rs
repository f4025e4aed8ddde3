// this is the pure synthesis core: everything in here is plain data and
// functions, no ECS access, so it stays testable without an App

use bevy::prelude::*;

pub mod lod;
pub mod noise;
pub mod ornaments;
pub mod params;
pub mod profile;
pub mod synth;
pub mod tiers;

// my 2d polygon datatype
// abstraction of meshes allows for easier geometric manipulation
pub type Polygon = Vec<Vec2>;

// what a node's shape is for; consumers filter on this instead of
// re-deriving categories from geometry
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Part {
    Ground,
    Plinth,
    Base,
    Door,
    Tier,
    Cornice,
    Column,
    Pilaster,
    Niche,
    Stripe,
    Statue,
    Bead,
    MiniShrine,
    Finial,
    Wall,
}

#[derive(Clone, Debug)]
pub enum ShapeKind {
    // profile-fitted extrusion, footprint in the local XZ plane, extruded +Y
    Prism { footprint: Polygon, height: f32 },
    Box { size: Vec3 },
    Cylinder { radius: f32, height: f32 },
    Cone { radius: f32, height: f32 },
    Sphere { radius: f32 },
}

#[derive(Clone, Debug)]
pub struct ShapeSpec {
    pub kind: ShapeKind,
    pub color: usize, // palette index, wrapped modulo PALETTE_SIZE at material time
    pub part: Part,
}

// output tree node; the synthesizer exclusively owns the tree and
// consumers only walk it
#[derive(Clone, Debug)]
pub struct GeometryNode {
    pub transform: Transform,
    pub shape: Option<ShapeSpec>,
    pub children: Vec<GeometryNode>,
}

impl GeometryNode {
    pub fn group(transform: Transform) -> Self {
        Self { transform, shape: None, children: Vec::new() }
    }

    pub fn shape(transform: Transform, kind: ShapeKind, color: usize, part: Part) -> Self {
        Self {
            transform,
            shape: Some(ShapeSpec { kind, color, part }),
            children: Vec::new(),
        }
    }

    pub fn push(&mut self, child: GeometryNode) {
        self.children.push(child);
    }

    /// Walk the whole tree depth-first, shapes only.
    pub fn visit_shapes<'a>(&'a self, f: &mut impl FnMut(&'a ShapeSpec)) {
        if let Some(spec) = &self.shape {
            f(spec);
        }
        for child in &self.children {
            child.visit_shapes(f);
        }
    }

    pub fn count_part(&self, part: Part) -> usize {
        let mut n = 0;
        self.visit_shapes(&mut |spec| {
            if spec.part == part {
                n += 1;
            }
        });
        n
    }
}
