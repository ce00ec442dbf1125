#![allow(dead_code)]

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;

use pairsearch::{ExclusionTable, Frame, Matrix3, Particle, ParticleSet, UnitCell, Vector3D};

fn read_vector(value: &Value) -> Vector3D {
    let array = value.as_array().expect("vectors must be arrays");
    Vector3D::new(
        array[0].as_f64().expect("vector components must be numbers"),
        array[1].as_f64().expect("vector components must be numbers"),
        array[2].as_f64().expect("vector components must be numbers"),
    )
}

/// Load the frame with the given `name` from `tests/data/frames.json`.
/// Particles ids are given by their position in the file.
pub fn load_frame(name: &str) -> Frame {
    let json = std::fs::read_to_string("tests/data/frames.json")
        .expect("failed to read input file");
    let data: Value = serde_json::from_str(&json).expect("failed to parse JSON");
    let data = &data[name];

    let cell = data["cell"].as_array().expect("cell must be an array");
    let matrix = Matrix3::new([
        *read_vector(&cell[0]).as_array(),
        *read_vector(&cell[1]).as_array(),
        *read_vector(&cell[2]).as_array(),
    ]);
    let mut frame = Frame::new(UnitCell::from_matrix(matrix).expect("invalid cell"));

    let particles = data["particles"].as_array().expect("particles must be an array");
    for (id, particle) in particles.iter().enumerate() {
        let particle_type = particle["type"].as_str().expect("type must be a string");
        let mut new = Particle::new(id, particle_type)
            .with_position(read_vector(&particle["position"]));

        if let Some(name) = particle["name"].as_str() {
            new = new.with_name(name);
        }

        if let Some(molecule) = particle["molecule"].as_u64() {
            new = new.with_molecule(molecule as usize);
        }

        frame.add_particle(new).unwrap();
    }

    for bond in data["bonds"].as_array().expect("bonds must be an array") {
        let first = bond[0].as_u64().expect("bonds must contain integers") as usize;
        let second = bond[1].as_u64().expect("bonds must contain integers") as usize;
        frame.add_bond(first, second).unwrap();
    }

    return frame;
}

/// Create a frame with `count` particles at random positions, using the
/// same seed gives the same frame. Particles are grouped by three in linear
/// molecules, with types "A", "B" and "C". For periodic cells, positions are
/// scattered around the cell and some particles are outside of it, to check
/// that periodic images are handled by the search.
pub fn scattered_frame(cell: UnitCell, count: usize, seed: u64) -> Frame {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut frame = Frame::new(cell);
    for id in 0..count {
        let fractional = Vector3D::new(rng.gen(), rng.gen(), rng.gen());
        let position = if cell.is_infinite() {
            fractional * 10.0
        } else {
            // some particles are outside of the cell
            cell.cartesian(fractional * 1.5 - Vector3D::new(0.25, 0.25, 0.25))
        };

        let particle_type = ["A", "B", "C"][id % 3];
        frame.add_particle(Particle::new(id, particle_type).with_molecule(id / 3).with_position(position)).unwrap();
        if id % 3 != 0 {
            frame.add_bond(id - 1, id).unwrap();
        }
    }

    return frame;
}

/// Reference O(N^2) implementation of the neighbor search, returning the
/// sorted ids of all the pairs within `cutoff`, not excluded and accepted by
/// `accept`.
pub fn reference_pairs(
    first: &ParticleSet,
    second: &ParticleSet,
    cutoff: f64,
    exclusions: Option<&ExclusionTable>,
    accept: impl Fn(&Particle, &Particle) -> bool,
) -> BTreeSet<(usize, usize)> {
    let cell = first.cell();

    let mut pairs = BTreeSet::new();
    for a in first.iter() {
        for b in second.iter() {
            if a.id() == b.id() {
                continue;
            }

            let distance = cell.distance(a.position().unwrap(), b.position().unwrap());
            if distance > cutoff {
                continue;
            }

            if exclusions.map_or(false, |table| table.is_excluded(a.id(), b.id())) {
                continue;
            }

            if accept(a, b) {
                pairs.insert((usize::min(a.id(), b.id()), usize::max(a.id(), b.id())));
            }
        }
    }

    return pairs;
}

/// Get the sorted set of ids in a registry
pub fn pair_ids<P>(registry: &pairsearch::PairRegistry<P>) -> BTreeSet<(usize, usize)> {
    registry.pairs().map(|(ids, _)| ids).collect()
}
