use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::Vector3D;
use super::{Frame, Particle, UnitCell};

pub fn test_frame(name: &str) -> Frame {
    match name {
        "butane" => get_butane(),
        "water" => get_water(),
        "square" => get_square(),
        _ => panic!("unknown test frame {}", name)
    }
}

/// Two united-atom butane molecules in a cubic box of side 20. The second
/// molecule sits right across the periodic boundary from the first one.
fn get_butane() -> Frame {
    let mut frame = Frame::new(UnitCell::cubic(20.0).unwrap());

    let types = ["CH3", "CH2", "CH2", "CH3"];
    for (i, &particle_type) in types.iter().enumerate() {
        let particle = Particle::new(i, particle_type)
            .with_name(format!("C{}", i + 1))
            .with_molecule(0)
            .with_position(Vector3D::new(1.5 * i as f64, 0.0, 0.0));
        frame.add_particle(particle).unwrap();
    }

    for (i, &particle_type) in types.iter().enumerate() {
        let particle = Particle::new(i + 4, particle_type)
            .with_name(format!("C{}", i + 1))
            .with_molecule(1)
            .with_position(Vector3D::new(19.5, 1.5 * i as f64, 0.0));
        frame.add_particle(particle).unwrap();
    }

    for molecule in 0..2 {
        let start = 4 * molecule;
        frame.add_bond(start, start + 1).unwrap();
        frame.add_bond(start + 1, start + 2).unwrap();
        frame.add_bond(start + 2, start + 3).unwrap();
    }

    return frame;
}

/// Two water molecules, without periodic boundary conditions
fn get_water() -> Frame {
    let mut frame = Frame::new(UnitCell::infinite());

    let shift = Vector3D::new(0.0, 0.0, 2.5);
    for molecule in 0..2 {
        let origin = shift * molecule as f64;
        let start = 3 * molecule;
        frame.add_particle(Particle::new(start, "OW").with_molecule(molecule).with_position(origin)).unwrap();
        frame.add_particle(Particle::new(start + 1, "HW").with_molecule(molecule).with_position(origin + Vector3D::new(0.0, 0.75545, -0.58895))).unwrap();
        frame.add_particle(Particle::new(start + 2, "HW").with_molecule(molecule).with_position(origin + Vector3D::new(0.0, -0.75545, -0.58895))).unwrap();

        frame.add_bond(start, start + 1).unwrap();
        frame.add_bond(start, start + 2).unwrap();
    }

    return frame;
}

/// Four particles at (0, 0, 0), (1, 0, 0), (0, 2, 0) and (5, 5, 5), without
/// periodic boundary conditions
fn get_square() -> Frame {
    let mut frame = Frame::new(UnitCell::infinite());
    let positions = [
        Vector3D::new(0.0, 0.0, 0.0),
        Vector3D::new(1.0, 0.0, 0.0),
        Vector3D::new(0.0, 2.0, 0.0),
        Vector3D::new(5.0, 5.0, 5.0),
    ];

    for (id, position) in positions.into_iter().enumerate() {
        frame.add_particle(Particle::new(id, "A").with_position(position)).unwrap();
    }

    return frame;
}

/// Create a frame with `count` particles at random positions inside the
/// given cell, alternating between types "A" and "B". Consecutive particles
/// are grouped in molecules of 3 particles, bonded as a chain. The same
/// `seed` always gives the same frame.
pub fn random_frame(cell: UnitCell, count: usize, seed: u64) -> Frame {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut frame = Frame::new(cell);
    for id in 0..count {
        let fractional = Vector3D::new(rng.gen(), rng.gen(), rng.gen());
        let position = if cell.is_infinite() {
            fractional * 8.0
        } else {
            cell.cartesian(fractional)
        };

        let particle_type = if id % 2 == 0 { "A" } else { "B" };
        let particle = Particle::new(id, particle_type)
            .with_molecule(id / 3)
            .with_position(position);
        frame.add_particle(particle).unwrap();

        if id % 3 != 0 {
            frame.add_bond(id - 1, id).unwrap();
        }
    }

    return frame;
}
