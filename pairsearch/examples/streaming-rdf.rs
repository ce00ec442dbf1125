//! Compute the radial distribution function between two types of particles,
//! accumulating the histogram directly in the match function instead of
//! storing the pairs.

use pairsearch::{ExclusionTable, Frame, NeighborSearch, Pair, Particle, ParticleSet, UnitCell, Vector3D};

const N_BINS: usize = 40;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // enable collection of profiling data
    time_graph::enable_data_collection(true);
    time_graph::clear_collected_data();

    let frame = water_box(6, 3.1)?;
    let oxygen = ParticleSet::select(&frame, "OW")?;
    let hydrogen = ParticleSet::select(&frame, "HW")?;
    let exclusions = ExclusionTable::from_frame(&frame, 1)?;

    let cutoff = 6.0;
    let bin_width = cutoff / N_BINS as f64;
    let mut histogram = [0_usize; N_BINS];

    let mut search = NeighborSearch::<Pair>::new();
    search.set_cutoff(cutoff);
    search.set_exclusions(&exclusions);
    search.set_match_function(|_, _, _, distance| {
        let bin = usize::min((distance / bin_width) as usize, N_BINS - 1);
        histogram[bin] += 1;
        // do not store any pair
        false
    });

    let pairs = search.generate(&oxygen, &hydrogen)?;
    assert!(pairs.is_empty());
    drop(search);

    let cell = frame.cell().matrix();
    let volume = cell.determinant();
    let density = hydrogen.len() as f64 / volume;

    println!("# r g_OH(r)");
    for (i, &count) in histogram.iter().enumerate() {
        let r_min = i as f64 * bin_width;
        let r_max = r_min + bin_width;
        let shell = 4.0 / 3.0 * std::f64::consts::PI * (r_max.powi(3) - r_min.powi(3));
        let rdf = count as f64 / (oxygen.len() as f64 * shell * density);
        println!("{:.3} {:.5}", r_min + 0.5 * bin_width, rdf);
    }

    // display the time spent in the search
    // (this requires the "table" feature for the time_graph crate)
    let graph = time_graph::get_full_graph();
    println!("{}", graph.as_short_table());

    Ok(())
}

/// Water molecules on a simple cubic lattice with `n_side^3` sites
fn water_box(n_side: usize, spacing: f64) -> Result<Frame, pairsearch::Error> {
    let mut frame = Frame::new(UnitCell::cubic(n_side as f64 * spacing)?);

    let mut id = 0;
    for i in 0..n_side {
        for j in 0..n_side {
            for k in 0..n_side {
                let molecule = id / 3;
                let origin = Vector3D::new(i as f64, j as f64, k as f64) * spacing;
                // rotate molecules to avoid a perfectly ordered structure
                let angle = molecule as f64 * 0.7;
                let (sin, cos) = angle.sin_cos();

                let hydrogen_1 = Vector3D::new(0.0, 0.75545 * cos, 0.75545 * sin) + Vector3D::new(-0.58895, 0.0, 0.0);
                let hydrogen_2 = Vector3D::new(0.0, -0.75545 * cos, -0.75545 * sin) + Vector3D::new(-0.58895, 0.0, 0.0);

                frame.add_particle(Particle::new(id, "OW").with_molecule(molecule).with_position(origin))?;
                frame.add_particle(Particle::new(id + 1, "HW").with_molecule(molecule).with_position(origin + hydrogen_1))?;
                frame.add_particle(Particle::new(id + 2, "HW").with_molecule(molecule).with_position(origin + hydrogen_2))?;
                frame.add_bond(id, id + 1)?;
                frame.add_bond(id, id + 2)?;
                id += 3;
            }
        }
    }

    return Ok(frame);
}
