use std::f64::consts::PI;

use nalgebra::Point3;

use super::{check_extent, check_resolution};
use crate::error::Result;
use crate::mesh::{build_from_polygons, HalfEdgeMesh, MeshIndex};

/// A UV sphere with poles on the Y axis.
///
/// `h_res` is the number of points per ring of latitude (at least 3) and
/// `v_res` the number of bands between the poles (at least 2). The poles
/// get triangle fans and every other band is made of quads.
pub fn uv_sphere<I: MeshIndex>(radius: f64, h_res: usize, v_res: usize) -> Result<HalfEdgeMesh<I>> {
    check_extent("radius", radius)?;
    check_resolution("h_res", h_res, 3)?;
    check_resolution("v_res", v_res, 2)?;

    let h_step = 2.0 * PI / h_res as f64;
    let v_step = PI / v_res as f64;

    let mut positions = Vec::with_capacity(h_res * (v_res - 1) + 2);
    positions.push(Point3::new(0.0, radius, 0.0));
    positions.push(Point3::new(0.0, -radius, 0.0));
    let (north, south) = (0, 1);

    let mut rings: Vec<Vec<usize>> = Vec::with_capacity(v_res - 1);
    for i in 1..v_res {
        let (sin_v, cos_v) = (v_step * i as f64).sin_cos();
        let ring = (0..h_res)
            .map(|j| {
                let (sin_h, cos_h) = (h_step * j as f64).sin_cos();
                positions.push(Point3::new(radius * sin_h * sin_v, radius * cos_v, radius * cos_h * sin_v));
                positions.len() - 1
            })
            .collect();
        rings.push(ring);
    }

    let mut faces: Vec<Vec<usize>> = Vec::with_capacity(h_res * v_res);
    let first = &rings[0];
    for j in 0..h_res {
        faces.push(vec![first[(j + 1) % h_res], first[j], north]);
    }
    for pair in rings.windows(2) {
        let (last, cur) = (&pair[0], &pair[1]);
        for j in 0..h_res {
            let k = (j + 1) % h_res;
            faces.push(vec![last[j], last[k], cur[k], cur[j]]);
        }
    }
    let bottom = &rings[rings.len() - 1];
    for j in 0..h_res {
        faces.push(vec![bottom[j], bottom[(j + 1) % h_res], south]);
    }

    log::debug!("uv sphere r={} with {}x{} segments", radius, h_res, v_res);

    build_from_polygons(&positions, &faces)
}
