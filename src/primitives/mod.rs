//! Closed primitive solids, centered at the origin.
//!
//! Every generator returns a closed mesh without an unbounded face, with
//! face normals pointing outwards. Dimensions are full extents; a value
//! that is not positive and finite is rejected with
//! [`MeshError::InvalidArgument`](crate::error::MeshError::InvalidArgument).
//!
//! # Example
//!
//! ```
//! use trellis::prelude::*;
//! use trellis::primitives::{cone, cuboid, pyramid, uv_sphere};
//!
//! let cube: HalfEdgeMesh = cuboid(1.0, 2.0, 3.0).unwrap();
//! assert_eq!(cube.num_faces(), 6);
//!
//! let ball: HalfEdgeMesh = uv_sphere(1.0, 8, 4).unwrap();
//! assert_eq!(ball.num_vertices(), 8 * 3 + 2);
//!
//! let tip: HalfEdgeMesh = cone(1.0, 2.0, 12).unwrap();
//! assert_eq!(tip.num_faces(), 24);
//!
//! let pyr: HalfEdgeMesh = pyramid(1.0, 1.0, 1.0).unwrap();
//! assert_eq!(pyr.euler_characteristic(), 2);
//! ```

mod cone;
mod cuboid;
mod pyramid;
mod sphere;

pub use cone::cone;
pub use cuboid::cuboid;
pub use pyramid::pyramid;
pub use sphere::uv_sphere;

use crate::error::{MeshError, Result};

fn check_extent(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(MeshError::invalid_argument(name, value, "must be positive and finite"))
    }
}

fn check_resolution(name: &'static str, value: usize, min: usize) -> Result<()> {
    if value < min {
        return Err(MeshError::invalid_argument(name, value, "resolution is too low"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use nalgebra::Point3;

    use super::*;
    use crate::mesh::HalfEdgeMesh;

    /// Shared checks for closed, outward-facing solids around the origin.
    fn assert_closed_outward(mesh: &HalfEdgeMesh) {
        assert!(mesh.validate().is_ok(), "{:?}", mesh.validate());
        assert!(!mesh.has_unbounded_face());
        assert_eq!(mesh.euler_characteristic(), 2);
        for f in mesh.bounded_face_ids() {
            let c = mesh.face_centroid(f).unwrap();
            let n = mesh.face_normal(f).unwrap();
            assert!((n.norm() - 1.0).abs() < 1e-9);
            assert!(n.dot(&(c - Point3::origin())) > 0.0, "{:?} faces inwards", f);
        }
    }

    #[test]
    fn test_all_primitives_closed() {
        assert_closed_outward(&cuboid(1.0, 2.0, 3.0).unwrap());
        assert_closed_outward(&uv_sphere(2.0, 3, 2).unwrap());
        assert_closed_outward(&uv_sphere(1.0, 16, 8).unwrap());
        assert_closed_outward(&cone(1.0, 2.0, 3).unwrap());
        assert_closed_outward(&cone(0.5, 4.0, 20).unwrap());
        assert_closed_outward(&pyramid(2.0, 1.0, 3.0).unwrap());
    }

    #[test]
    fn test_extent_rejected() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                cuboid::<u32>(bad, 1.0, 1.0),
                Err(MeshError::InvalidArgument { name: "x", .. })
            ));
            assert!(pyramid::<u32>(1.0, 1.0, bad).is_err());
            assert!(uv_sphere::<u32>(bad, 8, 4).is_err());
            assert!(cone::<u32>(1.0, bad, 8).is_err());
        }
    }
}
