//! Planar four-point pose solver.
//!
//! The target plane is mapped to the normalized image plane with a
//! homography, which is decomposed into an initial `R | t` and then refined
//! with Gauss-Newton on the pixel reprojection error over
//! `(rotation vector, translation)`.

use crate::PoseError;
use nalgebra::{Matrix3, Point2, Point3, Rotation3, SMatrix, SVector, Vector3};
use quad_targets_core::{homography_from_4pt, CameraIntrinsics};

#[cfg(feature = "tracing")]
use tracing::instrument;

const MAX_ITERS: usize = 20;
const JACOBIAN_STEP: f64 = 1e-7;
const STEP_TOL: f64 = 1e-12;

type Params = SVector<f64, 6>;
type Residuals = SVector<f64, 8>;

/// Refined pose together with its final reprojection error.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlanarSolution {
    pub rotation: Rotation3<f64>,
    pub translation: Vector3<f64>,
    pub rms_px: f64,
    pub iterations: usize,
}

/// Decompose a plane-to-normalized-image homography `H ~ [r1 r2 t]` into a
/// rotation and translation with the target in front of the camera.
pub fn pose_from_homography(h: &Matrix3<f64>) -> Option<(Rotation3<f64>, Vector3<f64>)> {
    let h1: Vector3<f64> = h.column(0).into_owned();
    let h2: Vector3<f64> = h.column(1).into_owned();
    let h3: Vector3<f64> = h.column(2).into_owned();

    let (n1, n2) = (h1.norm(), h2.norm());
    if n1 < 1e-12 || n2 < 1e-12 {
        return None;
    }
    let mut lambda = 2.0 / (n1 + n2);
    if h3.z * lambda < 0.0 {
        lambda = -lambda;
    }

    let r1 = h1 * lambda;
    let r2 = h2 * lambda;
    let r3 = r1.cross(&r2);
    let t = h3 * lambda;

    // nearest rotation in the Frobenius sense
    let m = Matrix3::from_columns(&[r1, r2, r3]);
    let svd = m.svd(true, true);
    let mut u = svd.u?;
    let vt = svd.v_t?;
    let mut r = u * vt;
    if r.determinant() < 0.0 {
        u.column_mut(2).neg_mut();
        r = u * vt;
    }
    if r.iter().chain(t.iter()).any(|v| !v.is_finite()) {
        return None;
    }
    Some((Rotation3::from_matrix_unchecked(r), t))
}

fn reprojection_residuals(
    camera: &CameraIntrinsics,
    object: &[Point3<f64>; 4],
    pixels: &[Point2<f64>; 4],
    params: &Params,
) -> Option<Residuals> {
    let rotation = Rotation3::from_scaled_axis(Vector3::new(params[0], params[1], params[2]));
    let t = Vector3::new(params[3], params[4], params[5]);
    let mut r = Residuals::zeros();
    for (k, (obj, px)) in object.iter().zip(pixels).enumerate() {
        let pc = rotation.transform_point(obj) + t;
        let proj = camera.project(&pc)?;
        r[2 * k] = proj.x - px.x;
        r[2 * k + 1] = proj.y - px.y;
    }
    Some(r)
}

/// Gauss-Newton refinement with a forward-difference Jacobian. A step is only
/// taken when it lowers the squared error.
fn refine(
    camera: &CameraIntrinsics,
    object: &[Point3<f64>; 4],
    pixels: &[Point2<f64>; 4],
    mut params: Params,
) -> Result<(Params, Residuals, usize), PoseError> {
    let mut r =
        reprojection_residuals(camera, object, pixels, &params).ok_or(PoseError::BehindCamera)?;
    let mut cost = r.norm_squared();
    let mut iterations = 0;

    'gn: for _ in 0..MAX_ITERS {
        let mut j = SMatrix::<f64, 8, 6>::zeros();
        for c in 0..6 {
            let step = JACOBIAN_STEP * (1.0 + params[c].abs());
            let mut p = params;
            p[c] += step;
            let Some(rp) = reprojection_residuals(camera, object, pixels, &p) else {
                break 'gn;
            };
            j.set_column(c, &((rp - r) / step));
        }

        let jt = j.transpose();
        let normal = jt * j + SMatrix::<f64, 6, 6>::identity() * 1e-12;
        let Some(chol) = normal.cholesky() else {
            break;
        };
        let delta = chol.solve(&(-(jt * r)));

        let candidate = params + delta;
        match reprojection_residuals(camera, object, pixels, &candidate) {
            Some(rc) if rc.norm_squared() < cost => {
                params = candidate;
                r = rc;
                cost = r.norm_squared();
                iterations += 1;
                if delta.norm() < STEP_TOL {
                    break;
                }
            }
            _ => break,
        }
    }
    Ok((params, r, iterations))
}

/// Recover the pose of a planar quad from its four image corners.
///
/// `plane` holds the corners on the target plane (`z = 0`) and `pixels` the
/// matching image observations, in the same order.
#[cfg_attr(feature = "tracing", instrument(level = "debug", skip_all))]
pub fn solve_planar_pose(
    camera: &CameraIntrinsics,
    plane: &[Point2<f64>; 4],
    pixels: &[Point2<f64>; 4],
) -> Result<PlanarSolution, PoseError> {
    if !camera.is_valid() {
        return Err(PoseError::InvalidIntrinsics);
    }

    let mut normalized = [Point2::origin(); 4];
    for (n, px) in normalized.iter_mut().zip(pixels) {
        *n = camera
            .pixel_to_normalized(*px)
            .ok_or(PoseError::InvalidIntrinsics)?;
    }

    let h = homography_from_4pt(plane, &normalized).ok_or(PoseError::HomographyFailed)?;
    let (r0, t0) = pose_from_homography(&h.h).ok_or(PoseError::HomographyFailed)?;

    let rv = r0.scaled_axis();
    let init = Params::from_column_slice(&[rv.x, rv.y, rv.z, t0.x, t0.y, t0.z]);
    let object = plane.map(|p| Point3::new(p.x, p.y, 0.0));
    let (params, residuals, iterations) = refine(camera, &object, pixels, init)?;

    if params.iter().any(|v| !v.is_finite()) {
        return Err(PoseError::NonFinite);
    }
    let rotation = Rotation3::from_scaled_axis(Vector3::new(params[0], params[1], params[2]));
    let translation = Vector3::new(params[3], params[4], params[5]);
    if translation.z <= 0.0 {
        return Err(PoseError::BehindCamera);
    }

    Ok(PlanarSolution {
        rotation,
        translation,
        rms_px: (residuals.norm_squared() / 4.0).sqrt(),
        iterations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn camera() -> CameraIntrinsics {
        CameraIntrinsics::new(800.0, 800.0, 320.0, 240.0)
    }

    fn plane() -> [Point2<f64>; 4] {
        [
            Point2::new(-0.1, -0.075),
            Point2::new(-0.1, 0.075),
            Point2::new(0.1, 0.075),
            Point2::new(0.1, -0.075),
        ]
    }

    fn project(rot: &Rotation3<f64>, t: &Vector3<f64>) -> [Point2<f64>; 4] {
        plane().map(|p| {
            camera()
                .project(&(rot.transform_point(&Point3::new(p.x, p.y, 0.0)) + *t))
                .expect("in front")
        })
    }

    #[test]
    fn recovers_exact_pose() {
        let rot = Rotation3::from_euler_angles(0.2, -0.15, 0.1);
        let t = Vector3::new(0.05, -0.02, 1.5);
        let sol = solve_planar_pose(&camera(), &plane(), &project(&rot, &t)).expect("pose");

        assert!(sol.rotation.rotation_to(&rot).angle() < 1e-6);
        assert_relative_eq!(sol.translation, t, epsilon = 1e-6);
        assert!(sol.rms_px < 1e-6);
    }

    #[test]
    fn refinement_reduces_noisy_error() {
        let rot = Rotation3::from_euler_angles(-0.1, 0.25, -0.3);
        let t = Vector3::new(-0.1, 0.04, 2.0);
        let mut px = project(&rot, &t);
        for (k, p) in px.iter_mut().enumerate() {
            p.x += if k % 2 == 0 { 0.4 } else { -0.3 };
            p.y += if k < 2 { -0.2 } else { 0.35 };
        }
        let sol = solve_planar_pose(&camera(), &plane(), &px).expect("pose");
        assert!(sol.rms_px < 0.6);
        assert!((sol.translation - t).norm() < 0.05);
    }

    #[test]
    fn homography_decomposition_is_a_rotation() {
        let rot = Rotation3::from_euler_angles(0.3, 0.1, -0.2);
        let t = Vector3::new(0.0, 0.0, 1.0);
        let r = rot.matrix();
        let h = Matrix3::from_columns(&[
            r.column(0).into_owned() * 3.0,
            r.column(1).into_owned() * 3.0,
            t * 3.0,
        ]);
        let (r0, t0) = pose_from_homography(&(-h)).expect("decomposition");
        assert!(r0.rotation_to(&rot).angle() < 1e-9);
        assert_relative_eq!(t0, t, epsilon = 1e-9);
    }

    #[test]
    fn collinear_corners_fail() {
        let px = [
            Point2::new(100.0, 100.0),
            Point2::new(200.0, 100.0),
            Point2::new(300.0, 100.0),
            Point2::new(400.0, 100.0),
        ];
        assert!(solve_planar_pose(&camera(), &plane(), &px).is_err());
    }

    #[test]
    fn invalid_camera_is_reported() {
        let cam = CameraIntrinsics::new(0.0, 800.0, 320.0, 240.0);
        let px = project(&Rotation3::identity(), &Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(
            solve_planar_pose(&cam, &plane(), &px).unwrap_err(),
            PoseError::InvalidIntrinsics
        );
    }
}
