//! Keyframe sampling.
//!
//! Each channel is resolved independently through [`resolve_segment`], which
//! owns every degenerate-time guard, and then blended with the operation
//! suited to the value type: lerp for translation/scale, shortest-arc slerp
//! for rotation.

use glam::{Mat4, Quat, Vec3};

use super::clip::{BoneTracks, Keyframe};
use crate::math::compose_trs;

/// Which keys to use for a query time
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    /// No keys: use the identity component
    Empty,
    /// Use this key's value as-is
    Snap(usize),
    /// Blend from one key to the next by `factor`
    Lerp { from: usize, to: usize, factor: f32 },
}

/// Locate the keyframe segment containing `time`.
///
/// The search is a linear scan for the first `i` with `time < key[i + 1]`.
/// Bone channels hold tens of keys, so a scan beats anything fancier. When
/// no key lies after `time`, the search falls back to the first segment.
///
/// `factor` is not clamped: on monotonic tracks it stays within `[0, 1]` for
/// times inside the key range. Past the last key, or on malformed tracks, the
/// first segment extrapolates linearly instead of failing.
pub fn resolve_segment<T>(keys: &[Keyframe<T>], time: f32) -> Segment {
    match keys.len() {
        0 => return Segment::Empty,
        1 => return Segment::Snap(0),
        _ => {}
    }

    let from = keys
        .windows(2)
        .position(|pair| time < pair[1].time)
        .unwrap_or(0);
    let to = (from + 1) % keys.len();

    let span = keys[to].time - keys[from].time;
    if span == 0.0 {
        // Zero-length segment
        return Segment::Snap(from);
    }

    Segment::Lerp {
        from,
        to,
        factor: (time - keys[from].time) / span,
    }
}

/// Interpolated translation, `Vec3::ZERO` for an empty channel
pub fn sample_position(keys: &[Keyframe<Vec3>], time: f32) -> Vec3 {
    sample_vec3(keys, time, Vec3::ZERO)
}

/// Interpolated scale, `Vec3::ONE` for an empty channel
pub fn sample_scale(keys: &[Keyframe<Vec3>], time: f32) -> Vec3 {
    sample_vec3(keys, time, Vec3::ONE)
}

fn sample_vec3(keys: &[Keyframe<Vec3>], time: f32, identity: Vec3) -> Vec3 {
    match resolve_segment(keys, time) {
        Segment::Empty => identity,
        Segment::Snap(i) => keys[i].value,
        Segment::Lerp { from, to, factor } => keys[from].value.lerp(keys[to].value, factor),
    }
}

/// Interpolated rotation, `Quat::IDENTITY` for an empty channel.
///
/// Blending goes along the shorter arc and the result is renormalized, so
/// unit inputs always give a unit output.
pub fn sample_rotation(keys: &[Keyframe<Quat>], time: f32) -> Quat {
    match resolve_segment(keys, time) {
        Segment::Empty => Quat::IDENTITY,
        Segment::Snap(i) => keys[i].value,
        Segment::Lerp { from, to, factor } => {
            let start = keys[from].value;
            let mut end = keys[to].value;
            if start.dot(end) < 0.0 {
                end = -end;
            }
            start.slerp(end, factor).normalize()
        }
    }
}

/// Local transform of a bone at `time`: `translation * rotation * scale`
pub fn local_transform(tracks: &BoneTracks, time: f32) -> Mat4 {
    compose_trs(
        sample_position(&tracks.positions, time),
        sample_rotation(&tracks.rotations, time),
        sample_scale(&tracks.scales, time),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Mat4Extended;
    use rand::Rng;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

    fn key<T>(time: f32, value: T) -> Keyframe<T> {
        Keyframe { time, value }
    }

    /// q and -q encode the same rotation
    fn same_rotation(a: Quat, b: Quat) -> bool {
        a.abs_diff_eq(b, 1e-5) || a.abs_diff_eq(-b, 1e-5)
    }

    #[test]
    fn test_empty_channel_is_identity() {
        assert_eq!(resolve_segment::<Vec3>(&[], 3.0), Segment::Empty);
        assert_eq!(sample_position(&[], 3.0), Vec3::ZERO);
        assert_eq!(sample_scale(&[], 3.0), Vec3::ONE);
        assert_eq!(sample_rotation(&[], 3.0), Quat::IDENTITY);
        assert!(local_transform(&BoneTracks::default(), 1.0).approx_eq(&Mat4::IDENTITY, 0.0));
    }

    #[test]
    fn test_single_key_ignores_time() {
        let keys = [key(4.0, Vec3::new(1.0, 2.0, 3.0))];
        for time in [-10.0, 0.0, 4.0, 1000.0] {
            assert_eq!(sample_position(&keys, time), Vec3::new(1.0, 2.0, 3.0));
        }

        let rot = Quat::from_rotation_x(0.3);
        assert_eq!(sample_rotation(&[key(0.0, rot)], 99.0), rot);
    }

    #[test]
    fn test_midpoint_lerp() {
        let keys = [key(2.0, Vec3::ZERO), key(6.0, Vec3::new(4.0, -8.0, 2.0))];
        let mid = sample_position(&keys, 4.0);
        assert!(
            (mid - Vec3::new(2.0, -4.0, 1.0)).length() < 1e-6,
            "Midpoint should be (2, -4, 1), got {:?}",
            mid
        );
    }

    #[test]
    fn test_midpoint_slerp() {
        let keys = [
            key(0.0, Quat::IDENTITY),
            key(10.0, Quat::from_rotation_y(FRAC_PI_2)),
        ];
        let mid = sample_rotation(&keys, 5.0);
        let expected = Quat::from_rotation_y(FRAC_PI_4);
        assert!(
            same_rotation(mid, expected),
            "Expected 45 deg about Y, got {:?}",
            mid.to_axis_angle()
        );
    }

    #[test]
    fn test_segment_search_picks_containing_interval() {
        let keys = [key(0.0, 0.0f32), key(1.0, 0.0), key(3.0, 0.0), key(7.0, 0.0)];
        assert_eq!(
            resolve_segment(&keys, 2.0),
            Segment::Lerp { from: 1, to: 2, factor: 0.5 }
        );
        // Exactly on a key starts the next segment
        assert_eq!(
            resolve_segment(&keys, 3.0),
            Segment::Lerp { from: 2, to: 3, factor: 0.0 }
        );
    }

    #[test]
    fn test_time_past_last_key_falls_back_to_first_segment() {
        let keys = [key(0.0, Vec3::ZERO), key(5.0, Vec3::X), key(8.0, Vec3::Y)];
        assert_eq!(
            resolve_segment(&keys, 9.0),
            Segment::Lerp { from: 0, to: 1, factor: 1.8 }
        );
        let past_end = sample_position(&keys, 9.0);
        assert!(
            (past_end - Vec3::new(1.8, 0.0, 0.0)).length() < 1e-5,
            "Expected (1.8, 0, 0), got {:?}",
            past_end
        );

        // Two keys: the first segment is also the last, so the end key is exact
        let pair = [key(0.0, Vec3::ZERO), key(10.0, Vec3::Y)];
        assert!((sample_position(&pair, 10.0) - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_zero_length_segment_snaps() {
        let keys = [key(2.0, Vec3::X), key(2.0, Vec3::Y)];
        assert_eq!(resolve_segment(&keys, 5.0), Segment::Snap(0));
        assert_eq!(sample_position(&keys, 5.0), Vec3::X);
    }

    #[test]
    fn test_non_monotonic_track_extrapolates() {
        // Second key is earlier than the first
        let keys = [key(4.0, Vec3::ZERO), key(2.0, Vec3::X)];
        let value = sample_position(&keys, 6.0);
        assert!(value.is_finite());
        // factor = (6 - 4) / (2 - 4) = -1
        assert!((value - Vec3::new(-1.0, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_slerp_takes_shortest_arc() {
        let start = Quat::from_rotation_z(0.2);
        // Same rotation as 0.6 rad about Z, but in the opposite hemisphere
        let end = -Quat::from_rotation_z(0.6);
        let keys = [key(0.0, start), key(1.0, end)];

        let mid = sample_rotation(&keys, 0.5);
        assert!(
            same_rotation(mid, Quat::from_rotation_z(0.4)),
            "Slerp went the long way: {:?}",
            mid.to_axis_angle()
        );
    }

    #[test]
    fn test_slerp_output_is_unit_length() {
        let mut rng = rand::rng();
        for _ in 0..200 {
            let a = random_unit_quat(&mut rng);
            let b = random_unit_quat(&mut rng);
            let t: f32 = rng.random_range(0.0..=1.0);
            let keys = [key(0.0, a), key(1.0, b)];

            let q = sample_rotation(&keys, t);
            assert!(
                (q.length() - 1.0).abs() < 1e-4,
                "Non-unit quaternion {:?} (length {})",
                q,
                q.length()
            );
        }
    }

    fn random_unit_quat(rng: &mut impl Rng) -> Quat {
        loop {
            let q = Quat::from_xyzw(
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
            );
            if q.length_squared() > 1e-3 {
                return q.normalize();
            }
        }
    }

    #[test]
    fn test_local_transform_composes_trs() {
        let tracks = BoneTracks {
            positions: vec![key(0.0, Vec3::new(0.0, 3.0, 0.0))],
            rotations: vec![key(0.0, Quat::from_rotation_z(FRAC_PI_2))],
            scales: vec![key(0.0, Vec3::splat(2.0))],
        };
        let p = local_transform(&tracks, 0.0).transform_point3(Vec3::X);
        assert!(
            (p - Vec3::new(0.0, 5.0, 0.0)).length() < 1e-5,
            "Expected (0, 5, 0), got {:?}",
            p
        );
    }
}
