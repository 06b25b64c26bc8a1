use crate::body::RigidBodyState;
use crate::config::LaunchParameters;
use crate::entropy::EntropyReader;
use crate::math::Vec3;

/// Maps entropy draws onto a launch state.
///
/// Five gaussians in a fixed order (impulse, spin magnitude, then the three
/// spin-axis wobble components — 40 bytes total), so identical entropy and
/// parameters always produce the identical state. The spin axis is the
/// ideal axis nudged by the wobble and renormalized; position and
/// orientation are copied from the parameters untouched.
pub fn sample_initial_state(
    reader: &mut EntropyReader,
    launch: &LaunchParameters,
) -> RigidBodyState {
    let impulse = reader.next_gaussian(launch.impulse_mean, launch.impulse_std_dev);
    let spin_magnitude = reader.next_gaussian(launch.spin_mean, launch.spin_std_dev);
    let wobble = Vec3::new(
        reader.next_gaussian(0.0, launch.axis_wobble_std_dev),
        reader.next_gaussian(0.0, launch.axis_wobble_std_dev),
        reader.next_gaussian(0.0, launch.axis_wobble_std_dev),
    );
    let axis = (launch.ideal_spin_axis.normalize() + wobble).normalize();

    RigidBodyState {
        position: launch.position,
        orientation: launch.orientation,
        linear_velocity: Vec3::new(0.0, impulse, 0.0),
        angular_velocity: axis * spin_magnitude,
    }
}
