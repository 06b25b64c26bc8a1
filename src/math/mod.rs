//! Small immutable math library for the simulation kernel.
//!
//! Every type here is a `Copy` value object: operations never mutate their
//! inputs and always return fresh values, so there is no shared mutable math
//! state anywhere in the kernel. All arithmetic is `f64`.

mod mat3;
mod quat;
mod vec3;

pub use mat3::Mat3;
pub use quat::Quaternion;
pub use vec3::Vec3;
