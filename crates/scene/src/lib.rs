pub mod circles;
pub mod draw;
pub mod hopf;
pub mod picking;
pub mod sphere;
pub mod stereographic;

pub use draw::*;
pub use sphere::*;
