mod enterprise;
mod person;
mod relation;
mod requirement;

pub use enterprise::*;
pub use person::*;
pub use relation::*;
pub use requirement::*;
