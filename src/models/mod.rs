mod day_schedule;
mod garden;
mod product;
mod profile;

pub use day_schedule::*;
pub use garden::*;
pub use product::*;
pub use profile::*;
