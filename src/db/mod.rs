pub mod entities;
pub mod genres;
pub mod repositories;
pub mod schedule;

pub use entities::*;
pub use schedule::*;
