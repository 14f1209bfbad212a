pub mod src;


pub use src::*;
