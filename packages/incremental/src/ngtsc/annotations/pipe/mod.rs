pub mod src;

#[cfg(test)]
mod test;

pub use src::*;
