extern crate anyhow;
extern crate byteorder;
extern crate nom;

#[cfg(test)]
extern crate quickcheck;
#[cfg(test)]
#[macro_use(quickcheck)]
extern crate quickcheck_macros;

pub mod commands;
pub mod denc;
pub mod dencoder;
pub mod dump;
pub mod rbd;
pub mod version;
