pub mod catalog;
pub mod dat;
pub mod error;
pub mod hasher;
pub mod report;

pub use catalog::{Catalog, CatalogEntry, CatalogMatch, DecomposedName, decompose_name};
pub use dat::{DatFile, DatGame, DatRom, parse_dat, parse_dat_file};
pub use error::{DatError, HashError};
pub use hasher::{HashOptions, hash_file, hash_reader};
pub use report::{combine, pair, parse_encrypted_report};
