//! Common types shared by the grid mock server crates.
//!
//! - [`ZoneIdentifier`]: validated composite zone key such as `CA-QC`
//! - [`RegionKeyMap`]: upstream region name to output zone key table
//! - [`RenewableSet`]: production sources counted as renewable
//! - [`GridError`]: the error type every fallible operation returns

pub mod error;
pub mod region_map;
pub mod renewable;
pub mod zone;

pub use error::{GridError, GridResult};
pub use region_map::RegionKeyMap;
pub use renewable::RenewableSet;
pub use zone::{is_valid_segment, ZoneIdentifier};
