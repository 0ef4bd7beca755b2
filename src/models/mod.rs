//! Domain models for the exoplanet explorer.
//!
//! - [`Record`]: one normalized discovery entry.
//! - [`Filter`]: up to four exact-match constraints, built from [`SearchParams`].
//! - [`FilterOptions`]: the distinct values per filterable field.
//! - [`DataSource`]: where a load got its data from.

mod filter;
mod options;
mod record;
mod source;

pub use filter::*;
pub use options::*;
pub use record::*;
pub use source::*;
