//! Readers for the two kinds of page content the harvester cares about:
//! the result summary on the first page and the listing containers on
//! every page.

pub mod listings;
pub mod summary;


pub use listings::extract;
pub use summary::count;
