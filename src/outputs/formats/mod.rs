//! Predefined implementations of [ListFormat](crate::ListFormat) and [ListBuilder](crate::ListBuilder)

mod generic_list;
pub(crate) use generic_list::GenericList;
mod indexed_list;
pub use indexed_list::{IndexedListBuilder, IndexedListFormat};
mod deindexed_list;
pub use deindexed_list::{DeindexedListBuilder, DeindexedListFormat};
