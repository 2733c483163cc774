//! Query side: load an index and answer substring queries.

pub mod query;
