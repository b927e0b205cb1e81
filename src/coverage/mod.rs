pub mod corpus;
pub mod pipeline;
pub mod replay;
pub mod tools;
pub mod tracefile;

pub use pipeline::gather;
pub use tracefile::CoverageSummary;
