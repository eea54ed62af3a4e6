mod error;
mod expr;
mod map;
mod resolve;

pub use error::Error;
pub use expr::{parse_with_prefix, Expr};
pub use map::{Address, Partition, PartitionMap};
pub use resolve::{resolve_all, Resolver};
