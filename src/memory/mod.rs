//! Remote memory streams, region resolution, and the memory context

pub mod context;
pub mod mock;
pub mod resolver;
pub mod source;
pub mod stream;

pub use context::{MemoryContext, ResolvedRegion};
pub use mock::{MockMemory, MockMemoryBuilder};
pub use resolver::resolve_region;
pub use source::MemorySource;
pub use stream::RemoteMemoryStream;
