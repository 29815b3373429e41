// File I/O abstractions
// Concrete readers/writers are provided by plugins registering factories

pub mod format;
pub mod parameters;
pub mod system;

pub use format::Format;
pub use parameters::ParametersProvider;
pub use system::{FactoryReader, FactoryWriter, IoError, IoSystem, Reader, Writer};
