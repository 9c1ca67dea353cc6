mod container;
mod depends;
mod extractor;
mod injectable;

pub use container::{Container, ContainerBuilder};
pub use depends::Depends;
pub use extractor::{HasContainer, Inject};
pub use injectable::Injectable;
