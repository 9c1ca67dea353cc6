use crate::error::{Error, Result};
use dashmap::DashMap;
use std::any::{Any, TypeId};
use std::sync::Arc;

/// Thread-safe service registry.
///
/// Services are registered once during application setup and resolved by the
/// [`Injectable`](crate::di::Injectable) implementations of controllers and
/// other services. The container is never mutated after setup.
#[derive(Clone, Default)]
pub struct Container {
    services: DashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl Container {
    pub fn new() -> Self {
        Self {
            services: DashMap::new(),
        }
    }

    /// Register a service instance.
    pub fn register<T: 'static + Send + Sync>(&mut self, instance: T) -> &mut Self {
        self.services.insert(TypeId::of::<T>(), Arc::new(instance));
        self
    }

    /// Resolve a previously registered service.
    ///
    /// # Errors
    /// Returns [`Error::DependencyNotFound`] if no instance of `T` was
    /// registered.
    pub fn resolve<T: 'static + Send + Sync>(&self) -> Result<Arc<T>> {
        let entry =
            self.services
                .get(&TypeId::of::<T>())
                .ok_or_else(|| Error::DependencyNotFound {
                    type_name: std::any::type_name::<T>(),
                })?;
        entry
            .value()
            .clone()
            .downcast::<T>()
            .map_err(|_| Error::DowncastFailed {
                type_name: std::any::type_name::<T>(),
            })
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.services.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

/// Builder for constructing a dependency injection container.
///
/// # Example
/// ```
/// use axum_controllers::ContainerBuilder;
///
/// struct ItemStore;
///
/// let container = ContainerBuilder::new().register(ItemStore).build();
/// assert!(container.contains::<ItemStore>());
/// ```
#[derive(Default)]
pub struct ContainerBuilder {
    container: Container,
}

impl ContainerBuilder {
    pub fn new() -> Self {
        Self {
            container: Container::new(),
        }
    }

    /// Register a service instance.
    pub fn register<T: 'static + Send + Sync>(mut self, instance: T) -> Self {
        self.container.register(instance);
        self
    }

    pub fn build(self) -> Container {
        self.container
    }
}
