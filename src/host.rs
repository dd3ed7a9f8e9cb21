//! The host framework's registration interface and a scoped guard over it.
//!
//! The host never owns a component. It keeps a weak back-reference keyed by
//! device, and the [`Registration`] guard held on the driver side decides how
//! long the component stays visible.

use std::sync::{Arc, Mutex, MutexGuard, Weak};

use hashbrown::HashMap;
use tracing::{debug, warn};

use crate::component::ComponentDescriptor;
use crate::device::DeviceId;
use crate::error::{Error, Result};

/// What the driver needs from the host audio framework.
///
/// `register` must be atomic: on error the host holds nothing for `device`.
pub trait ComponentHost {
    fn register(&self, device: &DeviceId, component: &Arc<ComponentDescriptor>) -> Result<()>;

    /// Drops the registration of `component` for `device`. Returns `false`
    /// if the host holds nothing for `device` or holds a different component.
    fn unregister(&self, device: &DeviceId, component: &Arc<ComponentDescriptor>) -> bool;
}

/// A live registration, released exactly once.
///
/// Release happens through [`release`](Self::release) or on drop, whichever
/// comes first. The guard holds the only strong reference the driver side
/// keeps to the component.
pub struct Registration<H: ComponentHost + ?Sized> {
    host: Arc<H>,
    device: DeviceId,
    component: Arc<ComponentDescriptor>,
    live: bool,
}

impl<H: ComponentHost + ?Sized> Registration<H> {
    /// Registers `component` for `device`.
    ///
    /// If the host refuses, its error is returned unchanged and nothing needs
    /// releasing.
    pub fn acquire(host: Arc<H>, device: DeviceId, component: ComponentDescriptor) -> Result<Self> {
        let component = Arc::new(component);
        host.register(&device, &component)?;
        Ok(Self {
            host,
            device,
            component,
            live: true,
        })
    }

    pub fn device(&self) -> &DeviceId {
        &self.device
    }

    pub fn component(&self) -> &Arc<ComponentDescriptor> {
        &self.component
    }

    /// Releases now instead of at drop. Returns whether the host still had it.
    pub fn release(mut self) -> bool {
        self.release_inner()
    }

    fn release_inner(&mut self) -> bool {
        if !self.live {
            return false;
        }
        self.live = false;
        self.host.unregister(&self.device, &self.component)
    }
}

impl<H: ComponentHost + ?Sized> Drop for Registration<H> {
    fn drop(&mut self) {
        self.release_inner();
    }
}

/// In-memory host: a table of components keyed by device.
///
/// Entries are weak, so a lookup only succeeds while the owning
/// [`Registration`] is alive.
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    entries: Mutex<HashMap<DeviceId, Weak<ComponentDescriptor>>>,
    slot_limit: Option<usize>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps the number of live components; further registrations fail.
    pub fn with_slot_limit(mut self, limit: usize) -> Self {
        self.slot_limit = Some(limit);
        self
    }

    /// The component registered for `device`, if it is still alive.
    pub fn lookup(&self, device: &DeviceId) -> Option<Arc<ComponentDescriptor>> {
        self.entries().get(device).and_then(Weak::upgrade)
    }

    /// Devices with a live component, sorted.
    pub fn devices(&self) -> Vec<DeviceId> {
        let mut devices: Vec<_> = self
            .entries()
            .iter()
            .filter(|(_, c)| c.strong_count() > 0)
            .map(|(d, _)| d.clone())
            .collect();
        devices.sort();
        devices
    }

    /// Devices exposing a DAI called `dai`, sorted.
    pub fn find_dai(&self, dai: &str) -> Vec<DeviceId> {
        let mut devices: Vec<_> = self
            .entries()
            .iter()
            .filter_map(|(d, c)| {
                let component = c.upgrade()?;
                let exposed = component.dai_names().contains(&dai);
                exposed.then(|| d.clone())
            })
            .collect();
        devices.sort();
        devices
    }

    pub fn len(&self) -> usize {
        self.entries().values().filter(|c| c.strong_count() > 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Readers and release tolerate a poisoned lock; the table itself is
    // never left half-written.
    fn entries(&self) -> MutexGuard<'_, HashMap<DeviceId, Weak<ComponentDescriptor>>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ComponentHost for ComponentRegistry {
    fn register(&self, device: &DeviceId, component: &Arc<ComponentDescriptor>) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| Error::registration_failure(device.as_str(), "registry lock poisoned"))?;

        // Entries whose component is gone are leftovers, not collisions.
        entries.retain(|_, c| c.strong_count() > 0);

        if entries.contains_key(device) {
            warn!(device = %device, "component already registered");
            return Err(Error::registration_failure(
                device.as_str(),
                "a component is already registered for this device",
            ));
        }
        if let Some(limit) = self.slot_limit {
            if entries.len() >= limit {
                warn!(device = %device, limit, "no free component slots");
                return Err(Error::registration_failure(
                    device.as_str(),
                    "no free component slots",
                ));
            }
        }

        entries.insert(device.clone(), Arc::downgrade(component));
        debug!(
            device = %device,
            component = component.name(),
            streams = component.streams().len(),
            widgets = component.widgets().len(),
            routes = component.routes().len(),
            "component registered"
        );
        Ok(())
    }

    fn unregister(&self, device: &DeviceId, component: &Arc<ComponentDescriptor>) -> bool {
        let mut entries = self.entries();

        // A newer registration for the same device is not ours to drop.
        let owned = entries
            .get(device)
            .is_some_and(|c| Weak::as_ptr(c) == Arc::as_ptr(component));
        if !owned {
            debug!(device = %device, component = component.name(), "component not registered");
            return false;
        }

        entries.remove(device);
        debug!(device = %device, component = component.name(), "component unregistered");
        true
    }
}
