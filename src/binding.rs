//! Binding controller - turns bus events into component registrations.
//!
//! Each device is either [`Unbound`](BindState::Unbound) or
//! [`Bound`](BindState::Bound). There is no in-between: registration is
//! atomic from here, and a device only becomes bound once the host has
//! accepted its component.
//!
//! ```
//! use std::sync::Arc;
//! use phoneodeo_dir::{BindState, BindingController, ComponentRegistry, PhoneodeoDir, PlatformDevice};
//!
//! let host = Arc::new(ComponentRegistry::new());
//! let mut controller = BindingController::new(PhoneodeoDir, host.clone());
//!
//! let dev = PlatformDevice::new("spdif-in.0").with_compatible("linux,phoneodeo-dir");
//! assert_eq!(controller.device_added(&dev).unwrap(), BindState::Bound);
//! assert!(host.lookup(dev.id()).is_some());
//!
//! controller.device_removed(dev.id());
//! assert!(host.lookup(dev.id()).is_none());
//! ```

use std::sync::Arc;

use hashbrown::HashMap;
use tracing::{debug, info, trace, warn};

use crate::device::{DeviceId, PlatformDevice};
use crate::driver::PlatformDriver;
use crate::error::Result;
use crate::host::{ComponentHost, Registration};

/// Where a device stands with respect to this driver.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum BindState {
    Unbound,
    Bound,
}

// Fields drop in declaration order: the registration goes before the device
// handle it was scoped to.
struct DeviceBinding<H: ComponentHost + ?Sized> {
    registration: Registration<H>,
    device: PlatformDevice,
}

/// Binds matching devices to a driver and keeps their registrations alive.
///
/// Events for one device are expected one at a time, which is how the bus
/// layer delivers them. Dropping the controller unbinds everything.
pub struct BindingController<D: PlatformDriver, H: ComponentHost + ?Sized> {
    driver: D,
    host: Arc<H>,
    bindings: HashMap<DeviceId, DeviceBinding<H>>,
}

impl<D: PlatformDriver, H: ComponentHost + ?Sized> BindingController<D, H> {
    pub fn new(driver: D, host: Arc<H>) -> Self {
        Self {
            driver,
            host,
            bindings: HashMap::new(),
        }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Handles a device appearing on the bus.
    ///
    /// Devices the driver does not match are left alone and reported as
    /// unbound. A device that is already bound stays bound; the driver is not
    /// probed again. Probe and registration errors are returned as-is and the
    /// device stays unbound.
    pub fn device_added(&mut self, device: &PlatformDevice) -> Result<BindState> {
        let id = device.id();

        if !self.driver.matches(device) {
            trace!(device = %id, driver = self.driver.name(), "no compatible match");
            return Ok(BindState::Unbound);
        }
        if self.bindings.contains_key(id) {
            debug!(device = %id, "already bound");
            return Ok(BindState::Bound);
        }

        let component = self.driver.probe(device).map_err(|e| {
            warn!(device = %id, error = %e, "probe failed");
            e
        })?;
        let registration = Registration::acquire(self.host.clone(), id.clone(), component)
            .map_err(|e| {
                warn!(device = %id, error = %e, "registration failed");
                e
            })?;

        info!(
            device = %id,
            driver = self.driver.name(),
            dais = ?registration.component().dai_names(),
            "bound"
        );
        self.bindings.insert(
            id.clone(),
            DeviceBinding {
                registration,
                device: device.clone(),
            },
        );
        Ok(BindState::Bound)
    }

    /// Handles a device leaving the bus.
    ///
    /// Returns whether a binding was released. Unknown or unbound devices are
    /// a no-op.
    pub fn device_removed(&mut self, device: &DeviceId) -> bool {
        match self.bindings.remove(device) {
            Some(binding) => {
                drop(binding);
                info!(device = %device, "unbound");
                true
            }
            None => {
                trace!(device = %device, "remove for unbound device");
                false
            }
        }
    }

    /// Releases every binding, as on driver unregistration.
    pub fn unbind_all(&mut self) -> usize {
        let count = self.bindings.len();
        self.bindings.clear();
        if count > 0 {
            info!(count, driver = self.driver.name(), "unbound all devices");
        }
        count
    }

    pub fn state(&self, device: &DeviceId) -> BindState {
        if self.bindings.contains_key(device) {
            BindState::Bound
        } else {
            BindState::Unbound
        }
    }

    /// The live registration for `device`, if bound.
    pub fn registration(&self, device: &DeviceId) -> Option<&Registration<H>> {
        self.bindings.get(device).map(|b| &b.registration)
    }

    /// The device handle a binding was made for.
    pub fn bound_device(&self, device: &DeviceId) -> Option<&PlatformDevice> {
        self.bindings.get(device).map(|b| &b.device)
    }

    /// Bound devices, sorted.
    pub fn bound_devices(&self) -> Vec<&DeviceId> {
        let mut devices: Vec<_> = self.bindings.keys().collect();
        devices.sort();
        devices
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::PhoneodeoDir;
    use crate::host::ComponentRegistry;

    fn phoneodeo(id: &str) -> PlatformDevice {
        PlatformDevice::new(id).with_compatible(PhoneodeoDir::COMPATIBLE)
    }

    #[test]
    fn bind_then_unbind() {
        let host = Arc::new(ComponentRegistry::new());
        let mut ctl = BindingController::new(PhoneodeoDir, host.clone());
        let dev = phoneodeo("dev0");

        assert_eq!(ctl.state(dev.id()), BindState::Unbound);
        assert_eq!(ctl.device_added(&dev).unwrap(), BindState::Bound);
        assert_eq!(ctl.state(dev.id()), BindState::Bound);
        assert_eq!(ctl.registration(dev.id()).unwrap().device(), dev.id());
        assert_eq!(ctl.bound_device(dev.id()), Some(&dev));

        assert!(ctl.device_removed(dev.id()));
        assert_eq!(ctl.state(dev.id()), BindState::Unbound);
        assert!(host.is_empty());
    }

    #[test]
    fn repeated_match_keeps_single_binding() {
        let host = Arc::new(ComponentRegistry::new());
        let mut ctl = BindingController::new(PhoneodeoDir, host.clone());
        let dev = phoneodeo("dev0");

        ctl.device_added(&dev).unwrap();
        let first = Arc::clone(ctl.registration(dev.id()).unwrap().component());
        assert_eq!(ctl.device_added(&dev).unwrap(), BindState::Bound);

        let current = ctl.registration(dev.id()).unwrap().component();
        assert!(Arc::ptr_eq(&first, current));
        assert_eq!(host.len(), 1);
    }

    #[test]
    fn unmatched_device_is_ignored() {
        let host = Arc::new(ComponentRegistry::new());
        let mut ctl = BindingController::new(PhoneodeoDir, host.clone());
        let dev = PlatformDevice::new("dev0").with_compatible("linux,spdif-dit");

        assert_eq!(ctl.device_added(&dev).unwrap(), BindState::Unbound);
        assert!(host.is_empty());
        assert!(ctl.bound_devices().is_empty());
    }

    #[test]
    fn remove_is_idempotent() {
        let host = Arc::new(ComponentRegistry::new());
        let mut ctl = BindingController::new(PhoneodeoDir, host);
        let dev = phoneodeo("dev0");

        assert!(!ctl.device_removed(dev.id()));
        ctl.device_added(&dev).unwrap();
        assert!(ctl.device_removed(dev.id()));
        assert!(!ctl.device_removed(dev.id()));
    }

    #[test]
    fn unbind_all_releases_everything() {
        let host = Arc::new(ComponentRegistry::new());
        let mut ctl = BindingController::new(PhoneodeoDir, host.clone());

        for id in ["b", "a", "c"] {
            ctl.device_added(&phoneodeo(id)).unwrap();
        }
        let bound: Vec<_> = ctl.bound_devices().into_iter().map(DeviceId::as_str).collect();
        assert_eq!(bound, vec!["a", "b", "c"]);
        assert_eq!(host.len(), 3);

        assert_eq!(ctl.unbind_all(), 3);
        assert!(host.is_empty());
        assert_eq!(ctl.unbind_all(), 0);
    }
}
