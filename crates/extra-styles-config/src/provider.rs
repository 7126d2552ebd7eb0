use crate::Settings;
use std::cell::RefCell;
use std::rc::Rc;

/// Read access to the live configuration.
///
/// Renderers and widgets ask the provider each time they need settings, so
/// edits made through a shared handle show up on the next render pass.
pub trait SettingsProvider {
    fn settings(&self) -> Settings;
}

impl SettingsProvider for Settings {
    fn settings(&self) -> Settings {
        self.clone()
    }
}

impl SettingsProvider for RefCell<Settings> {
    fn settings(&self) -> Settings {
        self.borrow().clone()
    }
}

impl<P: SettingsProvider + ?Sized> SettingsProvider for Rc<P> {
    fn settings(&self) -> Settings {
        (**self).settings()
    }
}

impl<P: SettingsProvider + ?Sized> SettingsProvider for &P {
    fn settings(&self) -> Settings {
        (**self).settings()
    }
}
