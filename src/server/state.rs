use crate::config::LocatorConfig;
use crate::locator::BarberLocator;
use crate::location::ResolutionCache;
use std::sync::Mutex;

pub struct AppState {
    pub locator: BarberLocator,
    pub cache: Mutex<ResolutionCache>,
    pub config: LocatorConfig,
}

impl AppState {
    pub fn new(locator: BarberLocator, config: LocatorConfig) -> Self {
        Self {
            locator,
            cache: Mutex::new(ResolutionCache::default()),
            config,
        }
    }
}
