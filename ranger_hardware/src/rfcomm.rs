//! Bluetooth serial link over an RFCOMM tty (e.g. `/dev/rfcomm0`).
//!
//! Pairing and advertising belong to the system Bluetooth daemon; this type
//! only treats "the tty opens for writing" as connected.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use ranger_traits::{BoxError, RadioLink};
use tracing::{debug, info, warn};

use crate::error::HwError;

pub struct RfcommLink {
    path: PathBuf,
    port: Option<File>,
}

impl RfcommLink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            port: None,
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl RadioLink for RfcommLink {
    fn start_advertising(&mut self) -> Result<(), BoxError> {
        info!(device = %self.path.display(), "serial service offered; waiting for a central");
        Ok(())
    }

    fn is_connected(&mut self) -> bool {
        if self.port.is_some() {
            return true;
        }
        match OpenOptions::new().write(true).open(&self.path) {
            Ok(f) => {
                debug!(device = %self.path.display(), "link connected");
                self.port = Some(f);
                true
            }
            Err(_) => false,
        }
    }

    fn send(&mut self, bytes: &[u8]) -> Result<(), BoxError> {
        let Some(port) = self.port.as_mut() else {
            return Err(Box::new(HwError::NotConnected));
        };
        if let Err(e) = port.write_all(bytes).and_then(|()| port.flush()) {
            warn!(error = %e, "link write failed; dropping connection");
            self.port = None;
            return Err(Box::new(HwError::Io(e)));
        }
        Ok(())
    }
}
