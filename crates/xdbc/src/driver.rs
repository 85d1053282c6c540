//! Entry point: opening datasources.

use crate::connection::Connection;
use xdbc_core::{Engine, Result};

/// Opens datasources into owned [`Connection`]s.
///
/// A driver holds only its engine's configuration; it keeps no state about
/// the connections it hands out.
#[derive(Debug, Default, Clone)]
pub struct Driver<E> {
    engine: E,
}

impl<E: Engine> Driver<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Open `datasource` and hand the connection to the caller.
    ///
    /// The descriptor is passed to the engine unchanged.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn open(&self, datasource: &str) -> Result<Connection<E>> {
        let handle = self.engine.open(datasource)?;
        tracing::debug!("Connected");
        Ok(Connection::new(handle, datasource))
    }
}

impl<E: Engine + Default> Driver<E> {
    /// Open `datasource` with a default-configured engine.
    pub fn connect(datasource: &str) -> Result<Connection<E>> {
        Self::default().open(datasource)
    }
}
