//! Test and helper mocks for roast_core

use roast_traits::Transport;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

/// A transport that replays scripted device lines and records every write.
///
/// The write log and close flag live behind shared handles so tests can
/// inspect them after the session has consumed the transport.
pub struct ScriptedTransport {
    inbound: VecDeque<Vec<u8>>,
    writes: Rc<RefCell<Vec<Vec<u8>>>>,
    closed: Rc<Cell<bool>>,
}

impl ScriptedTransport {
    pub fn new<I, L>(lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Vec<u8>>,
    {
        Self {
            inbound: lines.into_iter().map(Into::into).collect(),
            writes: Rc::new(RefCell::new(Vec::new())),
            closed: Rc::new(Cell::new(false)),
        }
    }

    /// Handle onto the write log; stays valid after the transport moves.
    pub fn writes_log(&self) -> Rc<RefCell<Vec<Vec<u8>>>> {
        Rc::clone(&self.writes)
    }

    /// Handle onto the close flag; stays valid after the transport moves.
    pub fn closed_flag(&self) -> Rc<Cell<bool>> {
        Rc::clone(&self.closed)
    }
}

impl Transport for ScriptedTransport {
    fn write(&mut self, bytes: &[u8]) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.writes.borrow_mut().push(bytes.to_vec());
        Ok(())
    }

    fn read_line(
        &mut self,
        _timeout: std::time::Duration,
    ) -> Result<Option<Vec<u8>>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.inbound.pop_front())
    }

    fn bytes_available(&mut self) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        Ok(!self.inbound.is_empty())
    }

    fn close(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.closed.set(true);
        Ok(())
    }
}
