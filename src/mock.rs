//! Recording transport for the unit tests
//!
//! Every bus operation is appended to a transcript that tests compare against
//! the expected sequence. Reads are answered from a queue of canned responses,
//! or with zeros once the queue runs dry.

use std::collections::VecDeque;

use core::convert::Infallible;

use crate::ll::{Register, SpiSpeed, Transport};


#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Op {
    Read { header: Vec<u8>, len: usize },
    Write { header: Vec<u8>, data: Vec<u8> },
    Speed(SpiSpeed),
    Delay(u32),
    Reset,
}

impl Op {
    /// A read of the full register
    pub fn read(reg: Register) -> Self {
        Op::read_len(reg, reg.len)
    }

    pub fn read_len(reg: Register, len: usize) -> Self {
        Op::Read {
            header: reg.header(false).as_bytes().to_vec(),
            len,
        }
    }

    pub fn write(reg: Register, data: &[u8]) -> Self {
        Op::Write {
            header: reg.header(true).as_bytes().to_vec(),
            data: data.to_vec(),
        }
    }

    /// Whether this is a write to `reg`
    pub fn writes_to(&self, reg: Register) -> bool {
        match self {
            Op::Write { header, .. } => header.as_slice() == reg.header(true).as_bytes(),
            _ => false,
        }
    }
}


#[derive(Default)]
pub struct MockTransport {
    ops: Vec<Op>,
    responses: VecDeque<Vec<u8>>,
    has_reset_line: bool,
}

impl MockTransport {
    pub fn new() -> Self {
        init_logger();
        Self::default()
    }

    /// A transport whose board has the reset line connected
    pub fn with_reset_line() -> Self {
        MockTransport {
            has_reset_line: true,
            ..Self::new()
        }
    }

    /// Queues the response to the next unanswered read
    pub fn respond(&mut self, data: &[u8]) -> &mut Self {
        self.responses.push_back(data.to_vec());
        self
    }

    /// Returns the transcript so far and starts a new one
    pub fn take_ops(&mut self) -> Vec<Op> {
        core::mem::take(&mut self.ops)
    }

    /// The data of all writes to `reg`, in order
    pub fn writes_to(&self, reg: Register) -> Vec<Vec<u8>> {
        self.ops
            .iter()
            .filter(|op| op.writes_to(reg))
            .map(|op| match op {
                Op::Write { data, .. } => data.clone(),
                _ => unreachable!(),
            })
            .collect()
    }
}

impl Transport for MockTransport {
    type Error = Infallible;

    fn read(&mut self, header: &[u8], data: &mut [u8]) -> Result<(), Self::Error> {
        self.ops.push(Op::Read {
            header: header.to_vec(),
            len: data.len(),
        });

        data.iter_mut().for_each(|byte| *byte = 0);
        if let Some(response) = self.responses.pop_front() {
            let len = response.len().min(data.len());
            data[..len].copy_from_slice(&response[..len]);
        }

        Ok(())
    }

    fn write(&mut self, header: &[u8], data: &[u8]) -> Result<(), Self::Error> {
        self.ops.push(Op::Write {
            header: header.to_vec(),
            data: data.to_vec(),
        });
        Ok(())
    }

    fn set_speed(&mut self, speed: SpiSpeed) -> Result<(), Self::Error> {
        self.ops.push(Op::Speed(speed));
        Ok(())
    }

    fn delay_ms(&mut self, ms: u32) {
        self.ops.push(Op::Delay(ms));
    }

    fn reset(&mut self) -> Result<bool, Self::Error> {
        if self.has_reset_line {
            self.ops.push(Op::Reset);
        }
        Ok(self.has_reset_line)
    }
}


/// Routes `log` output of the driver to the test output
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
