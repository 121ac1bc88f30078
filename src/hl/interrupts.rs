//! Interrupt dispatch
//!
//! The board calls [`DW1000::handle_interrupt`] whenever the DW1000 raises
//! its IRQ line. The driver then reads SYS_STATUS once, clears the events it
//! handles, and calls the attached handler for each of them.

use crate::{ll::Transport, Error, DW1000};


/// A handler for a DW1000 event
///
/// Handlers get the driver itself, so they can read the frame, its time stamp
/// or start the next operation. A handler that starts a new operation keeps
/// it: the driver then neither re-arms the receiver nor goes idle.
pub type Handler<'a, 'h, T> = &'h mut (dyn FnMut(&mut DW1000<'a, 'h, T>) + 'h);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Event {
    Sent,
    Received,
    ReceiveTimeout,
    ReceiveFailed,
    ReceiveTimestampAvailable,
    Error,
}

/// One handler slot per event
pub(crate) struct Handlers<'a, 'h, T: Transport + ?Sized> {
    sent:                        Option<Handler<'a, 'h, T>>,
    received:                    Option<Handler<'a, 'h, T>>,
    receive_timeout:             Option<Handler<'a, 'h, T>>,
    receive_failed:              Option<Handler<'a, 'h, T>>,
    receive_timestamp_available: Option<Handler<'a, 'h, T>>,
    error:                       Option<Handler<'a, 'h, T>>,
}

impl<'a, 'h, T> Handlers<'a, 'h, T>
where
    T: Transport + ?Sized,
{
    pub(crate) fn new() -> Self {
        Handlers {
            sent:                        None,
            received:                    None,
            receive_timeout:             None,
            receive_failed:              None,
            receive_timestamp_available: None,
            error:                       None,
        }
    }

    fn slot(&mut self, event: Event) -> &mut Option<Handler<'a, 'h, T>> {
        match event {
            Event::Sent => &mut self.sent,
            Event::Received => &mut self.received,
            Event::ReceiveTimeout => &mut self.receive_timeout,
            Event::ReceiveFailed => &mut self.receive_failed,
            Event::ReceiveTimestampAvailable => &mut self.receive_timestamp_available,
            Event::Error => &mut self.error,
        }
    }
}

impl<'a, 'h, T> DW1000<'a, 'h, T>
where
    T: Transport + ?Sized,
{
    /// Called after a frame was sent
    pub fn attach_sent_handler(&mut self, handler: Handler<'a, 'h, T>) {
        self.handlers.sent = Some(handler);
    }

    /// Called after a frame was received
    pub fn attach_received_handler(&mut self, handler: Handler<'a, 'h, T>) {
        self.handlers.received = Some(handler);
    }

    /// Called after the receiver timed out
    pub fn attach_receive_timeout_handler(&mut self, handler: Handler<'a, 'h, T>) {
        self.handlers.receive_timeout = Some(handler);
    }

    /// Called after a frame was detected, but couldn't be received
    pub fn attach_receive_failed_handler(&mut self, handler: Handler<'a, 'h, T>) {
        self.handlers.receive_failed = Some(handler);
    }

    /// Called when the receive time stamp becomes available
    pub fn attach_receive_timestamp_available_handler(&mut self, handler: Handler<'a, 'h, T>) {
        self.handlers.receive_timestamp_available = Some(handler);
    }

    /// Called when one of the PLLs is losing its lock
    pub fn attach_error_handler(&mut self, handler: Handler<'a, 'h, T>) {
        self.handlers.error = Some(handler);
    }

    /// Handles the events behind an interrupt
    ///
    /// The events are handled in this order:
    ///
    /// 1. a clock problem
    /// 2. either a failed reception, a receive timeout or a received frame, in
    ///    that precedence, with the receive time stamp in between
    /// 3. a sent frame
    ///
    /// After the reception, the receiver is re-armed with permanent receive,
    /// unless a handler started an operation of its own.
    pub fn handle_interrupt(&mut self) -> Result<(), Error<T>> {
        self.read_system_event_status()?;

        let failed = self.is_receive_failed();
        let timeout = !failed && self.is_receive_timeout();
        let received = !failed && !timeout && self.is_receive_done();
        let timestamp_available = self.is_receive_timestamp_available();
        let sent = self.is_transmit_done();

        // Set once a handler starts an operation of its own
        let mut taken_over = false;

        if self.is_clock_problem() {
            log::warn!("Clock PLL losing lock");
            self.clear_clock_problem_status()?;
            taken_over |= self.dispatch(Event::Error);
        }

        if failed {
            self.clear_receive_failed_status()?;
            taken_over |= self.dispatch(Event::ReceiveFailed);
        }
        else if timeout {
            self.clear_receive_timeout_status()?;
            taken_over |= self.dispatch(Event::ReceiveTimeout);
        }

        if timestamp_available {
            self.clear_receive_timestamp_available_status()?;
            taken_over |= self.dispatch(Event::ReceiveTimestampAvailable);
        }

        if received {
            self.clear_received_status()?;
            taken_over |= self.dispatch(Event::Received);
        }

        if (failed || timeout || received) && !taken_over {
            self.receive_finished()?;
        }

        if sent {
            self.clear_transmit_status()?;
            taken_over |= self.dispatch(Event::Sent);
            if !taken_over {
                self.transmit_finished();
            }
        }

        Ok(())
    }

    /// Calls the handler for `event`, if one is attached
    ///
    /// Returns whether the handler went through the lifecycle, e.g. by
    /// starting a new receive or transmit.
    fn dispatch(&mut self, event: Event) -> bool {
        log::trace!("Dispatching {:?}", event);

        let Some(handler) = self.handlers.slot(event).take() else {
            return false;
        };

        let epoch = self.epoch;
        handler(self);

        // The handler may have attached a replacement for itself
        let slot = self.handlers.slot(event);
        if slot.is_none() {
            *slot = Some(handler);
        }

        self.epoch != epoch
    }
}
