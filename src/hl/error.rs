use crate::ll::{self, Transport};
use core::fmt;
use num_enum::{IntoPrimitive, TryFromPrimitive};


/// An error that can occur while driving the DW1000
pub enum Error<T: Transport + ?Sized> {
    /// Error occured while talking to the DW1000
    Transport(ll::Error<T>),

    /// The device id doesn't identify a DW1000
    WrongDeviceId {
        /// The id that was read instead
        found: u32,
    },

    /// The frame doesn't fit into the TX buffer
    FrameTooLong {
        /// Length of the frame, including the CRC
        len: usize,
        /// The largest frame the current configuration allows
        max: usize,
    },

    /// Buffer too small
    BufferTooSmall {
        /// Indicates how large a buffer would have been required
        required_len: usize,
    },

    /// A frame was detected, but not received correctly
    ReceiveFailed,

    /// No frame arrived in time
    ReceiveTimeout,
}

impl<T> Error<T>
where
    T: Transport + ?Sized,
{
    /// The numeric error code, for errors that have one
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Error::WrongDeviceId { .. } => Some(ErrorCode::WrongId),
            _ => None,
        }
    }
}

impl<T> From<ll::Error<T>> for Error<T>
where
    T: Transport + ?Sized,
{
    fn from(error: ll::Error<T>) -> Self {
        Error::Transport(error)
    }
}

// We can't derive this implementation, as `Debug` is only implemented
// conditionally for `ll::Error`.
impl<T> fmt::Debug for Error<T>
where
    T: Transport + ?Sized,
    T::Error: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Transport(error) => write!(f, "Transport({:?})", error),
            Error::WrongDeviceId { found } => {
                write!(f, "WrongDeviceId {{ found: {:#010x} }}", found)
            }
            Error::FrameTooLong { len, max } => {
                write!(f, "FrameTooLong {{ len: {:?}, max: {:?} }}", len, max)
            }
            Error::BufferTooSmall { required_len } => {
                write!(f, "BufferTooSmall {{ required_len: {:?} }}", required_len,)
            }
            Error::ReceiveFailed => write!(f, "ReceiveFailed"),
            Error::ReceiveTimeout => write!(f, "ReceiveTimeout"),
        }
    }
}


/// Numeric codes of the errors reported by `configure`
#[derive(Copy, Clone, Debug, Eq, PartialEq, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ErrorCode {
    /// No error
    Ok = 0,
    /// The device id didn't match
    WrongId = 1,
}

impl ErrorCode {
    /// A human-readable description
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Ok => "No error",
            ErrorCode::WrongId => "Wrong chip ID",
        }
    }
}

/// Looks up the description of a numeric error code
pub fn str_error(code: u8) -> &'static str {
    ErrorCode::try_from(code)
        .map(ErrorCode::as_str)
        .unwrap_or("Unknown error")
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;

    #[test]
    fn error_codes_have_descriptions() {
        assert_eq!(str_error(0), "No error");
        assert_eq!(str_error(1), "Wrong chip ID");
        assert_eq!(str_error(2), "Unknown error");
        assert_eq!(str_error(0xff), "Unknown error");
    }

    #[test]
    fn only_the_id_mismatch_has_a_code() {
        let wrong_id: Error<MockTransport> = Error::WrongDeviceId { found: 0 };
        let timeout: Error<MockTransport> = Error::ReceiveTimeout;

        assert_eq!(wrong_id.code(), Some(ErrorCode::WrongId));
        assert_eq!(u8::from(ErrorCode::WrongId), 1);
        assert_eq!(timeout.code(), None);
    }

    #[test]
    fn debug_output_names_the_variant() {
        let error: Error<MockTransport> = Error::FrameTooLong { len: 130, max: 127 };
        assert_eq!(format!("{:?}", error), "FrameTooLong { len: 130, max: 127 }");
    }
}
