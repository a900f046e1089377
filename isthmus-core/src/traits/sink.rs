//! Line sink trait

/// Destination for bytes received from the serial line
///
/// Called from the interrupt path with the critical section held, so
/// implementations must not block. Delivery is best-effort: a sink that
/// cannot take the byte drops it.
pub trait LineSink {
    /// Hand over one received byte
    fn deliver_received_byte(&mut self, byte: u8);
}

impl<S: LineSink + ?Sized> LineSink for &mut S {
    fn deliver_received_byte(&mut self, byte: u8) {
        (**self).deliver_received_byte(byte);
    }
}

/// An absent sink drops everything
impl<S: LineSink> LineSink for Option<S> {
    fn deliver_received_byte(&mut self, byte: u8) {
        match self {
            Some(sink) => sink.deliver_received_byte(byte),
            None => trace!("no session, dropping {=u8:#x}", byte),
        }
    }
}

/// Sink that drops every byte
#[derive(Debug, Clone, Copy, Default)]
pub struct Discard;

impl LineSink for Discard {
    fn deliver_received_byte(&mut self, _byte: u8) {}
}

/// Bounded buffers keep bytes until full, then drop
impl<const N: usize> LineSink for heapless::Vec<u8, N> {
    fn deliver_received_byte(&mut self, byte: u8) {
        if self.push(byte).is_err() {
            trace!("receive buffer full, dropping {=u8:#x}", byte);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_forwards_when_some() {
        let mut sink: Option<heapless::Vec<u8, 4>> = Some(heapless::Vec::new());
        sink.deliver_received_byte(0x58);
        assert_eq!(sink.unwrap().as_slice(), &[0x58]);
    }

    #[test]
    fn test_option_drops_when_none() {
        let mut sink: Option<Discard> = None;
        sink.deliver_received_byte(0x58);
    }

    #[test]
    fn test_bounded_buffer_drops_overflow() {
        let mut sink = heapless::Vec::<u8, 2>::new();
        for byte in [1, 2, 3] {
            (&mut sink).deliver_received_byte(byte);
        }
        assert_eq!(sink.as_slice(), &[1, 2]);
    }
}
