//! Embassy async tasks
//!
//! Each task runs independently and communicates via the shared port and
//! channels.

pub mod host_rx;
pub mod host_tx;
pub mod irq;

pub use host_rx::host_rx_task;
pub use host_tx::host_tx_task;
pub use irq::irq_task;
