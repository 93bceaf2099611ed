pub use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver as Receiver};
