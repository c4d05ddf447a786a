
pub use helpers::*;
pub use recording_channel::RecordingChannel;
pub use test_protocol::{protocol, TestChannelTypes};
