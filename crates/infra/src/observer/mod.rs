//! Performance entry source adapters

mod channel_source;

pub use channel_source::ChannelEntrySource;
