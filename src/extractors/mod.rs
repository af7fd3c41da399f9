pub mod body;

pub use body::RecordBody;
