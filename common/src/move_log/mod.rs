//! Line-delimited JSON record of every move a bot made, one object per line.
//! Keys follow the schema the annotation and dataset tooling already reads.

mod file_io;
mod record;

pub use file_io::{MoveLogError, MoveLogWriter, load_move_log};
pub use record::{LoggedCell, MoveLogRecord};
