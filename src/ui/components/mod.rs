mod input;

pub use input::{edit_buffer, InputResult};
