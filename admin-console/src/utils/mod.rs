// Presentation helpers shared by the stores and the CLI

pub mod file;
pub mod format;
pub mod timing;
pub mod validate;

pub use file::{chunk_count, get_file_extension, get_file_type, image_data_url, save_download};
pub use format::{
    capitalize, format_duration, format_file_size, format_time, generate_color, generate_id,
    DEFAULT_TIME_FORMAT,
};
pub use timing::{Debouncer, Throttle};
pub use validate::{validate_email, validate_phone, validate_url};
