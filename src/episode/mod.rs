mod download;
mod naming;

pub use download::{PART_SUFFIX, TempFileGuard, download, temp_path};
pub use naming::{destination_path, episode_file_name, extension_from_url, sanitize};
