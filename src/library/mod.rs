mod couplet;
mod error;
mod manager;
mod params;

pub use couplet::{couplet_for_page, render_couplet, split_couplets};
pub use error::{LibraryError, LibraryResult};
pub use manager::{AddSongOutcome, SongLibrary};
pub use params::ListSongsParams;
