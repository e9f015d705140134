//! Lyrics pagination. A couplet is a segment of the lyrics delimited by a
//! blank line (`"\n\n"`); page N is the N-th couplet, counting from 1.

pub const COUPLET_SEPARATOR: &str = "\n\n";

pub fn split_couplets(text: &str) -> Vec<&str> {
    text.split(COUPLET_SEPARATOR).collect()
}

/// Returns the couplet shown on `page`, or `None` when the page is out of
/// range.
pub fn couplet_for_page(text: &str, page: i64) -> Option<&str> {
    if page < 1 {
        return None;
    }
    let index = usize::try_from(page - 1).ok()?;
    split_couplets(text).get(index).copied()
}

pub fn render_couplet(artist: &str, title: &str, couplet: &str) -> String {
    format!("Group: {}, Song: {}\n\n{}", artist, title, couplet)
}
