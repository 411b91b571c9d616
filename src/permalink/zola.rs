//! Zola derives page paths from the content tree.

use super::{PageInfo, PermalinkProvider};

/// `content/<dirs>/<file>.md` is published at `/<dirs>/<slug>/`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZolaPermalinks;

impl PermalinkProvider for ZolaPermalinks {
    fn path(&self, page: &PageInfo<'_>) -> String {
        let mut path = String::from("/");
        for dir in page.dirs() {
            path.push_str(dir);
            path.push('/');
        }
        path.push_str(page.slug);
        path
    }
}
