use crate::path::NormalizedPath;
use crate::vfs::ArchiveFs;
use log::trace;

/// Depth used by the `tree` command.
pub const DEFAULT_TREE_DEPTH: usize = 2;

const INDENT: &str = "  ";

/// Indented listing produced by [`ArchiveFs::tree`].
///
/// One line per entry, each terminated by `\n`. Directories that were expanded
/// end with `/`; directories cut off by the depth limit look like files, and
/// [`RenderedTree::is_truncated`] reports that it happened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedTree {
    text: String,
    truncated: bool,
}

impl RenderedTree {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    fn push_line(&mut self, depth: usize, name: &str, suffix: &str) {
        for _ in 1..depth {
            self.text.push_str(INDENT);
        }
        self.text.push_str(name);
        self.text.push_str(suffix);
        self.text.push('\n');
    }
}

impl ArchiveFs {
    /// Render the hierarchy below `root`.
    ///
    /// `root` itself counts as level 1 and is not printed; its children are
    /// level 2, their children level 3, and so on. Nothing deeper than
    /// `max_depth` is shown.
    pub fn tree(&self, root: &NormalizedPath, max_depth: usize) -> RenderedTree {
        let mut out = RenderedTree::default();
        self.render_level(root, 1, max_depth, &mut out);
        out
    }

    /// Print the children of `dir`, which sits at level `depth`.
    fn render_level(&self, dir: &NormalizedPath, depth: usize, max_depth: usize, out: &mut RenderedTree) {
        if depth >= max_depth {
            return;
        }
        trace!("tree: expanding {dir} at level {depth}");

        for name in self.list(dir) {
            let child = dir.join(&name);
            if !self.is_dir(&child) {
                out.push_line(depth, &name, "");
            } else if depth + 2 <= max_depth {
                out.push_line(depth, &name, "/");
                self.render_level(&child, depth + 1, max_depth, out);
            } else {
                out.push_line(depth, &name, "");
                out.truncated = true;
            }
        }
    }
}
