/// Number of pages needed for `items` at `per_page` items each (at least 1).
///
/// A `per_page` of 0 counts as 1, matching [`chunk_lines`].
pub fn total_pages(items: usize, per_page: usize) -> usize {
    items.div_ceil(per_page.max(1)).max(1)
}

/// Group lines into pages of at most `per_page` lines, joined by newlines.
///
/// An empty input still yields one (empty) page so a session can start.
pub fn chunk_lines<S: AsRef<str>>(lines: &[S], per_page: usize) -> Vec<String> {
    let per_page = per_page.max(1);
    let pages: Vec<String> = lines
        .chunks(per_page)
        .map(|chunk| {
            chunk
                .iter()
                .map(|l| l.as_ref())
                .collect::<Vec<_>>()
                .join("\n")
        })
        .collect();

    if pages.is_empty() {
        vec![String::new()]
    } else {
        pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
    }

    #[test]
    fn zero_page_size_counts_like_chunking() {
        let lines = ["a", "b", "c"];
        assert_eq!(total_pages(lines.len(), 0), 3);
        assert_eq!(chunk_lines(&lines, 0).len(), total_pages(lines.len(), 0));
    }

    #[test]
    fn chunk_lines_groups_in_order() {
        let lines = ["a", "b", "c", "d", "e"];
        assert_eq!(chunk_lines(&lines, 2), vec!["a\nb", "c\nd", "e"]);
        assert_eq!(chunk_lines::<&str>(&[], 3), vec![String::new()]);
    }
}
