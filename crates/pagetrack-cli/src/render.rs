//! Plain-text rendering of a page.

use pagetrack::PageSnapshot;
use std::fmt::Write;

pub fn render_page(snapshot: &PageSnapshot<String>) -> String {
    let mut out = String::new();

    if snapshot.is_empty {
        out.push_str("(no items)\n");
        return out;
    }

    for (offset, item) in snapshot.items.iter().enumerate() {
        let _ = writeln!(out, "{:>6}  {}", snapshot.item_range.start + offset + 1, item);
    }

    if !snapshot.show_all {
        out.push('\n');
        out.push_str(&render_footer(snapshot));
        out.push('\n');
    }

    out
}

/// "Showing 51-100 of 220 | << < 1 [2] 3 4 5 > >> | per page: 50"
pub fn render_footer(snapshot: &PageSnapshot<String>) -> String {
    let mut links: Vec<String> = Vec::with_capacity(snapshot.page_links.len() + 4);

    if !snapshot.is_first_page {
        links.push("<<".to_string());
        links.push("<".to_string());
    }
    for page in &snapshot.page_links {
        if *page == snapshot.page_number {
            links.push(format!("[{}]", page + 1));
        } else {
            links.push((page + 1).to_string());
        }
    }
    if !snapshot.is_last_page {
        links.push(">".to_string());
        links.push(">>".to_string());
    }

    let sizes: Vec<String> = snapshot
        .item_size_list
        .iter()
        .map(|size| {
            if *size == snapshot.items_per_page {
                format!("[{}]", size)
            } else {
                size.to_string()
            }
        })
        .collect();

    format!(
        "Showing {}-{} of {} | {} | per page: {}",
        snapshot.item_range.start + 1,
        snapshot.item_range.end,
        snapshot.item_range.total,
        links.join(" "),
        sizes.join(" ")
    )
}
