//! Basic usage of the page tracker.
//!
//! Run with: cargo run --example basic_usage -p pagetrack

use pagetrack::{GoToPageOptions, PageTracker, PaginationOptions, SliceFetcher};

#[tokio::main(flavor = "current_thread")]
async fn main() -> pagetrack::Result<()> {
    let rows: Vec<String> = (1..=220).map(|i| format!("row {}", i)).collect();

    // Every fetch returns three pages, so two of the next three page turns are free
    let tracker = PageTracker::builder()
        .options(PaginationOptions::default().with_items_per_page(50))
        .fetcher(SliceFetcher::new(rows).with_prefetch_pages(3))
        .build()
        .await?;

    println!(
        "{} items over {} pages, cached pages {:?}",
        tracker.total_item_count(),
        tracker.total_pages(),
        tracker.cached_page_indices()
    );

    for _ in 0..4 {
        tracker.next_page().await?;
        let range = tracker.item_range();
        println!(
            "page {}: items {}-{} (cached pages {:?})",
            tracker.page_number() + 1,
            range.start + 1,
            range.end,
            tracker.cached_page_indices()
        );
    }

    tracker.set_items_per_page(200).await?;
    println!(
        "now {} per page, {} pages",
        tracker.items_per_page(),
        tracker.total_pages()
    );

    tracker
        .go_to_page(1, GoToPageOptions::default())
        .await?;
    println!("last page holds {} items", tracker.items().len());

    Ok(())
}
