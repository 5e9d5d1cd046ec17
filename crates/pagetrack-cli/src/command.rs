//! Interactive pager commands.

use anyhow::{anyhow, bail, Result};
use pagetrack::{GoToPageOptions, PageTracker};
use tracing::debug;

/// One line of user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Next,
    Previous,
    First,
    Last,
    /// One-based page number as typed by the user.
    GoTo(usize),
    PerPage(usize),
    Refresh { stay: bool },
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  n, next          next page
  p, prev          previous page
  f, first         first page
  l, last          last page
  g N, go N        go to page N
  s N, size N      show N items per page
  r, refresh       reload the current page
  R                reload from the first page
  h, help          this text
  q, quit          exit";

impl Command {
    pub fn parse(line: &str) -> Result<Self> {
        let mut parts = line.split_whitespace();
        let verb = parts.next().ok_or_else(|| anyhow!("empty command"))?;
        let arg = parts.next();

        let command = match verb {
            "n" | "next" => Command::Next,
            "p" | "prev" | "previous" => Command::Previous,
            "f" | "first" => Command::First,
            "l" | "last" => Command::Last,
            "g" | "go" => {
                let page = parse_number(arg, "page")?;
                if page == 0 {
                    bail!("pages are numbered from 1");
                }
                Command::GoTo(page)
            }
            "s" | "size" => Command::PerPage(parse_number(arg, "page size")?),
            "r" | "refresh" => Command::Refresh { stay: true },
            "R" => Command::Refresh { stay: false },
            "h" | "help" | "?" => Command::Help,
            "q" | "quit" | "exit" => Command::Quit,
            other => bail!("unknown command: {}", other),
        };

        Ok(command)
    }

    /// Apply a navigation command to `tracker`.
    ///
    /// `Help` and `Quit` are handled by the caller and do nothing here.
    pub async fn apply(self, tracker: &PageTracker<String>) -> Result<()> {
        debug!("Applying {:?}", self);
        match self {
            Command::Next => {
                tracker.next_page().await?;
            }
            Command::Previous => {
                tracker.previous_page().await?;
            }
            Command::First => {
                tracker.first_page().await?;
            }
            Command::Last => {
                tracker.last_page().await?;
            }
            Command::GoTo(page) => {
                let last = tracker.total_pages().max(1);
                if page > last {
                    bail!("page {} is past the last page ({})", page, last);
                }
                tracker
                    .go_to_page(page - 1, GoToPageOptions::default())
                    .await?;
            }
            Command::PerPage(size) => {
                tracker.set_items_per_page(size).await?;
            }
            Command::Refresh { stay } => {
                tracker.refresh(stay).await?;
            }
            Command::Help | Command::Quit => {}
        }
        Ok(())
    }
}

fn parse_number(arg: Option<&str>, what: &str) -> Result<usize> {
    let raw = arg.ok_or_else(|| anyhow!("missing {}", what))?;
    raw.parse()
        .map_err(|_| anyhow!("invalid {}: {}", what, raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagetrack::{PaginationOptions, SliceFetcher};

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("n").unwrap(), Command::Next);
        assert_eq!(Command::parse("  prev ").unwrap(), Command::Previous);
        assert_eq!(Command::parse("go 4").unwrap(), Command::GoTo(4));
        assert_eq!(Command::parse("s 50").unwrap(), Command::PerPage(50));
        assert_eq!(
            Command::parse("R").unwrap(),
            Command::Refresh { stay: false }
        );
        assert_eq!(Command::parse("q").unwrap(), Command::Quit);
    }

    #[test]
    fn test_parse_errors() {
        assert!(Command::parse("").is_err());
        assert!(Command::parse("go").is_err());
        assert!(Command::parse("go x").is_err());
        assert!(Command::parse("go 0").is_err());
        assert!(Command::parse("jump").is_err());
    }

    #[tokio::test]
    async fn test_apply_navigation() {
        let items: Vec<String> = (0..10).map(|i| i.to_string()).collect();
        let tracker = PageTracker::builder()
            .options(PaginationOptions::default().with_items_per_page(3))
            .fetcher(SliceFetcher::new(items))
            .build()
            .await
            .unwrap();

        Command::Next.apply(&tracker).await.unwrap();
        assert_eq!(tracker.page_number(), 1);

        Command::GoTo(4).apply(&tracker).await.unwrap();
        assert_eq!(tracker.items(), vec!["9".to_string()]);

        assert!(Command::GoTo(5).apply(&tracker).await.is_err());

        Command::PerPage(5).apply(&tracker).await.unwrap();
        assert_eq!(tracker.total_pages(), 2);
        assert_eq!(tracker.page_number(), 0);
    }
}
