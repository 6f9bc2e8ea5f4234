// App state and main event loop.
// Manages tabs, keyboard input, fetch spawning, and completion routing.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::prelude::*;
use tokio::sync::mpsc;

use crate::cache::{RequestCache, ResultPage};
use crate::error::Result;
use crate::github::{GitHubClient, RateLimit, SearchResults};
use crate::query::{RequestKey, TimeRange};
use crate::state::{FetchJob, SearchTabState, TrendingTabState};
use crate::ui;

/// Curated language filters cycled by the `l` key.
/// The empty entry clears the filter.
pub const LANGUAGES: &[&str] = &[
    "",
    "rust",
    "go",
    "python",
    "javascript",
    "typescript",
    "java",
    "c",
    "c++",
    "c#",
    "ruby",
    "php",
    "swift",
    "kotlin",
    "dart",
    "shell",
];

fn next_language(current: &str) -> &'static str {
    let i = LANGUAGES.iter().position(|l| *l == current).unwrap_or(0);
    LANGUAGES[(i + 1) % LANGUAGES.len()]
}

/// Active tab in the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Trending,
    Search,
}

impl Tab {
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Trending => "Trending",
            Tab::Search => "Search",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Tab::Trending => Tab::Search,
            Tab::Search => Tab::Trending,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Tab::Trending => Tab::Search,
            Tab::Search => Tab::Trending,
        }
    }
}

/// A settled fetch delivered back to the event loop.
pub struct FetchMessage {
    pub key: RequestKey,
    pub generation: u64,
    pub result: Result<(SearchResults, RateLimit)>,
}

/// Main application state.
pub struct App {
    /// Currently active tab.
    pub active_tab: Tab,
    /// Whether keystrokes edit the search query box.
    pub editing: bool,
    /// Search tab controller.
    pub search: SearchTabState,
    /// Trending tab controller.
    pub trending: TrendingTabState,
    /// Shared response cache keyed by canonical request parameters.
    pub cache: RequestCache,
    /// Most recent rate limit reading from response headers.
    pub rate_limit: Option<RateLimit>,
    /// Whether the app should exit.
    pub should_quit: bool,
}

impl App {
    pub fn new(range: TimeRange) -> Self {
        Self {
            active_tab: Tab::default(),
            editing: false,
            search: SearchTabState::new(),
            trending: TrendingTabState::new(range),
            cache: RequestCache::new(),
            rate_limit: None,
            should_quit: false,
        }
    }

    /// Main event loop.
    ///
    /// All state mutation happens here on the event-loop task; spawned
    /// fetch tasks only perform the network call and send one completion
    /// message back over the channel.
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<impl Backend>,
        client: &GitHubClient,
    ) -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel();

        // Trending loads immediately; search waits for a submitted query
        if let Some(job) = self.trending.refresh(&mut self.cache) {
            spawn_fetch(client, &tx, job);
        }

        while !self.should_quit {
            terminal.draw(|frame| ui::draw(frame, self))?;

            while let Ok(message) = rx.try_recv() {
                self.apply_fetch(message);
            }

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        if let Some(job) = self.handle_key(key.code) {
                            spawn_fetch(client, &tx, job);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Apply a settled fetch: the cache slot for the key settles first,
    /// then each controller decides relevance by key and generation.
    fn apply_fetch(&mut self, message: FetchMessage) {
        let FetchMessage {
            key,
            generation,
            result,
        } = message;

        let outcome = match result {
            Ok((results, rate)) => {
                self.rate_limit = Some(rate);
                Ok(ResultPage::new(results.items, results.total_count))
            }
            Err(e) => Err(e.to_string()),
        };
        self.cache.complete(&key, outcome);

        if self.search.on_settled(&key, generation, &self.cache) {
            let len = self.search.snapshot(&self.cache).items.len();
            self.search.cursor.reset(len);
        }
        if self.trending.on_settled(&key, generation, &self.cache) {
            let len = self.trending.snapshot(&self.cache).items.len();
            self.trending.cursor.reset(len);
        }
    }

    /// Handle a key press. Returns a fetch job when the input changed the
    /// active request.
    fn handle_key(&mut self, code: KeyCode) -> Option<FetchJob> {
        if self.editing {
            return self.handle_editing_key(code);
        }

        match code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                None
            }
            KeyCode::Tab => {
                self.active_tab = self.active_tab.next();
                None
            }
            KeyCode::BackTab => {
                self.active_tab = self.active_tab.prev();
                None
            }
            KeyCode::Char('/') if self.active_tab == Tab::Search => {
                self.editing = true;
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.select_next();
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.select_prev();
                None
            }
            KeyCode::Right | KeyCode::Char('n') => match self.active_tab {
                Tab::Search => self.search.next_page(&mut self.cache),
                Tab::Trending => self.trending.next_page(&mut self.cache),
            },
            KeyCode::Left | KeyCode::Char('p') => match self.active_tab {
                Tab::Search => self.search.previous_page(&mut self.cache),
                Tab::Trending => self.trending.previous_page(&mut self.cache),
            },
            KeyCode::Char('l') => match self.active_tab {
                Tab::Search => {
                    let language = next_language(self.search.language());
                    self.search.set_language(language.to_string(), &mut self.cache)
                }
                Tab::Trending => {
                    let language = next_language(self.trending.language());
                    self.trending
                        .set_language(language.to_string(), &mut self.cache)
                }
            },
            KeyCode::Char('s') if self.active_tab == Tab::Search => {
                let sort = self.search.sort().next();
                self.search.set_sort(sort, &mut self.cache)
            }
            KeyCode::Char('d') if self.active_tab == Tab::Trending => {
                self.trending.set_range(TimeRange::Daily, &mut self.cache)
            }
            KeyCode::Char('w') if self.active_tab == Tab::Trending => {
                self.trending.set_range(TimeRange::Weekly, &mut self.cache)
            }
            KeyCode::Char('m') if self.active_tab == Tab::Trending => {
                self.trending.set_range(TimeRange::Monthly, &mut self.cache)
            }
            KeyCode::Char('r') => match self.active_tab {
                Tab::Search => self.search.retry(&mut self.cache),
                Tab::Trending => self.trending.retry(&mut self.cache),
            },
            _ => None,
        }
    }

    /// Keystrokes while the query box has focus.
    fn handle_editing_key(&mut self, code: KeyCode) -> Option<FetchJob> {
        match code {
            KeyCode::Esc => {
                self.editing = false;
                None
            }
            KeyCode::Enter => {
                self.editing = false;
                self.search.submit(&mut self.cache)
            }
            KeyCode::Backspace => {
                self.search.input.pop();
                None
            }
            KeyCode::Char(c) => {
                self.search.input.push(c);
                None
            }
            _ => None,
        }
    }

    fn select_next(&mut self) {
        match self.active_tab {
            Tab::Search => {
                let len = self.search.snapshot(&self.cache).items.len();
                self.search.cursor.select_next(len);
            }
            Tab::Trending => {
                let len = self.trending.snapshot(&self.cache).items.len();
                self.trending.cursor.select_next(len);
            }
        }
    }

    fn select_prev(&mut self) {
        match self.active_tab {
            Tab::Search => {
                let len = self.search.snapshot(&self.cache).items.len();
                self.search.cursor.select_prev(len);
            }
            Tab::Trending => {
                let len = self.trending.snapshot(&self.cache).items.len();
                self.trending.cursor.select_prev(len);
            }
        }
    }
}

/// Spawn a network fetch for a job, reporting back over the channel.
fn spawn_fetch(client: &GitHubClient, tx: &mpsc::UnboundedSender<FetchMessage>, job: FetchJob) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = client.search_repositories(&job.request).await;
        let _ = tx.send(FetchMessage {
            key: job.key,
            generation: job.generation,
            result,
        });
    });
}
