// spyglass: TUI for discovering GitHub repositories.
// Sets up the terminal, builds the client, and runs the event loop.

mod app;
mod cache;
mod error;
mod github;
mod query;
mod state;
mod ui;

use app::App;
use error::Result;
use github::GitHubClient;
use query::TimeRange;

#[tokio::main]
async fn main() -> Result<()> {
    let client = GitHubClient::from_env()?;

    // Optional argument picks the initial trending window (daily/weekly/monthly)
    let range = std::env::args()
        .nth(1)
        .map(|arg| TimeRange::parse(&arg))
        .unwrap_or_default();

    let mut app = App::new(range);
    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal, &client).await;
    ratatui::restore();
    result
}
