use appstate_monitor::cli;
use appstate_monitor::Result;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    cli::run().await
}
