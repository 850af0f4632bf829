//! One-shot daily summary job. Invoked on an external schedule, reads
//! yesterday's shared row, emails the report to both people, and exits
//! with the job's status.

use habit_buddies::mailer::Mailer;
use habit_buddies::remote::RemoteStore;
use habit_buddies::summary::run_summary;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let mailer = Mailer::from_env()?;
    let remote = RemoteStore::from_env()
        .ok_or("SUPABASE_URL and SUPABASE_ANON_KEY must be configured")?;

    run_summary(&remote, &mailer).await?;
    Ok(())
}
