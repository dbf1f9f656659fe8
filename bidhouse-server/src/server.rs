use {
    crate::{
        api,
        auction::service::{
            self,
            Service,
        },
        config::RunOptions,
        kernel::db::DB,
    },
    anyhow::anyhow,
    std::{
        sync::atomic::{
            AtomicBool,
            Ordering,
        },
        time::Duration,
    },
    tokio_util::task::TaskTracker,
};

pub async fn start_server(run_options: RunOptions) -> anyhow::Result<()> {
    tokio::spawn(async move {
        tracing::info!("Registered shutdown signal handler...");
        tokio::signal::ctrl_c().await.unwrap();
        tracing::info!("Shut down signal received, waiting for tasks...");
        SHOULD_EXIT.store(true, Ordering::Release);
    });

    let db = DB::connect(&run_options.server.database_url)
        .await
        .map_err(|err| anyhow!("Failed to connect to the database: {:?}", err))?;
    sqlx::migrate!("./migrations").run(&db).await?;

    let task_tracker = TaskTracker::new();
    let service = Service::new(
        db,
        service::Config {
            conclusion_retries: run_options.conclusion_retries,
        },
        task_tracker.clone(),
    );

    let server_loop = tokio::spawn(api::start_api(run_options, service.clone()));
    server_loop.await??;

    tracing::info!("Cancelling auction watchers...");
    service.cancel_watchers().await;
    task_tracker.close();
    task_tracker.wait().await;
    Ok(())
}

// A static exit flag to indicate to running threads that we're shutting down. This is used to
// gracefully shutdown the application.
//
// NOTE: A more idiomatic approach would be to use a tokio::sync::broadcast channel, and to send a
// shutdown signal to all running tasks. However, this is a bit more complicated to implement and
// we don't rely on global state for anything else.
pub(crate) static SHOULD_EXIT: AtomicBool = AtomicBool::new(false);
pub const EXIT_CHECK_INTERVAL: Duration = Duration::from_secs(1);
